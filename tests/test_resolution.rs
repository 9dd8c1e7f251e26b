use rstest::rstest;
use xmlsniff::{detect, Document, EncodingName, Error, ParseConfig};

fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

fn utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
}

#[test]
fn test_no_signal_is_utf8() {
    let doc = Document::parse(b"<a>\xC3\xA9</a>", "a.xml", None).unwrap();
    assert_eq!(doc.encoding(), &EncodingName::UTF_8);
    assert_eq!(doc.text_content(doc.document_element()), "é");
}

#[test]
fn test_declaration_without_bom() {
    let xml = b"<?xml version='1.0' encoding='windows-1252'?><a>\x80</a>";
    let doc = Document::parse(xml, "a.xml", None).unwrap();
    assert_eq!(doc.encoding(), "windows-1252");
    assert_eq!(doc.text_content(doc.document_element()), "€");
}

#[test]
fn test_bom_beats_conflicting_declaration() {
    let mut xml = vec![0xFF, 0xFE];
    xml.extend(utf16le(
        r#"<?xml version="1.0" encoding="ISO-8859-1"?><a>日本</a>"#,
    ));
    let doc = Document::parse(&xml, "a.xml", None).unwrap();
    assert_eq!(doc.encoding(), &EncodingName::UTF_16LE);
    assert_eq!(doc.text_content(doc.document_element()), "日本");
}

#[test]
fn test_utf16_bom_with_generic_declaration() {
    let mut xml = vec![0xFE, 0xFF];
    xml.extend(utf16be(r#"<?xml version="1.0" encoding="UTF-16"?><a>x</a>"#));
    let doc = Document::parse(&xml, "a.xml", None).unwrap();
    assert_eq!(doc.encoding(), &EncodingName::UTF_16BE);
    assert_eq!(doc.text_content(doc.document_element()), "x");
}

#[test]
fn test_override_beats_bom() {
    // the caller is trusted; bytes that aren't UTF-32 fail to decode as such
    let xml = b"\xEF\xBB\xBF<a/>";
    let err = Document::parse(xml, "a.xml", Some("UTF-32LE")).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedInput { ref encoding, offset: 0 } if encoding == "UTF-32LE"
    ));
}

#[test]
fn test_override_beats_declaration() {
    let xml = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a>\xE9</a>";
    let doc = Document::parse(xml, "a.xml", Some("ISO-8859-1")).unwrap();
    assert_eq!(doc.encoding(), &EncodingName::ISO_8859_1);
    assert_eq!(doc.text_content(doc.document_element()), "é");
}

#[test]
fn test_utf16_layout_without_bom() {
    let xml = utf16be(r#"<?xml version="1.0" encoding="UTF-16"?><a>ok</a>"#);
    let doc = Document::parse(&xml, "a.xml", None).unwrap();
    assert_eq!(doc.encoding(), &EncodingName::UTF_16BE);
    assert_eq!(doc.text_content(doc.document_element()), "ok");
}

#[test]
fn test_utf32_bom() {
    let mut xml = vec![0xFF, 0xFE, 0x00, 0x00];
    xml.extend("<a>ok</a>".chars().flat_map(|c| u32::from(c).to_le_bytes()));
    let doc = Document::parse(&xml, "a.xml", None).unwrap();
    assert_eq!(doc.encoding(), &EncodingName::UTF_32LE);
    assert_eq!(doc.text_content(doc.document_element()), "ok");
}

#[test]
fn test_malformed_utf8() {
    let err = Document::parse(b"<a>\xC0</a>", "a.xml", None).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedInput { ref encoding, offset: 3 } if encoding == "UTF-8"
    ));
}

#[test]
fn test_malformed_ascii() {
    let err = Document::parse(b"<a>\x80</a>", "a.xml", Some("US-ASCII")).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { offset: 3, .. }));
}

#[rstest]
#[case(Some("UTF-7"), b"<a/>".as_slice())]
#[case(Some("bogus"), b"<a/>".as_slice())]
#[case(None, b"<?xml version=\"1.0\" encoding=\"x-unknown\"?><a/>".as_slice())]
fn test_unsupported_encoding(#[case] encoding: Option<&str>, #[case] xml: &[u8]) {
    let err = Document::parse(xml, "a.xml", encoding).unwrap_err();
    assert!(matches!(err, Error::UnsupportedEncoding(_)));
}

#[test]
fn test_configured_default_encoding() {
    let config = ParseConfig {
        default_encoding: EncodingName::new("windows-1252"),
        ..Default::default()
    };
    let doc = Document::parse_with_config(b"<a>\x80</a>", "a.xml", None, &config).unwrap();
    assert_eq!(doc.text_content(doc.document_element()), "€");
    // a declaration still beats the default
    let xml = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a>\xE2\x82\xAC</a>";
    assert_eq!(detect(xml, None, &config).unwrap(), EncodingName::UTF_8);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(7)]
#[case(4096)]
fn test_chunk_size_does_not_matter(#[case] chunk_size: usize) {
    let config = ParseConfig {
        chunk_size,
        ..Default::default()
    };
    let mut xml = vec![0xFF, 0xFE];
    xml.extend(utf16le("<doc a='été'>日本語 😀 text</doc>"));
    let doc = Document::parse_with_config(&xml, "a.xml", None, &config).unwrap();
    let expected = Document::parse_str("<doc a='été'>日本語 😀 text</doc>", "a.xml").unwrap();
    assert!(doc.same_content(&expected));
}

#[test]
fn test_unpaired_surrogate() {
    let mut xml = vec![0xFF, 0xFE];
    xml.extend(utf16le("<a>"));
    xml.extend([0x00, 0xD8]);
    xml.extend(utf16le("</a>"));
    let err = Document::parse(&xml, "a.xml", None).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { ref encoding, .. } if encoding == "UTF-16LE"));
}
