//! Locate the `encoding` pseudo-attribute of an XML declaration in raw bytes.
//!
//! The declaration syntax is ASCII, and every encoding a declaration can be
//! read in places ASCII characters at their usual byte values. So the scan
//! works on bytes and never needs to know the actual encoding.
use memchr::memmem;

use crate::encoding::EncodingName;

/// The default number of leading bytes searched for a declaration.
pub const DEFAULT_WINDOW: usize = 256;

/// Scan the leading [`DEFAULT_WINDOW`] bytes for the declared encoding.
///
/// The value is returned as a candidate name; whether it is a supported
/// encoding is not checked here.
///
/// ```rust
/// use xmlsniff::{scan, EncodingName};
///
/// let xml = br#"<?xml version="1.0" encoding='iso-8859-1'?><a/>"#;
/// assert_eq!(scan(xml), Some(EncodingName::ISO_8859_1));
/// assert_eq!(scan(b"<a/>"), None);
/// ```
pub fn scan(bytes: &[u8]) -> Option<EncodingName> {
    scan_window(bytes, DEFAULT_WINDOW)
}

/// Like [`scan`], with an explicit window size.
pub fn scan_window(bytes: &[u8], window: usize) -> Option<EncodingName> {
    let window = &bytes[..bytes.len().min(window)];
    let declaration = find_declaration(window)?;
    let value = encoding_value(declaration)?;
    if !is_encoding_name(value) {
        return None;
    }
    let label = std::str::from_utf8(value).ok()?;
    Some(EncodingName::new(label))
}

// the bytes after `<?xml`, which must be followed by whitespace so that
// `<?xml-stylesheet` isn't taken for a declaration
fn find_declaration(window: &[u8]) -> Option<&[u8]> {
    let mut start = 0;
    loop {
        let found = start + memmem::find(&window[start..], b"<?xml")?;
        let after = found + b"<?xml".len();
        match window.get(after) {
            Some(b) if is_whitespace(*b) => return Some(&window[after..]),
            _ => start = after,
        }
    }
}

fn encoding_value(declaration: &[u8]) -> Option<&[u8]> {
    let mut pos = 0;
    loop {
        pos = skip_whitespace(declaration, pos);
        if declaration[pos..].starts_with(b"?>") {
            return None;
        }
        let name_start = pos;
        while pos < declaration.len() && is_name_byte(declaration[pos]) {
            pos += 1;
        }
        if pos == name_start {
            return None;
        }
        let name = &declaration[name_start..pos];

        pos = skip_whitespace(declaration, pos);
        if declaration.get(pos) != Some(&b'=') {
            return None;
        }
        pos = skip_whitespace(declaration, pos + 1);

        let quote = *declaration.get(pos)?;
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        let value_start = pos + 1;
        let value_end = value_start + memchr::memchr(quote, &declaration[value_start..])?;
        pos = value_end + 1;

        if name == b"encoding" {
            // a declaration cut off by the window doesn't count
            memmem::find(&declaration[pos..], b"?>")?;
            return Some(&declaration[value_start..value_end]);
        }
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && is_whitespace(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}

// EncName ::= [A-Za-z] ([A-Za-z0-9._] | '-')*
fn is_encoding_name(value: &[u8]) -> bool {
    match value.split_first() {
        Some((first, rest)) => {
            first.is_ascii_alphabetic()
                && rest
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(br#"<?xml version="1.0" encoding="UTF-8"?><a/>"#, Some("UTF-8"))]
    #[case(br#"<?xml version='1.0' encoding='Shift_JIS'?><a/>"#, Some("SHIFT_JIS"))]
    #[case(b"<?xml version = \"1.0\"\n  encoding = \"latin1\" ?><a/>", Some("ISO-8859-1"))]
    #[case(br#"<?xml encoding="windows-1252" standalone="yes"?><a/>"#, Some("WINDOWS-1252"))]
    #[case(br#"<?xml version="1.0"?><a/>"#, None)]
    #[case(br#"<?xml version="1.0" standalone="yes"?><a encoding="UTF-16"/>"#, None)]
    #[case(br#"<a/>"#, None)]
    #[case(br#"<?xml-stylesheet href="a.xsl"?><a/>"#, None)]
    #[case(br#"<?xml version="1.0" encoding="?><a/>"#, None)]
    #[case(br#"<?xml version="1.0" encoding="UTF 8"?><a/>"#, None)]
    #[case(br#"<?xml version="1.0" encoding=""?><a/>"#, None)]
    #[case(br#"<?xml version="1.0" encoding=UTF-8?><a/>"#, None)]
    fn test_scan(#[case] bytes: &[u8], #[case] expected: Option<&str>) {
        assert_eq!(scan(bytes), expected.map(EncodingName::new));
    }

    #[test]
    fn test_scan_after_bom() {
        let bytes = b"\xEF\xBB\xBF<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>";
        assert_eq!(scan(bytes), Some(EncodingName::UTF_8));
    }

    #[test]
    fn test_scan_ignores_non_ascii_after_declaration() {
        let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a>".to_vec();
        bytes.extend_from_slice(&[0xE9, 0xFF, 0xC0]);
        bytes.extend_from_slice(b"</a>");
        assert_eq!(scan(&bytes), Some(EncodingName::ISO_8859_1));
    }

    #[test]
    fn test_scan_outside_window() {
        let mut bytes = vec![b' '; DEFAULT_WINDOW];
        bytes.extend_from_slice(br#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert_eq!(scan(&bytes), None);
    }

    #[test]
    fn test_scan_truncated_by_window() {
        let bytes = br#"<?xml version="1.0" encoding="UTF-8"?><a/>"#;
        assert_eq!(scan_window(bytes, 33), None);
        assert_eq!(scan_window(bytes, 38), Some(EncodingName::UTF_8));
    }
}
