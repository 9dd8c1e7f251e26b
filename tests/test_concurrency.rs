use std::thread;

use xmlsniff::{Document, EncodingName};

const INPUTS: &[(&[u8], Option<&str>)] = &[
    (b"<a>plain</a>", None),
    (b"\xEF\xBB\xBF<a>bom</a>", None),
    (b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a>\xE9</a>", None),
    (b"<a>\xE9</a>", Some("windows-1252")),
];

#[test]
fn test_parallel_parses_agree() {
    let expected = INPUTS
        .iter()
        .map(|(xml, encoding)| Document::parse(xml, "t.xml", *encoding).unwrap())
        .collect::<Vec<_>>();

    thread::scope(|scope| {
        let handles = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    INPUTS
                        .iter()
                        .map(|(xml, encoding)| Document::parse(xml, "t.xml", *encoding).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_document_moves_between_threads() {
    let doc = Document::parse(b"<a>x</a>", "t.xml", Some("US-ASCII")).unwrap();
    let encoding = thread::spawn(move || doc.encoding().clone())
        .join()
        .unwrap();
    assert_eq!(encoding, EncodingName::US_ASCII);
}
