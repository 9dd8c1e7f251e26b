use std::fmt::{Display, Formatter};

use indextree::{Arena, NodeId};
use log::debug;

use crate::config::ParseConfig;
use crate::decode::{decode, decode_with_config, encode};
use crate::encoding::EncodingName;
use crate::error::Error;
use crate::parse::DocumentBuilder;
use crate::resolve::detect;
use crate::xmlvalue::{Declaration, Value};

pub(crate) type XmlArena = Arena<Value>;

/// A node in a [`Document`].
///
/// This is a lightweight handle; it can be copied and compared. It is only
/// meaningful for the document it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// Where a document came from, in the encoding it is reported in.
///
/// For a parsed [`Document`] this encoding is always the document's own
/// encoding, and the identifier is guaranteed to encode in it and decode
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceIdentifier {
    value: String,
    encoding: EncodingName,
}

impl SourceIdentifier {
    pub(crate) fn new(value: &str, encoding: &EncodingName) -> Result<Self, Error> {
        let bytes = encode(value, encoding)?;
        // a leading U+FEFF reads back as a byte-order mark
        let decoded = decode(&bytes, encoding).ok();
        if decoded.as_deref() != Some(value) {
            let decoded = decoded.unwrap_or_default();
            let mut decoded_chars = decoded.chars();
            let character = value
                .chars()
                .find(|c| decoded_chars.next() != Some(*c))
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(Error::Unencodable {
                encoding: encoding.clone(),
                character,
            });
        }
        Ok(SourceIdentifier {
            value: value.to_string(),
            encoding: encoding.clone(),
        })
    }

    /// The identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The encoding the identifier is reported in.
    pub fn encoding(&self) -> &EncodingName {
        &self.encoding
    }

    /// The identifier encoded in [`SourceIdentifier::encoding`].
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a/>";
    /// let doc = Document::parse(xml, "caf\u{e9}.xml", None)?;
    /// assert_eq!(doc.source_identifier().to_bytes()?, b"caf\xE9.xml");
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        encode(&self.value, &self.encoding)
    }
}

impl Display for SourceIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for SourceIdentifier {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for SourceIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for SourceIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

/// A parsed XML document.
///
/// A document carries the one encoding its bytes were read in. Every string
/// in it, node content and source identifier alike, was decoded from or is
/// reported in that encoding. The encoding is fixed once the document
/// exists.
///
/// ```rust
/// use xmlsniff::Document;
///
/// let doc = Document::parse(b"<root>hi</root>", "/tmp/doc.xml", Some("UTF-8"))?;
/// assert_eq!(doc.encoding(), "UTF-8");
/// assert_eq!(doc.source_identifier(), "/tmp/doc.xml");
/// assert_eq!(doc.text_content(doc.document_element()), "hi");
/// # Ok::<(), xmlsniff::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) arena: XmlArena,
    pub(crate) root: Node,
    pub(crate) document_element: Node,
    pub(crate) encoding: EncodingName,
    pub(crate) source: SourceIdentifier,
    pub(crate) declaration: Option<Declaration>,
}

impl Document {
    /// Parse bytes into a document.
    ///
    /// The encoding is `encoding` if given, otherwise it's detected from a
    /// byte-order mark or the XML declaration, falling back to UTF-8. See
    /// [`detect`](crate::detect) for the details.
    ///
    /// The source identifier is any string naming where the bytes came from,
    /// such as a path or URL. It must be representable in the resolved
    /// encoding, otherwise this fails with [`Error::Unencodable`].
    pub fn parse(
        bytes: &[u8],
        source_identifier: &str,
        encoding: Option<&str>,
    ) -> Result<Document, Error> {
        Self::parse_with_config(bytes, source_identifier, encoding, &ParseConfig::default())
    }

    /// Parse bytes into a document, with explicit parameters.
    ///
    /// ```rust
    /// use xmlsniff::{Document, EncodingName, ParseConfig};
    ///
    /// let config = ParseConfig {
    ///     default_encoding: EncodingName::ISO_8859_1,
    ///     ..Default::default()
    /// };
    /// let doc = Document::parse_with_config(b"<a>\xE9</a>", "a.xml", None, &config)?;
    /// assert_eq!(doc.encoding(), "ISO-8859-1");
    /// assert_eq!(doc.text_content(doc.document_element()), "é");
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn parse_with_config(
        bytes: &[u8],
        source_identifier: &str,
        encoding: Option<&str>,
        config: &ParseConfig,
    ) -> Result<Document, Error> {
        let encoding = detect(bytes, encoding, config)?;
        let source = SourceIdentifier::new(source_identifier, &encoding)?;
        let text = decode_with_config(bytes, &encoding, config)?;
        let document = DocumentBuilder::new(encoding, source).build(&text)?;
        debug!(
            "parsed {} as {} ({} nodes)",
            document.source,
            document.encoding,
            document.arena.count()
        );
        Ok(document)
    }

    /// Parse a string into a document.
    ///
    /// The string is already decoded, so the encoding is UTF-8 whatever the
    /// XML declaration says.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let xml = r#"<?xml version="1.0" encoding="ISO-8859-1"?><a>é</a>"#;
    /// let doc = Document::parse_str(xml, "a.xml")?;
    /// assert_eq!(doc.encoding(), "UTF-8");
    /// assert_eq!(doc.declaration().unwrap().encoding().unwrap(), "ISO-8859-1");
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn parse_str(xml: &str, source_identifier: &str) -> Result<Document, Error> {
        Self::parse(xml.as_bytes(), source_identifier, Some(EncodingName::UTF_8.as_str()))
    }

    /// The encoding the document was read in.
    pub fn encoding(&self) -> &EncodingName {
        &self.encoding
    }

    /// Where the document came from. Its encoding is
    /// [`Document::encoding`].
    pub fn source_identifier(&self) -> &SourceIdentifier {
        &self.source
    }

    /// The XML declaration, if the document has one.
    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// Encode a string in the document's encoding.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let doc = Document::parse(b"<a/>", "a.xml", Some("ISO-8859-1"))?;
    /// assert_eq!(doc.encode_str("é")?, vec![0xE9]);
    /// assert!(doc.encode_str("日本").is_err());
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn encode_str(&self, text: &str) -> Result<Vec<u8>, Error> {
        encode(text, &self.encoding)
    }
}
