use crate::encoding::EncodingName;

/// The type of the XML node.
///
/// Access it using [`Value::value_type`] or
/// [`Document::value_type`](crate::Document::value_type).
///
/// The `ValueType` can be used if you are interested in
/// the type of the value without needing to match on it.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueType {
    /// Document root that holds everything.
    /// Note that this not the same as the document
    /// element.
    Root,
    /// Element; it has a name and attributes.
    Element,
    /// Text.
    Text,
    /// Processing instruction
    ProcessingInstruction,
    /// Comment.
    Comment,
}

/// An XML value.
///
/// Access it using [`Document::value`](crate::Document::value).
///
/// All string content is decoded text; the encoding it was read in is
/// [`Document::encoding`](crate::Document::encoding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Document root that holds everything. Note that this not the same as the document
    /// element.
    Root,
    /// Element; it has a name and attributes.
    Element(Element),
    /// Text.
    Text(Text),
    /// Processing instruction.
    ProcessingInstruction(ProcessingInstruction),
    /// Comment.
    Comment(Comment),
}

impl Value {
    /// Returns the type of the XML value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Root => ValueType::Root,
            Value::Element(_) => ValueType::Element,
            Value::Text(_) => ValueType::Text,
            Value::Comment(_) => ValueType::Comment,
            Value::ProcessingInstruction(_) => ValueType::ProcessingInstruction,
        }
    }
}

/// An attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) value: String,
}

impl Attribute {
    /// The qualified name, including a prefix if there is one.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute value, with references expanded.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// XML element value.
///
/// Example: `<foo/>` or `<foo bar="baz"/>`.
///
/// Names are kept as written, prefix included; namespaces are not resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) prefix_len: usize,
    pub(crate) attributes: Vec<Attribute>,
}

impl Element {
    pub(crate) fn new(prefix: &str, local: &str) -> Self {
        let name = if prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{}", prefix, local)
        };
        Element {
            name,
            prefix_len: prefix.len(),
            attributes: Vec::new(),
        }
    }

    /// The qualified name of the element.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let doc = Document::parse_str(r#"<x:doc xmlns:x="urn:x"/>"#, "example.xml")?;
    /// let element = doc.element(doc.document_element()).unwrap();
    /// assert_eq!(element.name(), "x:doc");
    /// assert_eq!(element.prefix(), "x");
    /// assert_eq!(element.local_name(), "doc");
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The prefix, or the empty string.
    pub fn prefix(&self) -> &str {
        &self.name[..self.prefix_len]
    }

    /// The name without its prefix.
    pub fn local_name(&self) -> &str {
        if self.prefix_len == 0 {
            &self.name
        } else {
            &self.name[self.prefix_len + 1..]
        }
    }

    /// The attributes of the element, in document order.
    ///
    /// Namespace declarations are included as ordinary attributes.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Get an attribute value by qualified name.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let doc = Document::parse_str(r#"<doc a="A &amp; B" />"#, "example.xml")?;
    /// let element = doc.element(doc.document_element()).unwrap();
    ///
    /// assert_eq!(element.get_attribute("a"), Some("A & B"));
    /// assert_eq!(element.get_attribute("b"), None);
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }
}

/// XML text value.
///
/// Example: `Bar` in `<foo>Bar</foo>`, or `hello` and `world` in `<greeting>hello<sep/>world</greeting>`.
///
/// CDATA sections are text too; adjacent text and CDATA end up in a single
/// text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub(crate) text: String,
}

impl Text {
    pub(crate) fn new(text: String) -> Self {
        Text { text }
    }

    /// Get the text value.
    ///
    /// See [`Document::text_str`](`crate::Document::text_str`) and
    /// [`Document::text_content`](`crate::Document::text_content`) for more
    /// convenient ways to get text values.
    pub fn get(&self) -> &str {
        &self.text
    }
}

/// XML comment.
///
/// Example: `<!-- foo -->`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    /// Get the comment text.
    pub fn get(&self) -> &str {
        &self.text
    }
}

/// XML processing instruction value.
///
/// Example: `<?foo?>` or `<?foo bar?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: Option<String>,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: Option<String>) -> Self {
        ProcessingInstruction { target, data }
    }

    /// Get processing instruction target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get processing instruction data.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

/// The XML declaration, as written in the document.
///
/// The encoding here is only what the declaration claims; the encoding the
/// document was actually read in is
/// [`Document::encoding`](crate::Document::encoding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub(crate) version: String,
    pub(crate) encoding: Option<EncodingName>,
    pub(crate) standalone: Option<bool>,
}

impl Declaration {
    /// The XML version, normally `1.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The encoding named in the declaration.
    pub fn encoding(&self) -> Option<&EncodingName> {
        self.encoding.as_ref()
    }

    /// The standalone flag, if given.
    pub fn standalone(&self) -> Option<bool> {
        self.standalone
    }
}
