use crate::access::NodeEdge;
use crate::document::Document;

impl Document {
    /// Compare the trees of two documents.
    ///
    /// Two trees are the same if they have the same structure and equal
    /// values in the same places. Encoding, source identifier and
    /// declaration are not compared; `==` on documents compares those too.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let a = Document::parse_str("<a x='1'>text</a>", "a.xml")?;
    /// let b = Document::parse_str(r#"<a x="1">te<![CDATA[xt]]></a>"#, "b.xml")?;
    /// let c = Document::parse_str("<a x='2'>text</a>", "c.xml")?;
    /// assert!(a.same_content(&b));
    /// assert!(!a.same_content(&c));
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn same_content(&self, other: &Document) -> bool {
        let mut ours = self.traverse(self.root());
        let mut theirs = other.traverse(other.root());
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(NodeEdge::Start(a)), Some(NodeEdge::Start(b))) => {
                    if self.value(a) != other.value(b) {
                        return false;
                    }
                }
                (Some(NodeEdge::End(_)), Some(NodeEdge::End(_))) => {}
                _ => return false,
            }
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.encoding == other.encoding
            && self.source == other.source
            && self.declaration == other.declaration
            && self.same_content(other)
    }
}

impl Eq for Document {}
