use crate::document::{Document, Node};
use crate::xmlvalue::{Comment, Element, ProcessingInstruction, Text, Value, ValueType};

/// Obtain XML values and their types.
///
/// These are handy if you only need to match against a single value or know
/// the value type already. If you want to handle all value types, use a
/// `match` statement on [`Value`](crate::xmlvalue::Value) instead.
impl Document {
    /// Access to the XML value for this node.
    ///
    /// ```rust
    /// use xmlsniff::{Document, Value};
    ///
    /// let doc = Document::parse_str("<doc>Example</doc>", "doc.xml")?;
    ///
    /// match doc.value(doc.document_element()) {
    ///    Value::Element(element) => {
    ///       assert_eq!(element.name(), "doc");
    ///   }
    ///   _ => { }
    /// }
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        self.arena[node.get()].get()
    }

    /// Get the [`ValueType`](crate::xmlvalue::ValueType) of a node.
    pub fn value_type(&self, node: Node) -> ValueType {
        self.value(node).value_type()
    }

    /// Return true if node is an element.
    pub fn is_element(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::Element
    }

    /// Return true if node is text.
    pub fn is_text(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::Text
    }

    /// If this node's value is text, return a reference to it.
    pub fn text(&self, node: Node) -> Option<&Text> {
        if let Value::Text(text) = self.value(node) {
            Some(text)
        } else {
            None
        }
    }

    /// If this node's value is text, return a reference to the string.
    pub fn text_str(&self, node: Node) -> Option<&str> {
        self.text(node).map(|n| n.get())
    }

    /// If this node's value is an element, return a reference to it.
    pub fn element(&self, node: Node) -> Option<&Element> {
        if let Value::Element(element) = self.value(node) {
            Some(element)
        } else {
            None
        }
    }

    /// If this node's value is a comment, return a reference to it.
    pub fn comment(&self, node: Node) -> Option<&Comment> {
        if let Value::Comment(comment) = self.value(node) {
            Some(comment)
        } else {
            None
        }
    }

    /// If this node's value is a processing instruction, return a reference
    /// to it.
    pub fn processing_instruction(&self, node: Node) -> Option<&ProcessingInstruction> {
        if let Value::ProcessingInstruction(pi) = self.value(node) {
            Some(pi)
        } else {
            None
        }
    }

    /// All text under this node, concatenated in document order.
    ///
    /// Comments and processing instructions don't contribute.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let doc = Document::parse_str("<p>a<b>b</b><!--x-->c</p>", "p.xml")?;
    /// assert_eq!(doc.text_content(doc.document_element()), "abc");
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn text_content(&self, node: Node) -> String {
        self.descendants(node)
            .filter_map(|node| self.text_str(node))
            .collect()
    }
}
