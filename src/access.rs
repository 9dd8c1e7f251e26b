use indextree::NodeEdge as IndexTreeNodeEdge;

use crate::document::{Document, Node};

/// Node edges.
///
/// Used by [`Document::traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEdge {
    /// The start edge of a node. In case of an element
    /// this is the start tag. In case of root
    /// the start of the document.
    Start(Node),
    /// The end edge of a node. In case of an element
    /// this is the end tag. In case of root the end
    /// of the document. For any other values, the
    /// end edge occurs immediately after the start
    /// edge.
    End(Node),
}

/// ## Read-only access
impl Document {
    /// The document root.
    ///
    /// This holds the document element along with any comments and
    /// processing instructions outside it.
    pub fn root(&self) -> Node {
        self.root
    }

    /// The document element, the single element under the root.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let doc = Document::parse_str("<!-- c --><p>Example</p>", "p.xml")?;
    /// let p = doc.document_element();
    /// assert_eq!(doc.element(p).unwrap().name(), "p");
    /// assert_eq!(doc.parent(p), Some(doc.root()));
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn document_element(&self) -> Node {
        self.document_element
    }

    /// Get parent node.
    ///
    /// Returns [`None`] for the document root.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let doc = Document::parse_str("<p>Example</p>", "p.xml")?;
    /// let p = doc.document_element();
    /// let text = doc.first_child(p).unwrap();
    /// assert_eq!(doc.parent(text), Some(p));
    /// assert_eq!(doc.parent(doc.root()), None);
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].parent().map(Node::new)
    }

    /// Get first child.
    ///
    /// Returns [`None`] if there are no children.
    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].first_child().map(Node::new)
    }

    /// Get last child.
    ///
    /// Returns [`None`] if there are no children.
    pub fn last_child(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].last_child().map(Node::new)
    }

    /// Get next sibling.
    ///
    /// Returns [`None`] if there is no next sibling.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let doc = Document::parse_str("<p><a/><b/></p>", "p.xml")?;
    /// let a = doc.first_child(doc.document_element()).unwrap();
    /// let b = doc.next_sibling(a).unwrap();
    /// assert_eq!(doc.next_sibling(b), None);
    /// assert_eq!(doc.previous_sibling(b), Some(a));
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].next_sibling().map(Node::new)
    }

    /// Get previous sibling.
    ///
    /// Returns [`None`] if there is no previous sibling.
    pub fn previous_sibling(&self, node: Node) -> Option<Node> {
        self.arena[node.get()].previous_sibling().map(Node::new)
    }

    /// Iterator over ancestor nodes, including this one.
    ///
    /// ```rust
    /// use xmlsniff::Document;
    ///
    /// let doc = Document::parse_str("<a><b><c/></b></a>", "a.xml")?;
    /// let a = doc.document_element();
    /// let b = doc.first_child(a).unwrap();
    /// let c = doc.first_child(b).unwrap();
    ///
    /// let ancestors = doc.ancestors(c).collect::<Vec<_>>();
    /// assert_eq!(ancestors, vec![c, b, a, doc.root()]);
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().ancestors(&self.arena).map(Node::new)
    }

    /// Iterator over the child nodes of this node.
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(&self.arena).map(Node::new)
    }

    /// Iterator over the descendants of this node, including this one, in
    /// document order.
    pub fn descendants(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().descendants(&self.arena).map(Node::new)
    }

    /// Traverse over node edges.
    ///
    /// For the tree `<a><b/></a>` this generates a [`NodeEdge::Start`] for
    /// `<a>`, then a [`NodeEdge::Start`] for `<b>`, immediately followed by a
    /// [`NodeEdge::End`] for `<b>`, and finally a [`NodeEdge::End`] for `<a>`.
    ///
    /// ```rust
    /// use xmlsniff::{Document, NodeEdge};
    ///
    /// let doc = Document::parse_str("<a><b>Text</b></a>", "a.xml")?;
    /// let a = doc.document_element();
    /// let b = doc.first_child(a).unwrap();
    /// let text = doc.first_child(b).unwrap();
    /// let edges = doc.traverse(a).collect::<Vec<_>>();
    /// assert_eq!(edges, vec![
    ///  NodeEdge::Start(a),
    ///  NodeEdge::Start(b),
    ///  NodeEdge::Start(text),
    ///  NodeEdge::End(text),
    ///  NodeEdge::End(b),
    ///  NodeEdge::End(a),
    /// ]);
    /// # Ok::<(), xmlsniff::Error>(())
    /// ```
    pub fn traverse(&self, node: Node) -> impl Iterator<Item = NodeEdge> + '_ {
        node.get().traverse(&self.arena).map(|edge| match edge {
            IndexTreeNodeEdge::Start(node_id) => NodeEdge::Start(Node::new(node_id)),
            IndexTreeNodeEdge::End(node_id) => NodeEdge::End(Node::new(node_id)),
        })
    }
}
