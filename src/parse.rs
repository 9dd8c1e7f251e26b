use ahash::HashSet;
use indextree::NodeId;
use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

use crate::document::{Document, Node, SourceIdentifier, XmlArena};
use crate::encoding::EncodingName;
use crate::entity::{parse_attribute, parse_cdata, parse_text, EntityError};
use crate::error::{DocumentErrorKind, Error};
use crate::xmlvalue::{
    Attribute, Comment, Declaration, Element, ProcessingInstruction, Text, Value,
};

fn qualified_name(prefix: &StrSpan, local: &StrSpan) -> String {
    if prefix.as_str().is_empty() {
        local.as_str().to_string()
    } else {
        format!("{}:{}", prefix.as_str(), local.as_str())
    }
}

/// Builds the node tree from tokens.
///
/// The encoding is fixed when the builder is created, before the first node
/// exists.
pub(crate) struct DocumentBuilder {
    encoding: EncodingName,
    source: SourceIdentifier,
    arena: XmlArena,
    root: NodeId,
    current: NodeId,
    // start offsets of the open elements, innermost last
    open: Vec<usize>,
    element: Option<(Element, usize)>,
    attribute_names: HashSet<String>,
    document_element: Option<NodeId>,
    declaration: Option<Declaration>,
}

impl DocumentBuilder {
    pub(crate) fn new(encoding: EncodingName, source: SourceIdentifier) -> Self {
        let mut arena = XmlArena::new();
        let root = arena.new_node(Value::Root);
        DocumentBuilder {
            encoding,
            source,
            arena,
            root,
            current: root,
            open: Vec::new(),
            element: None,
            attribute_names: HashSet::default(),
            document_element: None,
            declaration: None,
        }
    }

    pub(crate) fn build(mut self, text: &str) -> Result<Document, Error> {
        for token in Tokenizer::from(text) {
            let token = token.map_err(|e| Error::syntax(e, text))?;
            self.token(token, text)?;
        }

        if let Some(start) = self.open.last() {
            let name = self.current_name().to_string();
            return Err(Error::document(
                DocumentErrorKind::UnclosedTag(name),
                text,
                *start,
            ));
        }
        let Some(document_element) = self.document_element else {
            return Err(Error::document(
                DocumentErrorKind::NoRootElement,
                text,
                text.len(),
            ));
        };

        Ok(Document {
            arena: self.arena,
            root: Node::new(self.root),
            document_element: Node::new(document_element),
            encoding: self.encoding,
            source: self.source,
            declaration: self.declaration,
        })
    }

    fn token(&mut self, token: Token<'_>, text: &str) -> Result<(), Error> {
        match token {
            Token::Declaration {
                version,
                encoding,
                standalone,
                ..
            } => {
                self.declaration = Some(Declaration {
                    version: version.as_str().to_string(),
                    encoding: encoding.map(|encoding| EncodingName::new(encoding.as_str())),
                    standalone,
                });
            }
            Token::ProcessingInstruction {
                target, content, ..
            } => {
                let pi = ProcessingInstruction::new(
                    target.as_str().to_string(),
                    content.map(|content| content.as_str().to_string()),
                );
                self.add(Value::ProcessingInstruction(pi));
            }
            Token::Comment { text: comment, .. } => {
                self.add(Value::Comment(Comment::new(comment.as_str().to_string())));
            }
            Token::DtdStart { .. }
            | Token::EmptyDtd { .. }
            | Token::EntityDeclaration { .. }
            | Token::DtdEnd { .. } => {}
            // a second top-level element is a tokenizer error
            Token::ElementStart {
                prefix,
                local,
                span,
            } => {
                self.attribute_names.clear();
                self.element = Some((Element::new(prefix.as_str(), local.as_str()), span.start()));
            }
            Token::Attribute {
                prefix,
                local,
                value,
                span,
            } => {
                let name = qualified_name(&prefix, &local);
                if !self.attribute_names.insert(name.clone()) {
                    return Err(Error::document(
                        DocumentErrorKind::DuplicateAttribute(name),
                        text,
                        span.start(),
                    ));
                }
                let expanded = parse_attribute(value.as_str())
                    .map_err(|e| entity_error(e, text, value.start()))?;
                if let Some((element, _)) = &mut self.element {
                    element.attributes.push(Attribute {
                        name,
                        value: expanded.into_owned(),
                    });
                }
            }
            Token::ElementEnd { end, span } => match end {
                ElementEnd::Open => self.open_element(),
                ElementEnd::Empty => {
                    self.open_element();
                    self.close_element();
                }
                ElementEnd::Close(prefix, local) => {
                    let found = qualified_name(&prefix, &local);
                    if self.open.is_empty() || self.current_name() != found {
                        return Err(Error::document(
                            DocumentErrorKind::InvalidCloseTag {
                                expected: self.current_name().to_string(),
                                found,
                            },
                            text,
                            span.start(),
                        ));
                    }
                    self.close_element();
                }
            },
            Token::Text { text: content } => {
                // whitespace around the document element is dropped
                if self.current == self.root {
                    return Ok(());
                }
                let expanded = parse_text(content.as_str())
                    .map_err(|e| entity_error(e, text, content.start()))?;
                self.add_text(&expanded);
            }
            Token::Cdata { text: content, .. } => {
                if self.current != self.root {
                    self.add_text(&parse_cdata(content.as_str()));
                }
            }
        }
        Ok(())
    }

    fn current_name(&self) -> &str {
        match self.arena[self.current].get() {
            Value::Element(element) => element.name(),
            _ => "",
        }
    }

    fn add(&mut self, value: Value) -> NodeId {
        let node_id = self.arena.new_node(value);
        self.current.append(node_id, &mut self.arena);
        node_id
    }

    fn add_text(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        if let Some(last) = self.arena[self.current].last_child() {
            if let Value::Text(text) = self.arena[last].get_mut() {
                text.text.push_str(content);
                return;
            }
        }
        self.add(Value::Text(Text::new(content.to_string())));
    }

    fn open_element(&mut self) {
        if let Some((element, start)) = self.element.take() {
            let at_root = self.current == self.root;
            let node_id = self.add(Value::Element(element));
            if at_root {
                self.document_element = Some(node_id);
            }
            self.current = node_id;
            self.open.push(start);
        }
    }

    fn close_element(&mut self) {
        if self.open.pop().is_some() {
            if let Some(parent) = self.arena[self.current].parent() {
                self.current = parent;
            }
        }
    }
}

fn entity_error(e: EntityError, text: &str, start: usize) -> Error {
    Error::document(e.kind, text, start + e.offset)
}
