use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::encoding::EncodingName;

/// A position in the decoded document text.
///
/// Line and column are 1-based, the column counts characters. The offset is
/// the 0-based byte offset into the decoded (UTF-8) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextPosition {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number, in characters.
    pub column: u32,
    /// 0-based byte offset into the decoded text.
    pub offset: usize,
}

impl TextPosition {
    pub(crate) fn from_offset(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line = before.matches('\n').count() + 1;
        let column = before[line_start..].chars().count() + 1;
        TextPosition {
            line: line as u32,
            column: column as u32,
            offset,
        }
    }

    // xmlparser reports rows and columns only
    pub(crate) fn from_line_column(text: &str, line: u32, column: u32) -> Self {
        let mut offset = 0;
        for (index, current) in text.split_inclusive('\n').enumerate() {
            if index + 1 == line as usize {
                offset += current
                    .char_indices()
                    .nth(column.saturating_sub(1) as usize)
                    .map(|(i, _)| i)
                    .unwrap_or(current.len());
                break;
            }
            offset += current.len();
        }
        TextPosition {
            line,
            column,
            offset,
        }
    }
}

impl Display for TextPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// What is wrong with a structurally invalid document.
#[derive(Debug, Error)]
pub enum DocumentErrorKind {
    /// The tokenizer rejected the input.
    #[error("{0}")]
    Syntax(xmlparser::Error),
    /// A close tag doesn't match the open element.
    #[error("expected close tag </{expected}>, found </{found}>")]
    InvalidCloseTag {
        /// Name of the element that is open.
        expected: String,
        /// Name in the close tag.
        found: String,
    },
    /// The input ended with this element still open.
    #[error("unclosed element <{0}>")]
    UnclosedTag(String),
    /// There is no element in the document.
    #[error("no document element")]
    NoRootElement,
    /// The same attribute appears twice on an element.
    #[error("duplicate attribute {0}")]
    DuplicateAttribute(String),
    /// An entity reference that is not one of the predefined entities.
    #[error("unknown entity &{0};")]
    UnknownEntity(String),
    /// An entity reference without its closing `;`.
    #[error("unclosed entity &{0}")]
    UnclosedEntity(String),
    /// A character reference that does not denote a valid character.
    #[error("invalid character reference &{0};")]
    InvalidCharacterReference(String),
}

/// Xmlsniff errors.
///
/// Every error aborts the whole parse; no partial document is ever returned.
#[derive(Debug, Error)]
pub enum Error {
    /// There is no codec for the resolved encoding.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(EncodingName),
    /// The bytes are not valid in the resolved encoding.
    #[error("malformed {encoding} input at byte {offset}")]
    MalformedInput {
        /// The encoding used to decode.
        encoding: EncodingName,
        /// Byte offset of the first malformed sequence in the input.
        offset: usize,
    },
    /// A character can't be represented in the encoding.
    #[error("cannot encode {character:?} in {encoding}")]
    Unencodable {
        /// The target encoding.
        encoding: EncodingName,
        /// The first character that has no representation.
        character: char,
    },
    /// The document is not well-formed XML.
    #[error("malformed document at {position}: {kind}")]
    MalformedDocument {
        /// What went wrong.
        kind: DocumentErrorKind,
        /// Where in the decoded text it went wrong.
        position: TextPosition,
    },
}

impl Error {
    /// The position of a document error, if this is one.
    pub fn position(&self) -> Option<TextPosition> {
        match self {
            Error::MalformedDocument { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub(crate) fn document(kind: DocumentErrorKind, text: &str, offset: usize) -> Self {
        Error::MalformedDocument {
            kind,
            position: TextPosition::from_offset(text, offset),
        }
    }

    pub(crate) fn syntax(e: xmlparser::Error, text: &str) -> Self {
        let pos = e.pos();
        Error::MalformedDocument {
            kind: DocumentErrorKind::Syntax(e),
            position: TextPosition::from_line_column(text, pos.row, pos.col),
        }
    }
}
