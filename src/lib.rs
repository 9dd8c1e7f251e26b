//! Parse XML bytes into a tree, resolving the one encoding the document is
//! read in.
//!
//! The encoding comes from the caller if given, otherwise from a byte-order
//! mark, otherwise from the XML declaration, otherwise UTF-8. The resolved
//! encoding is fixed for the lifetime of the [`Document`] and is the
//! encoding its [`SourceIdentifier`] is reported in.
//!
//! ```rust
//! use xmlsniff::Document;
//!
//! let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><p>caf\xE9</p>";
//! let doc = Document::parse(xml, "menu.xml", None)?;
//! assert_eq!(doc.encoding(), "ISO-8859-1");
//! assert_eq!(doc.text_content(doc.document_element()), "café");
//! # Ok::<(), xmlsniff::Error>(())
//! ```
#![forbid(unsafe_code)]

mod access;
mod compare;
mod config;
mod declaration;
mod decode;
mod document;
mod encoding;
mod entity;
mod error;
mod parse;
mod resolve;
mod sniff;
mod valueaccess;
mod xmlvalue;

pub use access::NodeEdge;
pub use config::{ParseConfig, DEFAULT_CHUNK_SIZE};
pub use declaration::{scan, scan_window, DEFAULT_WINDOW};
pub use decode::{decode, decode_with_config, encode, StreamDecoder};
pub use document::{Document, Node, SourceIdentifier};
pub use encoding::EncodingName;
pub use error::{DocumentErrorKind, Error, TextPosition};
pub use resolve::{detect, resolve};
pub use sniff::{bom_length, sniff, sniff_layout};
pub use xmlvalue::{
    Attribute, Comment, Declaration, Element, ProcessingInstruction, Text, Value, ValueType,
};
