use crate::declaration::DEFAULT_WINDOW;
use crate::encoding::EncodingName;

/// The default number of bytes decoded at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Parameters for encoding resolution and decoding.
///
/// These are passed explicitly; there is no process-wide default that can be
/// changed. Use struct update syntax to change only some of them:
///
/// ```rust
/// use xmlsniff::{EncodingName, ParseConfig};
///
/// let config = ParseConfig {
///     default_encoding: EncodingName::ISO_8859_1,
///     ..Default::default()
/// };
/// assert_eq!(config.declaration_window, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ParseConfig {
    /// Encoding used when there is no override, byte-order mark or
    /// declaration.
    pub default_encoding: EncodingName,
    /// How many leading bytes are searched for the XML declaration.
    pub declaration_window: usize,
    /// How many bytes are decoded at a time.
    pub chunk_size: usize,
    /// Whether a UTF-16 or UTF-32 byte layout without a byte-order mark is
    /// recognized.
    pub detect_layout: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            default_encoding: EncodingName::UTF_8,
            declaration_window: DEFAULT_WINDOW,
            chunk_size: DEFAULT_CHUNK_SIZE,
            detect_layout: true,
        }
    }
}
