//! Byte-order-mark and byte layout detection.
//!
//! Only the first four bytes are ever looked at.
//!
//! | Bytes         | Result
//! |---------------|-----------------------------
//! | **BOM**       |
//! | `00 00 FE FF` | UTF-32BE
//! | `FF FE 00 00` | UTF-32LE
//! | `EF BB BF`    | UTF-8
//! | `FE FF`       | UTF-16BE
//! | `FF FE`       | UTF-16LE
//! | **No BOM**    |
//! | `00 00 00 3C` | UTF-32BE layout
//! | `3C 00 00 00` | UTF-32LE layout
//! | `00 3C 00 3F` | UTF-16BE layout
//! | `3C 00 3F 00` | UTF-16LE layout
//!
//! UTF-32LE is checked before UTF-16LE, as its mark starts with the UTF-16LE
//! mark.

use crate::encoding::EncodingName;

const BOMS: &[(&[u8], EncodingName)] = &[
    (&[0x00, 0x00, 0xFE, 0xFF], EncodingName::UTF_32BE),
    (&[0xFF, 0xFE, 0x00, 0x00], EncodingName::UTF_32LE),
    (&[0xEF, 0xBB, 0xBF], EncodingName::UTF_8),
    (&[0xFE, 0xFF], EncodingName::UTF_16BE),
    (&[0xFF, 0xFE], EncodingName::UTF_16LE),
];

const LAYOUTS: &[(&[u8], EncodingName)] = &[
    (&[0x00, 0x00, 0x00, 0x3C], EncodingName::UTF_32BE),
    (&[0x3C, 0x00, 0x00, 0x00], EncodingName::UTF_32LE),
    (&[0x00, 0x3C, 0x00, 0x3F], EncodingName::UTF_16BE),
    (&[0x3C, 0x00, 0x3F, 0x00], EncodingName::UTF_16LE),
];

/// Detect the encoding from a byte-order mark.
///
/// Returns [`None`] if the bytes don't start with a recognized mark. The
/// mark is not consumed.
///
/// ```rust
/// use xmlsniff::{sniff, EncodingName};
///
/// assert_eq!(sniff(b"\xEF\xBB\xBF<a/>"), Some(EncodingName::UTF_8));
/// assert_eq!(sniff(b"\xFF\xFE<\x00"), Some(EncodingName::UTF_16LE));
/// assert_eq!(sniff(b"<a/>"), None);
/// ```
pub fn sniff(bytes: &[u8]) -> Option<EncodingName> {
    BOMS.iter()
        .find(|(bom, _)| bytes.starts_with(bom))
        .map(|(_, name)| name.clone())
}

/// The length of the byte-order mark at the start of the bytes, or 0.
pub fn bom_length(bytes: &[u8]) -> usize {
    BOMS.iter()
        .find(|(bom, _)| bytes.starts_with(bom))
        .map(|(bom, _)| bom.len())
        .unwrap_or(0)
}

/// Detect a UTF-16 or UTF-32 byte layout without a byte-order mark.
///
/// This recognizes how `<` (and `<?` for UTF-16) is laid out in the wide
/// encodings. ASCII-compatible layouts give no result, as their encoding can
/// only be known from the declaration.
pub fn sniff_layout(bytes: &[u8]) -> Option<EncodingName> {
    LAYOUTS
        .iter()
        .find(|(layout, _)| bytes.starts_with(layout))
        .map(|(_, name)| name.clone())
}

/// Project the bytes of a wide layout onto their low-order bytes, so that
/// ASCII text in them can be scanned as single bytes.
///
/// For anything that isn't a fixed-width layout the bytes are returned as
/// they are.
pub(crate) fn ascii_projection(bytes: &[u8], layout: &EncodingName) -> Vec<u8> {
    let (width, position) = match layout.as_str() {
        "UTF-16LE" => (2, 0),
        "UTF-16BE" => (2, 1),
        "UTF-32LE" => (4, 0),
        "UTF-32BE" => (4, 3),
        _ => return bytes.to_vec(),
    };
    bytes
        .chunks_exact(width)
        .map(|unit| {
            let is_ascii = unit
                .iter()
                .enumerate()
                .all(|(i, b)| i == position || *b == 0);
            if is_ascii {
                unit[position]
            } else {
                // never matches any of the declaration syntax
                0xFF
            }
        })
        .collect()
}
