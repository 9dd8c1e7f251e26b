use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::Error;

// canonical name first, then every label that folds into it
const ALIASES: &[(&str, &[&str])] = &[
    (
        "UTF-8",
        &[
            "utf-8",
            "utf8",
            "unicode-1-1-utf-8",
            "unicode11utf8",
            "unicode20utf8",
            "x-unicode20utf8",
        ],
    ),
    (
        "UTF-16",
        &["utf-16", "utf16", "ucs-2", "iso-10646-ucs-2", "csunicode"],
    ),
    ("UTF-16LE", &["utf-16le", "utf16le", "x-utf-16le"]),
    ("UTF-16BE", &["utf-16be", "utf16be", "x-utf-16be"]),
    ("UTF-32", &["utf-32", "utf32", "ucs-4", "iso-10646-ucs-4"]),
    ("UTF-32LE", &["utf-32le", "utf32le"]),
    ("UTF-32BE", &["utf-32be", "utf32be"]),
    (
        "ISO-8859-1",
        &[
            "iso-8859-1",
            "iso8859-1",
            "iso88591",
            "iso_8859-1",
            "iso_8859-1:1987",
            "iso-ir-100",
            "latin1",
            "l1",
            "cp819",
            "ibm819",
            "csisolatin1",
        ],
    ),
    (
        "US-ASCII",
        &[
            "us-ascii",
            "ascii",
            "us",
            "ansi_x3.4-1968",
            "iso646-us",
            "iso-ir-6",
            "ibm367",
            "cp367",
            "csascii",
        ],
    ),
];

fn canonicalize(label: &str) -> Cow<'static, str> {
    let label = label.trim_matches(|c: char| c.is_ascii_whitespace());
    for (canonical, aliases) in ALIASES {
        if aliases.iter().any(|alias| alias.eq_ignore_ascii_case(label)) {
            return Cow::Borrowed(*canonical);
        }
    }
    Cow::Owned(label.to_ascii_uppercase())
}

/// The name of a text encoding.
///
/// Names are canonicalized when they are created: well-known aliases fold
/// into one spelling (`utf8` becomes `UTF-8`, `latin1` becomes `ISO-8859-1`)
/// and anything else is upper-cased. Two names that denote the same encoding
/// label therefore compare equal.
///
/// ```rust
/// use xmlsniff::EncodingName;
///
/// assert_eq!(EncodingName::new("utf8"), EncodingName::UTF_8);
/// assert_eq!(EncodingName::new("Latin1").as_str(), "ISO-8859-1");
/// assert_eq!(EncodingName::new("shift_jis"), "SHIFT_JIS");
/// ```
///
/// Creating a name never fails; whether there is a codec for it is a
/// separate question answered by [`EncodingName::is_supported`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct EncodingName(Cow<'static, str>);

impl EncodingName {
    /// UTF-8, the XML default.
    pub const UTF_8: EncodingName = EncodingName(Cow::Borrowed("UTF-8"));
    /// UTF-16 with the byte order taken from a byte-order mark.
    pub const UTF_16: EncodingName = EncodingName(Cow::Borrowed("UTF-16"));
    /// UTF-16, little-endian.
    pub const UTF_16LE: EncodingName = EncodingName(Cow::Borrowed("UTF-16LE"));
    /// UTF-16, big-endian.
    pub const UTF_16BE: EncodingName = EncodingName(Cow::Borrowed("UTF-16BE"));
    /// UTF-32 with the byte order taken from a byte-order mark.
    pub const UTF_32: EncodingName = EncodingName(Cow::Borrowed("UTF-32"));
    /// UTF-32, little-endian.
    pub const UTF_32LE: EncodingName = EncodingName(Cow::Borrowed("UTF-32LE"));
    /// UTF-32, big-endian.
    pub const UTF_32BE: EncodingName = EncodingName(Cow::Borrowed("UTF-32BE"));
    /// ISO-8859-1 (Latin-1).
    pub const ISO_8859_1: EncodingName = EncodingName(Cow::Borrowed("ISO-8859-1"));
    /// US-ASCII.
    pub const US_ASCII: EncodingName = EncodingName(Cow::Borrowed("US-ASCII"));

    /// Create a canonical encoding name from a label.
    pub fn new(label: &str) -> Self {
        EncodingName(canonicalize(label))
    }

    /// The canonical spelling.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether there is a codec for this encoding.
    pub fn is_supported(&self) -> bool {
        Codec::lookup(self).is_some()
    }

    /// The encoding family: `UTF-16` for both byte orders of UTF-16, `UTF-32`
    /// likewise, and the name itself otherwise.
    pub fn family(&self) -> &str {
        match self.as_str() {
            "UTF-16LE" | "UTF-16BE" => "UTF-16",
            "UTF-32LE" | "UTF-32BE" => "UTF-32",
            other => other,
        }
    }

    /// True if both names are equal, or one is the byte-order specific form
    /// of the other.
    pub(crate) fn is_compatible_with(&self, other: &EncodingName) -> bool {
        self == other || self.family() == other.as_str() || other.family() == self.as_str()
    }

    pub(crate) fn codec(&self) -> Result<Codec, Error> {
        Codec::lookup(self).ok_or_else(|| Error::UnsupportedEncoding(self.clone()))
    }
}

impl Display for EncodingName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EncodingName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for EncodingName {
    fn from(label: &str) -> Self {
        EncodingName::new(label)
    }
}

impl From<String> for EncodingName {
    fn from(label: String) -> Self {
        EncodingName::new(&label)
    }
}

impl From<EncodingName> for String {
    fn from(name: EncodingName) -> Self {
        name.0.into_owned()
    }
}

impl PartialEq<str> for EncodingName {
    fn eq(&self, other: &str) -> bool {
        self.0 == canonicalize(other)
    }
}

impl PartialEq<&str> for EncodingName {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    Little,
    Big,
}

/// The closed set of codecs, selected from an [`EncodingName`].
///
/// `None` byte order means: take it from a byte-order mark, big-endian if
/// there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Codec {
    Utf8,
    Utf16(Option<ByteOrder>),
    Utf32(Option<ByteOrder>),
    Latin1,
    Ascii,
    Legacy(&'static Encoding),
}

impl Codec {
    pub(crate) fn lookup(name: &EncodingName) -> Option<Codec> {
        let codec = match name.as_str() {
            "UTF-8" => Codec::Utf8,
            "UTF-16" => Codec::Utf16(None),
            "UTF-16LE" => Codec::Utf16(Some(ByteOrder::Little)),
            "UTF-16BE" => Codec::Utf16(Some(ByteOrder::Big)),
            "UTF-32" => Codec::Utf32(None),
            "UTF-32LE" => Codec::Utf32(Some(ByteOrder::Little)),
            "UTF-32BE" => Codec::Utf32(Some(ByteOrder::Big)),
            "ISO-8859-1" => Codec::Latin1,
            "US-ASCII" => Codec::Ascii,
            other => {
                let encoding = Encoding::for_label_no_replacement(other.as_bytes())?;
                if encoding == UTF_8 {
                    Codec::Utf8
                } else if encoding == UTF_16LE {
                    Codec::Utf16(Some(ByteOrder::Little))
                } else if encoding == UTF_16BE {
                    Codec::Utf16(Some(ByteOrder::Big))
                } else {
                    Codec::Legacy(encoding)
                }
            }
        };
        Some(codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_aliases() {
        assert_eq!(EncodingName::new("utf8"), EncodingName::UTF_8);
        assert_eq!(EncodingName::new(" UTF-8 "), EncodingName::UTF_8);
        assert_eq!(EncodingName::new("latin1"), EncodingName::ISO_8859_1);
        assert_eq!(EncodingName::new("ISO_8859-1"), EncodingName::ISO_8859_1);
        assert_eq!(EncodingName::new("ascii"), EncodingName::US_ASCII);
        assert_eq!(EncodingName::new("ucs-2"), EncodingName::UTF_16);
    }

    #[test]
    fn test_unknown_labels_are_uppercased() {
        assert_eq!(EncodingName::new("windows-1252").as_str(), "WINDOWS-1252");
        assert_eq!(EncodingName::new("bogus").as_str(), "BOGUS");
    }

    #[test]
    fn test_compare_with_str() {
        assert_eq!(EncodingName::UTF_8, "utf-8");
        assert_eq!(EncodingName::UTF_16LE, "UTF-16le");
        assert_ne!(EncodingName::UTF_16LE, "UTF-16");
    }

    #[test]
    fn test_family() {
        assert_eq!(EncodingName::UTF_16LE.family(), "UTF-16");
        assert_eq!(EncodingName::UTF_32BE.family(), "UTF-32");
        assert_eq!(EncodingName::UTF_8.family(), "UTF-8");
        assert!(EncodingName::UTF_16LE.is_compatible_with(&EncodingName::UTF_16));
        assert!(EncodingName::UTF_16.is_compatible_with(&EncodingName::UTF_16BE));
        assert!(!EncodingName::UTF_16LE.is_compatible_with(&EncodingName::UTF_16BE));
        assert!(!EncodingName::UTF_8.is_compatible_with(&EncodingName::ISO_8859_1));
    }

    #[test]
    fn test_lookup_builtin() {
        assert_eq!(Codec::lookup(&EncodingName::UTF_8), Some(Codec::Utf8));
        assert_eq!(
            Codec::lookup(&EncodingName::UTF_16),
            Some(Codec::Utf16(None))
        );
        assert_eq!(
            Codec::lookup(&EncodingName::UTF_32LE),
            Some(Codec::Utf32(Some(ByteOrder::Little)))
        );
        // true latin-1, not the windows-1252 superset
        assert_eq!(Codec::lookup(&EncodingName::ISO_8859_1), Some(Codec::Latin1));
        assert_eq!(Codec::lookup(&EncodingName::US_ASCII), Some(Codec::Ascii));
    }

    #[test]
    fn test_lookup_legacy() {
        assert_eq!(
            Codec::lookup(&EncodingName::new("windows-1252")),
            Some(Codec::Legacy(encoding_rs::WINDOWS_1252))
        );
        assert_eq!(
            Codec::lookup(&EncodingName::new("Shift_JIS")),
            Some(Codec::Legacy(encoding_rs::SHIFT_JIS))
        );
        assert_eq!(
            Codec::lookup(&EncodingName::new("unicodefffe")),
            Some(Codec::Utf16(Some(ByteOrder::Big)))
        );
    }

    #[test]
    fn test_lookup_unsupported() {
        assert!(!EncodingName::new("UTF-7").is_supported());
        assert!(!EncodingName::new("bogus").is_supported());
        // the replacement encoding is never a valid document encoding
        assert!(!EncodingName::new("iso-2022-kr").is_supported());
    }
}
