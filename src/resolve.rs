//! Reconcile the encoding signals into one resolved encoding.
//!
//! Precedence, highest first:
//!
//! 1. the encoding the caller passed in;
//! 2. the byte-order mark (or a BOM-less UTF-16/UTF-32 byte layout);
//! 3. the encoding in the XML declaration;
//! 4. [`ParseConfig::default_encoding`], UTF-8 unless configured otherwise.
//!
//! A byte-order mark beats a declaration that disagrees with it. A caller
//! override beats a byte-order mark that disagrees with it; the caller is
//! then responsible for the input decoding correctly.
use log::{debug, warn};

use crate::config::ParseConfig;
use crate::declaration::scan_window;
use crate::encoding::EncodingName;
use crate::error::Error;
use crate::sniff::{ascii_projection, bom_length, sniff, sniff_layout};

/// Resolve the encoding from the caller override, byte-order mark and
/// declaration.
///
/// Fails with [`Error::UnsupportedEncoding`] if the winning name has no
/// codec. A losing name is never checked.
///
/// ```rust
/// use xmlsniff::{resolve, EncodingName, ParseConfig};
///
/// let config = ParseConfig::default();
/// let declared = EncodingName::new("ISO-8859-1");
///
/// // the byte-order mark wins over the declaration
/// let encoding = resolve(&config, None, Some(&EncodingName::UTF_8), Some(&declared))?;
/// assert_eq!(encoding, EncodingName::UTF_8);
///
/// // nothing at all
/// assert_eq!(resolve(&config, None, None, None)?, EncodingName::UTF_8);
/// # Ok::<(), xmlsniff::Error>(())
/// ```
pub fn resolve(
    config: &ParseConfig,
    caller_override: Option<&EncodingName>,
    bom: Option<&EncodingName>,
    declared: Option<&EncodingName>,
) -> Result<EncodingName, Error> {
    if let (Some(bom), Some(declared)) = (bom, declared) {
        if !bom.is_compatible_with(declared) {
            warn!("byte-order mark says {bom}, declaration says {declared}; using {bom}");
        }
    }

    let resolved = if let Some(caller_override) = caller_override {
        if let Some(bom) = bom {
            if !bom.is_compatible_with(caller_override) {
                warn!("caller encoding {caller_override} overrides byte-order mark {bom}");
            }
        }
        debug!("encoding {caller_override} from caller");
        caller_override.clone()
    } else if let Some(bom) = bom {
        debug!("encoding {bom} from byte-order mark");
        bom.clone()
    } else if let Some(declared) = declared {
        debug!("encoding {declared} from declaration");
        declared.clone()
    } else {
        debug!("no encoding signal, using {}", config.default_encoding);
        config.default_encoding.clone()
    };

    resolved.codec()?;
    Ok(resolved)
}

/// Gather the encoding signals from raw bytes and [`resolve`] them.
///
/// If there is no byte-order mark and [`ParseConfig::detect_layout`] is set,
/// a BOM-less UTF-16 or UTF-32 layout counts as the byte-order signal, and
/// the declaration is read through it.
///
/// ```rust
/// use xmlsniff::{detect, ParseConfig};
///
/// let config = ParseConfig::default();
/// let xml = br#"<?xml version="1.0" encoding="windows-1252"?><a/>"#;
/// assert_eq!(detect(xml, None, &config)?, "windows-1252");
/// assert_eq!(detect(xml, Some("utf-8"), &config)?, "UTF-8");
/// # Ok::<(), xmlsniff::Error>(())
/// ```
pub fn detect(
    bytes: &[u8],
    caller_override: Option<&str>,
    config: &ParseConfig,
) -> Result<EncodingName, Error> {
    let caller_override = caller_override.map(EncodingName::new);
    let layout = if config.detect_layout {
        sniff_layout(bytes)
    } else {
        None
    };
    let window = &bytes[..bytes.len().min(config.declaration_window)];
    let (byte_signal, declared) = match (sniff(bytes), layout) {
        (Some(bom), _) => {
            let projected = ascii_projection(&window[bom_length(window)..], &bom);
            let declared = scan_window(&projected, projected.len());
            (Some(bom), declared)
        }
        (None, Some(layout)) => {
            let projected = ascii_projection(window, &layout);
            let declared = scan_window(&projected, projected.len());
            (Some(layout), declared)
        }
        (None, None) => (None, scan_window(window, window.len())),
    };
    resolve(
        config,
        caller_override.as_ref(),
        byte_signal.as_ref(),
        declared.as_ref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn name(label: &str) -> EncodingName {
        EncodingName::new(label)
    }

    #[rstest]
    #[case(Some("UTF-8"), Some("UTF-16LE"), Some("ISO-8859-1"), "UTF-8")]
    #[case(Some("ISO-8859-1"), None, Some("UTF-8"), "ISO-8859-1")]
    #[case(None, Some("UTF-16LE"), Some("ISO-8859-1"), "UTF-16LE")]
    #[case(None, Some("UTF-8"), Some("UTF-16"), "UTF-8")]
    #[case(None, Some("UTF-16BE"), Some("UTF-16"), "UTF-16BE")]
    #[case(None, None, Some("latin1"), "ISO-8859-1")]
    #[case(None, None, None, "UTF-8")]
    fn test_precedence(
        #[case] caller_override: Option<&str>,
        #[case] bom: Option<&str>,
        #[case] declared: Option<&str>,
        #[case] expected: &str,
    ) {
        let config = ParseConfig::default();
        let resolved = resolve(
            &config,
            caller_override.map(name).as_ref(),
            bom.map(name).as_ref(),
            declared.map(name).as_ref(),
        )
        .unwrap();
        assert_eq!(resolved, name(expected));
    }

    #[test]
    fn test_unsupported_winner() {
        let config = ParseConfig::default();
        let err = resolve(&config, Some(&name("UTF-7")), None, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEncoding(n) if n == "UTF-7"));
        let err = resolve(&config, None, None, Some(&name("bogus"))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEncoding(_)));
    }

    #[test]
    fn test_unsupported_loser_is_ignored() {
        let config = ParseConfig::default();
        let resolved = resolve(&config, None, Some(&EncodingName::UTF_8), Some(&name("bogus")));
        assert_eq!(resolved.unwrap(), EncodingName::UTF_8);
    }

    #[test]
    fn test_configured_default() {
        let config = ParseConfig {
            default_encoding: EncodingName::ISO_8859_1,
            ..Default::default()
        };
        assert_eq!(
            resolve(&config, None, None, None).unwrap(),
            EncodingName::ISO_8859_1
        );
    }

    #[test]
    fn test_detect_bom_beats_declaration() {
        let config = ParseConfig::default();
        let bytes = b"\xEF\xBB\xBF<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a/>";
        assert_eq!(detect(bytes, None, &config).unwrap(), EncodingName::UTF_8);
    }

    #[test]
    fn test_detect_utf16le_layout_without_bom() {
        let config = ParseConfig::default();
        let text = r#"<?xml version="1.0" encoding="UTF-16"?><a/>"#;
        let bytes: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        assert_eq!(
            detect(&bytes, None, &config).unwrap(),
            EncodingName::UTF_16LE
        );
    }

    #[test]
    fn test_detect_layout_disabled() {
        let config = ParseConfig {
            detect_layout: false,
            ..Default::default()
        };
        let text = r#"<?xml version="1.0" encoding="UTF-16"?><a/>"#;
        let bytes: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
        // the declaration can't be read as ASCII either
        assert_eq!(detect(&bytes, None, &config).unwrap(), EncodingName::UTF_8);
    }

    #[test]
    fn test_detect_configured_window() {
        let config = ParseConfig {
            declaration_window: 10,
            ..Default::default()
        };
        let bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><a/>"#;
        assert_eq!(detect(bytes, None, &config).unwrap(), EncodingName::UTF_8);
    }
}
