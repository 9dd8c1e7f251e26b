use std::borrow::Cow;

use crate::error::DocumentErrorKind;

#[derive(Debug)]
pub(crate) struct EntityError {
    pub(crate) kind: DocumentErrorKind,
    // byte offset of the `&` in the parsed content
    pub(crate) offset: usize,
}

/// Expand entity and character references in text content, and normalize
/// `\r\n` and `\r` to `\n`.
pub(crate) fn parse_text(content: &str) -> Result<Cow<'_, str>, EntityError> {
    expand(content, false)
}

/// Expand entity and character references in an attribute value. Literal
/// tabs, newlines and carriage returns become spaces; characters produced by
/// references are kept as they are.
pub(crate) fn parse_attribute(content: &str) -> Result<Cow<'_, str>, EntityError> {
    expand(content, true)
}

/// CDATA content has no references; only line endings are normalized.
pub(crate) fn parse_cdata(content: &str) -> Cow<'_, str> {
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}

fn expand(content: &str, attribute: bool) -> Result<Cow<'_, str>, EntityError> {
    let needs_work = if attribute {
        content.contains(['&', '\r', '\n', '\t'])
    } else {
        content.contains(['&', '\r'])
    };
    if !needs_work {
        return Ok(Cow::Borrowed(content));
    }

    let mut result = String::with_capacity(content.len());
    let mut chars = content.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '&' => {
                let rest = &content[i + 1..];
                let name_len = rest
                    .find(|c: char| !(c.is_alphanumeric() || matches!(c, '#' | '_' | '-' | '.' | ':')))
                    .unwrap_or(rest.len());
                let name = &rest[..name_len];
                if !rest[name_len..].starts_with(';') {
                    return Err(EntityError {
                        kind: DocumentErrorKind::UnclosedEntity(name.to_string()),
                        offset: i,
                    });
                }
                let expanded = resolve_reference(name).map_err(|kind| EntityError { kind, offset: i })?;
                result.push(expanded);
                // skip the name and the `;`
                for _ in 0..name.chars().count() + 1 {
                    chars.next();
                }
            }
            '\r' => {
                if matches!(chars.peek(), Some((_, '\n'))) {
                    chars.next();
                }
                result.push(if attribute { ' ' } else { '\n' });
            }
            '\t' | '\n' if attribute => result.push(' '),
            c => result.push(c),
        }
    }
    Ok(Cow::Owned(result))
}

fn resolve_reference(name: &str) -> Result<char, DocumentErrorKind> {
    match name {
        "amp" => Ok('&'),
        "apos" => Ok('\''),
        "gt" => Ok('>'),
        "lt" => Ok('<'),
        "quot" => Ok('"'),
        _ => {
            let Some(reference) = name.strip_prefix('#') else {
                return Err(DocumentErrorKind::UnknownEntity(name.to_string()));
            };
            let code = match reference.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => reference.parse::<u32>(),
            };
            code.ok()
                .filter(|code| is_xml_char(*code))
                .and_then(char::from_u32)
                .ok_or_else(|| DocumentErrorKind::InvalidCharacterReference(name.to_string()))
        }
    }
}

// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn is_xml_char(code: u32) -> bool {
    matches!(code, 0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let text = "A &amp; B";
        assert_eq!(parse_text(text).unwrap(), "A & B");
    }

    #[test]
    fn test_parse_multiple() {
        let text = "&amp;&apos;&gt;&lt;&quot;";
        assert_eq!(parse_text(text).unwrap(), "&'><\"");
    }

    #[test]
    fn test_parse_character_references() {
        assert_eq!(parse_text("&#233;t&#xE9;").unwrap(), "été");
        assert_eq!(parse_text("&#x1F600;").unwrap(), "😀");
    }

    #[test]
    fn test_parse_invalid_character_reference() {
        let err = parse_text("a&#0;").unwrap_err();
        assert!(matches!(err.kind, DocumentErrorKind::InvalidCharacterReference(ref r) if r == "#0"));
        assert_eq!(err.offset, 1);
        let err = parse_text("&#xD800;").unwrap_err();
        assert!(matches!(err.kind, DocumentErrorKind::InvalidCharacterReference(_)));
        let err = parse_text("&#xZZ;").unwrap_err();
        assert!(matches!(err.kind, DocumentErrorKind::InvalidCharacterReference(_)));
    }

    #[test]
    fn test_parse_unknown_entity() {
        let err = parse_text("ab&unknown;").unwrap_err();
        if let DocumentErrorKind::UnknownEntity(entity) = err.kind {
            assert_eq!(entity, "unknown");
        } else {
            unreachable!();
        }
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_parse_unfinished_entity() {
        let err = parse_text("&amp").unwrap_err();
        if let DocumentErrorKind::UnclosedEntity(entity) = err.kind {
            assert_eq!(entity, "amp");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_no_entities() {
        let text = "hello";
        let result = parse_text(text).unwrap();
        // this is the same slice
        assert!(std::ptr::eq(text, result.as_ref()));
    }

    #[test]
    fn test_parse_newlines() {
        assert_eq!(parse_text("a\r\nb\rc\nd").unwrap(), "a\nb\nc\nd");
    }

    #[test]
    fn test_parse_attribute_whitespace() {
        assert_eq!(parse_attribute("a\tb\r\nc\nd").unwrap(), "a b c d");
        // references are not normalized
        assert_eq!(parse_attribute("a&#10;b").unwrap(), "a\nb");
    }

    #[test]
    fn test_parse_cdata() {
        assert_eq!(parse_cdata("a &amp; <b>\r\n"), "a &amp; <b>\n");
    }

    #[test]
    fn test_parse_non_ascii_around_entity() {
        assert_eq!(parse_text("é&amp;日本").unwrap(), "é&日本");
    }
}
