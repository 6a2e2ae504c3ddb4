//! Recognizes a single shortcode tag at the start of a piece of text.

use super::Registry;

/// A recognized bracket construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme<'a> {
    /// `[[tag]]`: emit `literal` (the single-bracketed form) instead of the
    /// `len` bytes following the first `[`.
    Escape { len: usize, literal: &'a str },
    /// A real tag spanning the first `[` plus `len` bytes.
    Tag {
        len: usize,
        name: &'a str,
        /// Opens a tag (pushes onto the open-tag stack).
        open: bool,
        /// Closes a tag (pops the stack). Self-closing tags set both.
        close: bool,
        /// Raw attribute text between the name and the closing bracket.
        attrs: &'a str,
    },
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Lex a shortcode from `text`, the text immediately after an unconsumed `[`.
///
/// Returns `None` when the bracket does not start a known shortcode; the
/// caller then treats that `[` as plain text.
pub fn lex_tag<'a>(text: &'a str, registry: &Registry) -> Option<Lexeme<'a>> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let escaped = bytes.first() == Some(&b'[');
    if escaped {
        pos = 1;
    }

    let closing_form = bytes.get(pos) == Some(&b'/');
    if closing_form {
        pos += 1;
    }

    // The first character always belongs to the name; the rest is the
    // maximal run of name characters.
    let name_start = pos;
    let first = text[name_start..].chars().next()?;
    let mut name_end = name_start + first.len_utf8();
    while name_end < bytes.len() && is_name_char(bytes[name_end]) {
        name_end += 1;
    }
    let name = &text[name_start..name_end];

    let (mut open, mut close) = (!closing_form, closing_form);
    match registry.is_block(name)? {
        true => {}
        // Closing a standalone tag makes no sense.
        false if closing_form => return None,
        false => {
            open = true;
            close = true;
        }
    }

    let end = memchr::memchr(b']', bytes)?;
    if end < name_end {
        return None;
    }

    if escaped {
        if end == name_end && bytes.get(end + 1) == Some(&b']') {
            return Some(Lexeme::Escape {
                len: end + 2,
                literal: &text[..end + 1],
            });
        }
        // A doubled bracket that doesn't escape anything: the first `[` is
        // literal text and the tag (if any) starts at the second one.
        return None;
    }

    let mut attrs_end = end;
    if end > name_end && bytes[end - 1] == b'/' {
        close = true;
        attrs_end -= 1;
    } else if closing_form && name_end != end {
        // Closing tags carry nothing but the tag name.
        return None;
    }

    Some(Lexeme::Tag {
        len: end + 1,
        name,
        open,
        close,
        attrs: &text[name_end..attrs_end],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::default().with_tag("math", false)
    }

    fn tag<'a>(len: usize, name: &'a str, open: bool, close: bool, attrs: &'a str) -> Lexeme<'a> {
        Lexeme::Tag {
            len,
            name,
            open,
            close,
            attrs,
        }
    }

    #[test]
    fn test_open_tag() {
        assert_eq!(
            lex_tag("caption]b", &registry()),
            Some(tag(8, "caption", true, false, ""))
        );
    }

    #[test]
    fn test_open_tag_with_attrs() {
        assert_eq!(
            lex_tag(r#"caption id="x" width=10]rest"#, &registry()),
            Some(tag(24, "caption", true, false, r#" id="x" width=10"#))
        );
    }

    #[test]
    fn test_close_tag() {
        assert_eq!(
            lex_tag("/caption]c", &registry()),
            Some(tag(9, "caption", false, true, ""))
        );
    }

    #[test]
    fn test_close_tag_with_attrs_rejected() {
        assert_eq!(lex_tag("/caption x]", &registry()), None);
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(
            lex_tag("caption/]b", &registry()),
            Some(tag(9, "caption", true, true, ""))
        );
        assert_eq!(
            lex_tag("caption a=b/]", &registry()),
            Some(tag(13, "caption", true, true, " a=b"))
        );
    }

    #[test]
    fn test_standalone_tag_is_forced_self_closing() {
        assert_eq!(
            lex_tag("math x=1]", &registry()),
            Some(tag(9, "math", true, true, " x=1"))
        );
        assert_eq!(lex_tag("/math]", &registry()), None);
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(lex_tag("gallery ids=1]", &registry()), None);
        assert_eq!(lex_tag("captions]", &registry()), None);
    }

    #[test]
    fn test_unterminated_tag() {
        assert_eq!(lex_tag("caption", &registry()), None);
        assert_eq!(lex_tag("", &registry()), None);
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            lex_tag("[caption]]x", &registry()),
            Some(Lexeme::Escape {
                len: 10,
                literal: "[caption]",
            })
        );
        assert_eq!(
            lex_tag("[/caption]]", &registry()),
            Some(Lexeme::Escape {
                len: 11,
                literal: "[/caption]",
            })
        );
        assert_eq!(
            lex_tag("[math]]", &registry()),
            Some(Lexeme::Escape {
                len: 7,
                literal: "[math]",
            })
        );
    }

    #[test]
    fn test_doubled_bracket_without_escape() {
        assert_eq!(lex_tag("[caption]x", &registry()), None);
        assert_eq!(lex_tag("[caption a=1]]", &registry()), None);
    }

    #[test]
    fn test_non_ascii_first_char() {
        assert_eq!(lex_tag("é]", &registry()), None);
    }
}
