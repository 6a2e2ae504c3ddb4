//! Shortcode attribute lexing.
//!
//! Follows WordPress' `shortcode_parse_atts`: `key="value"`, `key='value'`
//! and `key=value` pairs, plus positional values that get the synthetic
//! keys `@0`, `@1`, ... Malformed input never fails; it degrades to
//! positional values.

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_quote(b: u8) -> bool {
    b == b'"' || b == b'\''
}

/// Parse the text between a shortcode's name and its closing bracket.
pub fn parse_attrs(text: &str) -> Vec<(String, String)> {
    let bytes = text.as_bytes();
    let mut attrs = Vec::new();
    let mut positional = 0;
    let mut pos = 0;

    loop {
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        if let Some((key, value, next)) = lex_pair(text, pos) {
            attrs.push((key.to_string(), value.to_string()));
            pos = next;
            continue;
        }

        let (value, next) = match lex_quoted(text, pos, b'"') {
            Some(quoted) => quoted,
            None => {
                let end = scan(bytes, pos, |b| !is_space(b));
                (&text[pos..end], end)
            }
        };
        attrs.push((format!("@{positional}"), value.to_string()));
        positional += 1;
        pos = next;
    }

    attrs
}

/// Lex `key=value` at `pos`. Returns the key, the value and the position
/// after the value.
fn lex_pair(text: &str, pos: usize) -> Option<(&str, &str, usize)> {
    let bytes = text.as_bytes();
    let key_end = scan(bytes, pos, is_word);
    if key_end == pos || bytes.get(key_end) != Some(&b'=') {
        return None;
    }
    let value_start = key_end + 1;

    if let Some(&quote) = bytes.get(value_start)
        && is_quote(quote)
        && let Some((value, next)) = lex_quoted(text, value_start, quote)
    {
        return Some((&text[pos..key_end], value, next));
    }

    // Unterminated (or no) quote: take the unquoted run from the same spot.
    let value_end = scan(bytes, value_start, |b| !is_space(b) && !is_quote(b));
    if value_end == value_start {
        return None;
    }
    Some((&text[pos..key_end], &text[value_start..value_end], value_end))
}

/// Lex a string quoted with `quote` starting at `pos`. `None` if the text
/// at `pos` is not an opening quote or the quote is never closed.
fn lex_quoted(text: &str, pos: usize, quote: u8) -> Option<(&str, usize)> {
    if text.as_bytes().get(pos) != Some(&quote) {
        return None;
    }
    let start = pos + 1;
    let len = memchr::memchr(quote, &text.as_bytes()[start..])?;
    Some((&text[start..start + len], start + len + 1))
}

fn scan(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = from;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(attrs: &[(&str, &str)]) -> Vec<(String, String)> {
        attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_quoted_and_unquoted_pairs() {
        assert_eq!(
            parse_attrs(r#" id="b" align='c' width=d"#),
            pairs(&[("id", "b"), ("align", "c"), ("width", "d")])
        );
    }

    #[test]
    fn test_positional_values_and_quotes_inside_values() {
        assert_eq!(
            parse_attrs(r#" b "c" d="'" e='"' f=g'hi"#),
            pairs(&[
                ("@0", "b"),
                ("@1", "c"),
                ("d", "'"),
                ("e", "\""),
                ("f", "g"),
                ("@2", "'hi"),
            ])
        );
    }

    #[test]
    fn test_whitespace_variants_separate_entries() {
        assert_eq!(
            parse_attrs("a=1\tb=2\nc=3\r\x0cd=4"),
            pairs(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")])
        );
    }

    #[test]
    fn test_unterminated_quote_falls_back() {
        // The quoted value never closes, and the unquoted scan finds nothing
        // at the quote, so the whole token is positional.
        assert_eq!(parse_attrs(r#"a="xyz"#), pairs(&[("@0", r#"a="xyz"#)]));
        assert_eq!(parse_attrs(r#""open"#), pairs(&[("@0", r#""open"#)]));
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        assert_eq!(
            parse_attrs("x=1 x=2"),
            pairs(&[("x", "1"), ("x", "2")])
        );
    }

    #[test]
    fn test_empty_quoted_value() {
        assert_eq!(parse_attrs(r#"alt="""#), pairs(&[("alt", "")]));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_attrs("").is_empty());
        assert!(parse_attrs("   ").is_empty());
    }

    #[test]
    fn test_non_ascii_values() {
        assert_eq!(
            parse_attrs("caption=\"Ünïcödé\" é"),
            pairs(&[("caption", "Ünïcödé"), ("@0", "é")])
        );
    }
}
