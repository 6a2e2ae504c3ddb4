//! Pure markdown escaping utilities.
//!
//! These functions handle backslash-escaping of Markdown syntax characters,
//! tab expansion for code blocks, and the single-newline trimming applied to
//! text next to block elements.

use std::borrow::Cow;

/// Every character that is escaped in body text.
pub const ESCAPED_ALL: &str = "\\`*_{}[]()#+-.!:|&<>$";

/// Characters escaped in link text and image alt text.
pub const ESCAPED_LINK_TEXT: &str = "[]";

/// Characters escaped in link targets.
pub const ESCAPED_URL: &str = "()";

/// Characters escaped in a link target followed by a title.
pub const ESCAPED_URL_WITH_TITLE: &str = "\"()";

/// Characters escaped in a quoted link title.
pub const ESCAPED_TITLE: &str = "\"";

/// Backslash-escape every character of `text` that is in `escaped`.
///
/// A few characters are left alone where they can't start Markdown syntax:
/// `.` unless it follows a digit (`1.` would start a list), `:` unless it
/// is followed by `//` (autolinks) and `!` unless it is followed by
/// another `!`.
///
/// # Examples
///
/// ```
/// use wp2md::markdown::escape::{ESCAPED_ALL, escape_markdown};
///
/// assert_eq!(escape_markdown("*bold*", ESCAPED_ALL), "\\*bold\\*");
/// assert_eq!(escape_markdown("1. Done. Next", ESCAPED_ALL), "1\\. Done. Next");
/// assert_eq!(escape_markdown("see http://x", ESCAPED_ALL), "see http\\://x");
/// ```
pub fn escape_markdown<'a>(text: &'a str, escaped: &str) -> Cow<'a, str> {
    let bytes = text.as_bytes();
    let special = escaped.as_bytes();
    if !bytes.iter().any(|b| special.contains(b)) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut chunk_start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if !special.contains(&b) {
            continue;
        }
        // All escapable characters are ASCII, so `i` is a char boundary.
        result.push_str(&text[chunk_start..i]);
        if needs_escape(bytes, i) {
            result.push('\\');
        }
        result.push(b as char);
        chunk_start = i + 1;
    }
    result.push_str(&text[chunk_start..]);
    Cow::Owned(result)
}

fn needs_escape(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b'.' => i > 0 && bytes[i - 1].is_ascii_digit(),
        b':' => bytes[i + 1..].starts_with(b"//"),
        b'!' => bytes.get(i + 1) == Some(&b'!'),
        _ => true,
    }
}

/// Expand tabs to spaces with the given tab stop width.
///
/// The column is counted in characters and resets after `\n`, `\r` and
/// form feed.
pub fn tabs_to_spaces(text: &str, tab_size: usize) -> Cow<'_, str> {
    if !text.contains('\t') {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + tab_size);
    let mut col = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let n = tab_size - col % tab_size;
                result.extend(std::iter::repeat_n(' ', n));
                col += n;
            }
            '\n' | '\r' | '\x0c' => {
                result.push(c);
                col = 0;
            }
            _ => {
                result.push(c);
                col += 1;
            }
        }
    }
    Cow::Owned(result)
}

/// Strip one leading newline, but not the first of a run of two or more.
pub fn trim_left_newline(text: &str) -> &str {
    match text.strip_prefix('\n') {
        Some(rest) if !rest.starts_with('\n') => rest,
        _ => text,
    }
}

/// Strip one trailing newline, but not the last of a run of two or more.
pub fn trim_right_newline(text: &str) -> &str {
    match text.strip_suffix('\n') {
        Some(rest) if !rest.ends_with('\n') => rest,
        _ => text,
    }
}
