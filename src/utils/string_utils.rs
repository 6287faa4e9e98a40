//! UTF-8-safe string helpers
//!
//! Text offsets produced by the regex engine are byte offsets, while the
//! chunking rules used for long link text are expressed in characters.
//! These helpers keep both worlds on character boundaries.

/// Split a string into chunks of at most `chunk_chars` CHARACTERS.
///
/// Never splits inside a multi-byte character. Returns an empty vector for
/// an empty input or a zero chunk size.
///
/// # Examples
/// ```
/// # use mailview::utils::string_utils::chunk_chars;
/// assert_eq!(chunk_chars("abcdefg", 3), vec!["abc", "def", "g"]);
/// assert_eq!(chunk_chars("ééé", 2), vec!["éé", "é"]);
/// ```
pub fn chunk_chars(s: &str, chunk_chars: usize) -> Vec<&str> {
    if chunk_chars == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in s.char_indices() {
        if count == chunk_chars {
            chunks.push(&s[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < s.len() {
        chunks.push(&s[start..]);
    }
    chunks
}

/// Remove every whitespace character.
///
/// Used to compare text blocks regardless of wrapping and indentation.
#[inline]
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse the leading numeric prefix of a string the way CSS values are
/// read loosely: `"12.5px"` gives `12.5`, `"px"` gives `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in s.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok()
}

/// Format a CSS number without trailing noise: `24.0` gives `"24"`,
/// `13.33333` gives `"13.333"`.
pub fn format_css_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{rounded}")
}
