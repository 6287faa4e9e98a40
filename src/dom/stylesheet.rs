//! Declaration-block rewriting for embedded `<style>` sheets.
//!
//! This is not a CSS parser. It only finds the innermost `{ ... }` blocks
//! (so rules nested in `@media`/`@supports` are reached too), hands each
//! one to a callback as an [`InlineStyle`], and splices back only the
//! blocks the callback changed. Everything else stays byte-for-byte.

use super::style::InlineStyle;

/// Rewrite every declaration block of `css`.
///
/// `rewrite` returns `true` when it modified the block. Returns the new
/// stylesheet text, or `None` when nothing changed.
pub fn rewrite_declaration_blocks<F>(css: &str, mut rewrite: F) -> Option<String>
where
    F: FnMut(&mut InlineStyle) -> bool,
{
    let mut output = String::with_capacity(css.len());
    let mut changed = false;
    let mut copied_to = 0;

    for (open, close) in declaration_blocks(css) {
        let body = &css[open + 1..close];
        let mut style = InlineStyle::parse(body);
        if rewrite(&mut style) {
            output.push_str(&css[copied_to..=open]);
            output.push(' ');
            output.push_str(&style.to_css());
            output.push_str("; ");
            copied_to = close;
            changed = true;
        }
    }

    if !changed {
        return None;
    }
    output.push_str(&css[copied_to..]);
    Some(output)
}

/// Byte ranges `(open_brace, close_brace)` of innermost blocks
fn declaration_blocks(css: &str) -> Vec<(usize, usize)> {
    let bytes = css.as_bytes();
    let mut blocks = Vec::new();
    let mut open: Option<usize> = None;
    let mut quote: Option<u8> = None;
    let mut idx = 0;

    while idx < bytes.len() {
        let byte = bytes[idx];
        if let Some(q) = quote {
            if byte == b'\\' {
                idx += 2;
                continue;
            }
            if byte == q {
                quote = None;
            }
            idx += 1;
            continue;
        }
        match byte {
            b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                // skip comments so braces inside them are ignored
                idx = match css[idx + 2..].find("*/") {
                    Some(end) => idx + 2 + end + 2,
                    None => bytes.len(),
                };
                continue;
            }
            b'"' | b'\'' => quote = Some(byte),
            // a newer '{' means the previous one was a group rule prelude
            b'{' => open = Some(idx),
            b'}' => {
                if let Some(start) = open.take() {
                    blocks.push((start, idx));
                }
            }
            _ => {}
        }
        idx += 1;
    }
    blocks
}
