//! Quoted reply/forward removal.
//!
//! Structural detectors (marker class, blockquote, header block,
//! confidentiality notice, unwrapped signature) are unioned and removed
//! together, then the inline "On ..., X wrote:" preamble is removed. If
//! that leaves no visible text the original document is returned instead,
//! so a message is never blanked.

mod detectors;
mod whitespace;

use std::sync::LazyLock;

use kuchiki::NodeRef;
use regex::Regex;

use crate::dom::node_util::{body, html_element, is_tag, parse_document};
use crate::dom::inner_html;
use crate::error::MailviewResult;

pub use detectors::is_followed_by_unquoted;

/// Input that carried its own document framing
static FRAMED_INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s?head\s?>|<\s?body[\s>]").expect("FRAMED_INPUT_RE: hardcoded regex is valid")
});

/// Whether any quote detector fires on `html`
#[must_use]
pub fn has_quoted_html(html: &str) -> bool {
    let document = parse_document(html);
    !detectors::find_quote_elements(&document).is_empty()
        || !detectors::quote_string_nodes(&document).is_empty()
}

/// Strip quoted content from `html`.
///
/// Never fails: on a serialization error the input is returned unchanged.
#[must_use]
pub fn remove_quoted_html(html: &str) -> String {
    match try_remove_quoted_html(html) {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Quote removal failed, keeping message as is: {e}");
            html.to_string()
        }
    }
}

fn try_remove_quoted_html(html: &str) -> MailviewResult<String> {
    let document = parse_document(html);

    let quotes = detectors::find_quote_elements(&document);
    let mut removed = 0;
    for node in quotes.iter() {
        if is_document_frame(node) {
            continue;
        }
        node.detach();
        removed += 1;
    }

    let Some(body) = body(&document) else {
        return output_html_for(&parse_document(""), html);
    };

    let preamble = detectors::quote_string_nodes(&document);
    for node in &preamble {
        if !is_document_frame(node) {
            node.detach();
        }
    }

    if body.text_contents().trim().is_empty() {
        tracing::debug!(removed, "quote removal would blank the message, keeping original");
        return output_html_for(&parse_document(html), html);
    }

    let images = whitespace::remove_images_stripped_by_another_client(&body);
    whitespace::remove_unnecessary_whitespace(&body);
    tracing::debug!(
        removed,
        preamble = preamble.len(),
        stripped_images = images,
        "quoted html removed"
    );
    output_html_for(&document, html)
}

fn is_document_frame(node: &NodeRef) -> bool {
    is_tag(node, "body") || is_tag(node, "html")
}

/// Full `<html>` contents when the input had its own head/body, else the
/// body contents only
fn output_html_for(document: &NodeRef, initial_html: &str) -> MailviewResult<String> {
    if FRAMED_INPUT_RE.is_match(initial_html) {
        if let Some(root) = html_element(document) {
            return inner_html(&root);
        }
    }
    match body(document) {
        Some(body) => inner_html(&body),
        None => Ok(String::new()),
    }
}
