//! Quote-region detectors.
//!
//! Every detector only reads the tree; the caller unions the results and
//! detaches them in one go.

use std::sync::LazyLock;

use kuchiki::NodeRef;
use regex::Regex;

use crate::dom::InlineStyle;
use crate::dom::node_util::{
    NodeSet, attr, body, is_tag, is_text, parent_element, select_descendants, tag_name, text_of,
    walk_backwards,
};
use crate::utils::strip_whitespace;

/// End of a reply preamble: "... wrote:" at the end of a line
static QUOTE_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)wrote:\s*$").expect("QUOTE_END_RE: hardcoded regex is valid")
});

/// Start of a reply preamble ("On <date>", "At <time>")
static QUOTE_LEAD_IN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:on|at)\s+\S").expect("QUOTE_LEAD_IN_RE: hardcoded regex is valid")
});

const CONFIDENTIALITY_NOTICE: &str = "Confidentiality Notice";
const PLAIN_INDENT_MARGIN: [&str; 4] = ["0px", "0px", "0px", "40px"];

/// Union of all structural detectors plus the unwrapped signature tail
pub(crate) fn find_quote_elements(document: &NodeRef) -> NodeSet {
    let mut quotes = NodeSet::new();
    quotes.extend(find_marker_class_quotes(document));
    quotes.extend(find_blockquote_quotes(document));
    quotes.extend(find_quotes_after_header_block(document));
    quotes.extend(find_confidentiality_notice(document));

    let signature = unwrapped_signature_nodes(document, &quotes);
    quotes.extend(signature);
    quotes
}

/// `div.gmail_quote` / `blockquote.gmail_quote` not followed by a reply
fn find_marker_class_quotes(document: &NodeRef) -> Vec<NodeRef> {
    let candidates = select_descendants(document, ".gmail_quote");
    let set: NodeSet = candidates.iter().cloned().collect();
    candidates
        .into_iter()
        .filter(|el| !is_followed_by_unquoted(el, &set))
        .collect()
}

/// Blockquotes that are real quotes rather than a plain formatting indent
fn find_blockquote_quotes(document: &NodeRef) -> Vec<NodeRef> {
    let candidates = select_descendants(document, "blockquote");
    let set: NodeSet = candidates.iter().cloned().collect();
    candidates
        .into_iter()
        .filter(|el| !is_plain_indent(el))
        .filter(|el| !is_followed_by_unquoted(el, &set))
        .collect()
}

/// The indent an editor produces for "increase indent": a 40px left
/// margin, no border and no class.
fn is_plain_indent(el: &NodeRef) -> bool {
    let style = InlineStyle::of(el);
    let margin_ok = margin_sides(&style).is_some_and(|sides| sides == PLAIN_INDENT_MARGIN);
    let border_ok = style
        .get("border")
        .is_some_and(|border| border.split_whitespace().any(|t| t.eq_ignore_ascii_case("none")));
    let classless = attr(el, "class").is_none_or(|class| class.trim().is_empty());
    margin_ok && border_ok && classless
}

/// Four margin sides with zero lengths normalised to `0px`
fn margin_sides(style: &InlineStyle) -> Option<[String; 4]> {
    let mut sides: [Option<String>; 4] = Default::default();
    if let Some(shorthand) = style.get("margin") {
        let tokens: Vec<&str> = shorthand.split_whitespace().collect();
        let expanded = match tokens.as_slice() {
            [all] => [*all, *all, *all, *all],
            [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
            [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
            [top, right, bottom, left] => [*top, *right, *bottom, *left],
            _ => return None,
        };
        for (side, value) in sides.iter_mut().zip(expanded) {
            *side = Some(value.to_string());
        }
    }
    for (side, name) in sides
        .iter_mut()
        .zip(["margin-top", "margin-right", "margin-bottom", "margin-left"])
    {
        if let Some(value) = style.get(name) {
            *side = Some(value.to_string());
        }
    }

    let [top, right, bottom, left] = sides;
    Some([top?, right?, bottom?, left?].map(|value| {
        if value == "0" {
            "0px".to_string()
        } else {
            value.to_ascii_lowercase()
        }
    }))
}

/// Whether any text or image that is not itself quoted comes after `el`.
///
/// Walks forward through next siblings, climbing to the parent whenever a
/// level is exhausted. Each visited sibling subtree is searched for
/// non-blank text or an `<img>`, skipping subtrees rooted at a quote
/// candidate. Subtrees already searched are remembered so climbing never
/// rescans them.
pub fn is_followed_by_unquoted(el: &NodeRef, quotes: &NodeSet) -> bool {
    let mut seen = NodeSet::new();
    let mut head = el.clone();
    loop {
        let next = loop {
            if let Some(sibling) = head.next_sibling() {
                break sibling;
            }
            match head.parent() {
                Some(parent) => head = parent,
                None => return false,
            }
        };
        head = next;

        let mut pile = vec![head.clone()];
        while let Some(node) = pile.pop() {
            if seen.contains(&node) || quotes.contains(&node) {
                continue;
            }
            pile.extend(node.children());
            if is_tag(&node, "img") {
                return true;
            }
            if text_of(&node).is_some_and(|text| !text.trim().is_empty()) {
                return true;
            }
        }
        seen.insert(head.clone());
    }
}

/// First `<b>` or `<span>` in document order whose text is one of the labels
fn first_label(document: &NodeRef, bold: &[&str], span: &[&str]) -> Option<NodeRef> {
    document.descendants().find(|node| {
        let labels = match tag_name(node) {
            Some("b") => bold,
            Some("span") => span,
            _ => return false,
        };
        let text = node.text_contents();
        labels.contains(&text.as_str())
    })
}

/// Forwarded/replied header block (`Sent:`/`Date:`, `To:`, `Subject:`)
/// and everything after it.
fn find_quotes_after_header_block(document: &NodeRef) -> Vec<NodeRef> {
    let Some(date_marker) = first_label(
        document,
        &["Sent:", "Date:"],
        &["Sent:", "Sent: ", "Date:", "Date: "],
    ) else {
        return Vec::new();
    };
    let Some(container) = parent_element(&date_marker) else {
        return Vec::new();
    };

    let labels = container
        .children()
        .filter(|child| child.as_element().is_some())
        .filter(|child| matches!(child.text_contents().trim(), "To:" | "Subject:"))
        .count();
    if labels != 2 {
        return Vec::new();
    }

    let mut quoted = Vec::new();
    // "From:" often sits apart from the other fields
    let from = first_label(document, &["From:"], &["From:", "From: "]).and_then(|from| {
        if is_tag(&from, "span") {
            parent_element(&from)
        } else {
            Some(from)
        }
    });
    if let Some(from) = &from {
        quoted.push(from.clone());
    }

    let top_level = is_tag(&container, "body") || is_tag(&container, "html");
    let start = if top_level {
        // fields sit directly in the body: cut from the earliest label instead
        match from.filter(|from| from.parent().as_ref() == Some(&container)) {
            Some(from) if from.following_siblings().any(|n| n == date_marker) => from,
            _ => date_marker,
        }
    } else {
        container
    };

    let mut head = Some(start);
    while let Some(node) = head {
        quoted.push(node.clone());
        let mut cursor = node;
        head = loop {
            if let Some(sibling) = cursor.next_sibling() {
                break Some(sibling);
            }
            match parent_element(&cursor) {
                Some(parent) if !is_tag(&parent, "body") && !is_tag(&parent, "html") => {
                    cursor = parent;
                }
                _ => break None,
            }
        };
    }
    quoted
}

/// A trailing "Confidentiality Notice" text found along the last-child spine
fn find_confidentiality_notice(document: &NodeRef) -> Vec<NodeRef> {
    let mut head = body(document);
    while let Some(node) = head {
        let text = node.text_contents();
        let trimmed = text.trim();
        if is_text(&node) && trimmed.starts_with(CONFIDENTIALITY_NOTICE) {
            return vec![node];
        }
        head = if node.first_child().is_none() && trimmed.is_empty() {
            node.previous_sibling()
        } else {
            node.last_child()
        };
    }
    Vec::new()
}

/// Text and nodes after `el` in document order, climbing through ancestors
fn text_and_nodes_after(el: &NodeRef) -> (String, Vec<NodeRef>) {
    let mut text = String::new();
    let mut nodes = Vec::new();
    let mut current = Some(el.clone());
    while let Some(node) = current {
        for sibling in node.following_siblings() {
            text.push_str(&sibling.text_contents());
            nodes.push(sibling);
        }
        current = node.parent();
    }
    (text, nodes)
}

/// A signature repeated after the last quote block.
///
/// Only the last quote (in document order) is considered: if the text that
/// follows it, ignoring whitespace, already appears inside it, the trailing
/// nodes are a copy of the quoted signature.
fn unwrapped_signature_nodes(document: &NodeRef, quotes: &NodeSet) -> Vec<NodeRef> {
    if quotes.is_empty() {
        return Vec::new();
    }
    for node in walk_backwards(document) {
        let focus = if quotes.contains(&node) {
            node
        } else if let Some(previous) = node.previous_sibling().filter(|p| quotes.contains(p)) {
            previous
        } else {
            continue;
        };

        let (text, nodes) = text_and_nodes_after(&focus);
        let tail = strip_whitespace(&text);
        if !tail.is_empty() && strip_whitespace(&focus.text_contents()).contains(&tail) {
            return nodes;
        }
        break;
    }
    Vec::new()
}

/// Nodes of an email-client reply preamble ("On ..., X wrote:").
///
/// Walks backwards from the end of the document. The last non-blank text
/// must end with `wrote:`, otherwise nothing is returned. Everything from
/// there back to the first text with an `On `/`At ` lead-in is collected.
pub(crate) fn quote_string_nodes(document: &NodeRef) -> Vec<NodeRef> {
    let mut nodes = Vec::new();
    let mut seen_quote_end = false;

    for node in walk_backwards(document) {
        if node.as_document().is_some() {
            continue;
        }
        let text = text_of(&node).filter(|text| !text.trim().is_empty());
        let Some(text) = text else {
            if seen_quote_end {
                nodes.push(node);
            }
            continue;
        };

        if !seen_quote_end {
            if !QUOTE_END_RE.is_match(&text) {
                // real content sits between the quote and the end
                return nodes;
            }
            seen_quote_end = true;
        }
        nodes.push(node);
        if QUOTE_LEAD_IN_RE.is_match(&text) {
            return nodes;
        }
    }
    nodes
}
