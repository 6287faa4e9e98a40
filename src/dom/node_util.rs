//! Tree helpers over the kuchiki DOM.
//!
//! The passes only need a handful of browser-like primitives (element
//! siblings, last element child, backward walks, identity sets). They are
//! collected here so every pass reads the tree the same way.

use std::collections::HashSet;
use std::rc::Rc;

use kuchiki::traits::TendrilSink;
use kuchiki::{Attribute, ElementData, ExpandedName, Node, NodeRef};

use crate::error::{MailviewError, MailviewResult};
use crate::utils::MAX_HTML_SIZE;

/// Parse an HTML string into a full document tree.
///
/// html5ever never rejects input, so the only parse failure we model is an
/// oversized payload, which is replaced by a placeholder document carrying
/// the error text.
pub fn parse_document(html: &str) -> NodeRef {
    if html.len() > MAX_HTML_SIZE {
        log::warn!(
            "HTML input too large ({} bytes, limit {MAX_HTML_SIZE}), using error placeholder",
            html.len()
        );
        let placeholder = format!(
            "HTML Parser Error: input of {} bytes exceeds the {MAX_HTML_SIZE} byte limit",
            html.len()
        );
        return kuchiki::parse_html().one(placeholder);
    }
    kuchiki::parse_html().one(html)
}

/// Local tag name of an element node, `None` for every other node type
pub fn tag_name(node: &NodeRef) -> Option<&str> {
    node.as_element().map(|element| &*element.name.local)
}

#[inline]
pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

#[inline]
pub fn is_text(node: &NodeRef) -> bool {
    node.as_text().is_some()
}

/// Raw content of a text node
pub fn text_of(node: &NodeRef) -> Option<String> {
    node.as_text().map(|text| text.borrow().clone())
}

/// First `<body>` element of a document
pub fn body(document: &NodeRef) -> Option<NodeRef> {
    document
        .select_first("body")
        .ok()
        .map(|body| body.as_node().clone())
}

/// The root `<html>` element of a document
pub fn html_element(document: &NodeRef) -> Option<NodeRef> {
    document.children().find(|child| is_tag(child, "html"))
}

/// Parent node, but only when it is an element (mirrors `parentElement`)
pub fn parent_element(node: &NodeRef) -> Option<NodeRef> {
    node.parent().filter(|parent| parent.as_element().is_some())
}

pub fn next_element_sibling(node: &NodeRef) -> Option<NodeRef> {
    node.following_siblings()
        .find(|sibling| sibling.as_element().is_some())
}

pub fn previous_element_sibling(node: &NodeRef) -> Option<NodeRef> {
    node.preceding_siblings()
        .find(|sibling| sibling.as_element().is_some())
}

pub fn last_element_child(node: &NodeRef) -> Option<NodeRef> {
    node.children()
        .rev()
        .find(|child| child.as_element().is_some())
}

pub fn child_element_count(node: &NodeRef) -> usize {
    node.children()
        .filter(|child| child.as_element().is_some())
        .count()
}

/// Reverse document order with descendants before their ancestors.
///
/// For each node the children are visited last-to-first, each fully before
/// the node itself. This is an explicit-stack post-order walk that returns
/// a snapshot, so callers may detach nodes while iterating.
pub fn walk_backwards(root: &NodeRef) -> Vec<NodeRef> {
    let mut order = Vec::new();
    let mut stack = vec![(root.clone(), false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        stack.push((node.clone(), true));
        // pushed first-to-last so the last child is popped first
        for child in node.children() {
            stack.push((child, false));
        }
    }
    order
}

/// Get an attribute value of an element node
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
}

/// Set an attribute on an element node; no-op for other node types
pub fn set_attr(node: &NodeRef, name: &str, value: impl Into<String>) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().insert(name, value.into());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().remove(name);
    }
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// Append a class to the element's class list unless already present
pub fn add_class(node: &NodeRef, class: &str) {
    if has_class(node, class) {
        return;
    }
    let classes = match attr(node, "class") {
        Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
        _ => class.to_string(),
    };
    set_attr(node, "class", classes);
}

/// Create a detached HTML element named `tag`.
///
/// The qualified name is derived from an existing HTML element so the new
/// node lands in the same namespace as the document it will join.
pub fn new_element_like(template: &ElementData, tag: &str) -> NodeRef {
    let mut name = template.name.clone();
    name.prefix = None;
    name.local = tag.into();
    NodeRef::new_element(name, Vec::<(ExpandedName, Attribute)>::new())
}

/// Descendant elements matching `selector`, excluding `root` itself.
///
/// Results are collected up front so callers may detach matches while
/// iterating.
pub fn try_select_descendants(root: &NodeRef, selector: &str) -> MailviewResult<Vec<NodeRef>> {
    let matches = root
        .select(selector)
        .map_err(|()| MailviewError::Selector(selector.to_string()))?;
    Ok(matches
        .map(|element| element.as_node().clone())
        .filter(|node| node != root)
        .collect())
}

/// [`try_select_descendants`] for the passes: an invalid selector is
/// logged and matches nothing.
pub fn select_descendants(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    try_select_descendants(root, selector).unwrap_or_else(|e| {
        log::warn!("{e}");
        Vec::new()
    })
}

/// Whether `node` has an ancestor (or is itself) an element named `tag`
pub fn closest(node: &NodeRef, tag: &str) -> Option<NodeRef> {
    node.inclusive_ancestors().find(|ancestor| is_tag(ancestor, tag))
}

/// Identity set of tree nodes.
///
/// Membership is by node identity (the `Rc` allocation), never by value,
/// and insertion order is kept so removals happen in detection order.
#[derive(Default)]
pub struct NodeSet {
    seen: HashSet<*const Node>,
    nodes: Vec<NodeRef>,
}

impl NodeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node; returns false if it was already present
    pub fn insert(&mut self, node: NodeRef) -> bool {
        if self.seen.insert(Rc::as_ptr(&node.0)) {
            self.nodes.push(node);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn contains(&self, node: &NodeRef) -> bool {
        self.seen.contains(&Rc::as_ptr(&node.0))
    }

    pub fn extend(&mut self, nodes: impl IntoIterator<Item = NodeRef>) {
        for node in nodes {
            self.insert(node);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeRef> {
        self.nodes.iter()
    }
}

impl FromIterator<NodeRef> for NodeSet {
    fn from_iter<I: IntoIterator<Item = NodeRef>>(iter: I) -> Self {
        let mut set = NodeSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_is_reported() {
        let doc = parse_document("<p>x</p>");
        let err = try_select_descendants(&doc, "p[").unwrap_err();
        assert!(matches!(err, MailviewError::Selector(ref s) if s == "p["));
        assert!(select_descendants(&doc, "p[").is_empty());
        assert_eq!(select_descendants(&doc, "p").len(), 1);
    }

    fn text_order(nodes: &[NodeRef]) -> Vec<String> {
        nodes.iter().filter_map(text_of).collect()
    }

    #[test]
    fn test_walk_backwards_visits_children_before_parent() {
        let doc = parse_document("<div><p>a</p><p>b<i>c</i></p></div>");
        let div = doc.select_first("div").expect("div").as_node().clone();
        let order = walk_backwards(&div);
        assert_eq!(text_order(&order), vec!["c", "b", "a"]);
        assert!(order.last() == Some(&div));
    }

    #[test]
    fn test_element_siblings_skip_text() {
        let doc = parse_document("<div><b>x</b> text <i>y</i></div>");
        let b = doc.select_first("b").expect("b").as_node().clone();
        let next = next_element_sibling(&b).expect("sibling");
        assert!(is_tag(&next, "i"));
        assert!(previous_element_sibling(&next) == Some(b));
    }

    #[test]
    fn test_node_set_uses_identity() {
        let doc = parse_document("<p>same</p><p>same</p>");
        let paragraphs = select_descendants(&doc, "p");
        let mut set = NodeSet::new();
        assert!(set.insert(paragraphs[0].clone()));
        assert!(!set.insert(paragraphs[0].clone()));
        assert!(!set.contains(&paragraphs[1]));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let doc = parse_document(r#"<img class="a">"#);
        let img = doc.select_first("img").expect("img").as_node().clone();
        add_class(&img, "b");
        add_class(&img, "b");
        assert_eq!(attr(&img, "class").as_deref(), Some("a b"));
    }

    #[test]
    fn test_oversized_input_becomes_placeholder() {
        let huge = "a".repeat(MAX_HTML_SIZE + 1);
        let doc = parse_document(&huge);
        assert!(doc.text_contents().starts_with("HTML Parser Error"));
    }

    #[test]
    fn test_select_descendants_excludes_root() {
        let doc = parse_document(r#"<div style="x"><span style="y">t</span></div>"#);
        let div = doc.select_first("div").expect("div").as_node().clone();
        let styled = select_descendants(&div, "*[style]");
        assert_eq!(styled.len(), 1);
        assert!(is_tag(&styled[0], "span"));
    }
}
