//! Test utilities shared by the mailview integration tests

use kuchiki::NodeRef;
use mailview::dom::parse_document;
use mailview::{ColorProperty, LayoutProbe, RenderConfig, StaticLayout};

/// `StaticLayout` that reads element positions from `data-top`.
///
/// An element sits at the `data-top` of its nearest marked ancestor, or at
/// 0 when nothing above it is marked.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct PositionedLayout {
    inner: StaticLayout,
}

impl LayoutProbe for PositionedLayout {
    fn computed_color(&self, node: &NodeRef, property: ColorProperty) -> Option<String> {
        self.inner.computed_color(node, property)
    }

    fn bounding_top(&self, node: &NodeRef) -> f64 {
        node.inclusive_ancestors()
            .find_map(|ancestor| {
                let element = ancestor.as_element()?;
                let attributes = element.attributes.borrow();
                attributes.get("data-top")?.parse::<f64>().ok()
            })
            .unwrap_or(0.0)
    }

    fn scroll_width(&self, node: &NodeRef) -> f64 {
        self.inner.scroll_width(node)
    }

    fn offset_width(&self, node: &NodeRef) -> f64 {
        self.inner.offset_width(node)
    }

    fn offset_height(&self, node: &NodeRef) -> Option<f64> {
        self.inner.offset_height(node)
    }

    fn computed_font_size(&self, node: &NodeRef) -> Option<String> {
        self.inner.computed_font_size(node)
    }
}

/// Parse `html` and return the document with its `#c` element
#[allow(dead_code)]
pub fn parse_with_root(html: &str) -> (NodeRef, NodeRef) {
    let document = parse_document(html);
    let root = document
        .select_first("#c")
        .expect("fixture must contain an element with id=\"c\"")
        .as_node()
        .clone();
    (document, root)
}

/// Default configuration with a different viewport width
#[allow(dead_code)]
pub fn config_with_width(width: f64) -> RenderConfig {
    RenderConfig::builder()
        .viewport_width(width)
        .build()
        .expect("valid test config")
}

/// Serialized html of a node
#[allow(dead_code)]
pub fn html_of(node: &NodeRef) -> String {
    mailview::dom::outer_html(node).expect("serializable node")
}

/// Visible text of an html fragment after a fresh parse
#[allow(dead_code)]
pub fn visible_text(html: &str) -> String {
    parse_document(html).text_contents()
}
