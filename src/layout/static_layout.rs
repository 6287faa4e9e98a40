use kuchiki::NodeRef;

use super::{ColorProperty, LayoutProbe};
use crate::dom::InlineStyle;
use crate::dom::color::Rgba;
use crate::dom::css_values::{font_size_attr_px, to_px};
use crate::dom::node_util::{attr, is_tag, tag_name};
use crate::utils::{DEFAULT_FONT_SIZE_PX, DEFAULT_VIEWPORT_WIDTH, parse_float_prefix};

/// Average glyph advance as a fraction of the font size
const GLYPH_WIDTH_RATIO: f64 = 0.55;

const DEFAULT_TEXT_COLOR: &str = "rgb(0, 0, 0)";
const DEFAULT_BACKGROUND: &str = "rgba(0, 0, 0, 0)";

/// Layout estimator working purely from declared sizes.
///
/// There is no box model here: an element is as wide as its own declared
/// width (or the nearest declared ancestor width, or the viewport), and
/// its content is as wide as the widest declared descendant or the
/// longest unbreakable word it contains. Everything sits at the top of
/// the viewport.
#[derive(Debug, Clone)]
pub struct StaticLayout {
    viewport_width: f64,
}

impl Default for StaticLayout {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH)
    }
}

impl StaticLayout {
    #[must_use]
    pub fn new(viewport_width: f64) -> Self {
        Self { viewport_width }
    }

    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn container_width(&self, node: &NodeRef) -> f64 {
        node.inclusive_ancestors()
            .find_map(|ancestor| declared_width(&ancestor))
            .unwrap_or(self.viewport_width)
    }

    fn content_width(&self, node: &NodeRef) -> f64 {
        let mut widest: f64 = 0.0;
        for descendant in node.descendants() {
            if let Some(text) = descendant.as_text() {
                if in_non_rendered(&descendant) {
                    continue;
                }
                let longest_word = text
                    .borrow()
                    .split_whitespace()
                    .map(|word| word.chars().count())
                    .max()
                    .unwrap_or(0);
                let font_px = descendant
                    .parent()
                    .map_or(DEFAULT_FONT_SIZE_PX, |parent| font_px(&parent));
                widest = widest.max(longest_word as f64 * font_px * GLYPH_WIDTH_RATIO);
            } else if let Some(width) = declared_width(&descendant) {
                widest = widest.max(width);
            }
        }
        widest
    }
}

impl LayoutProbe for StaticLayout {
    fn computed_color(&self, node: &NodeRef, property: ColorProperty) -> Option<String> {
        node.as_element()?;
        let color = match property {
            ColorProperty::Color => node
                .inclusive_ancestors()
                .find_map(|ancestor| declared_text_color(&ancestor))
                .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            ColorProperty::BackgroundColor => declared_background(node)
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
        };
        Some(color)
    }

    fn bounding_top(&self, _node: &NodeRef) -> f64 {
        0.0
    }

    fn scroll_width(&self, node: &NodeRef) -> f64 {
        self.container_width(node).max(self.content_width(node))
    }

    fn offset_width(&self, node: &NodeRef) -> f64 {
        self.container_width(node)
    }

    fn offset_height(&self, node: &NodeRef) -> Option<f64> {
        let style = InlineStyle::of(node);
        style
            .get("height")
            .and_then(to_px)
            .or_else(|| attr(node, "height").and_then(|h| numeric_attr(&h)))
    }

    fn computed_font_size(&self, node: &NodeRef) -> Option<String> {
        node.as_element()?;
        Some(format!("{}px", font_px(node)))
    }

    fn viewport_changed(&mut self, width: f64) {
        self.viewport_width = width;
    }
}

/// Declared px width: max of inline `width`/`min-width`, else the attribute
fn declared_width(node: &NodeRef) -> Option<f64> {
    node.as_element()?;
    let style = InlineStyle::of(node);
    let inline = [style.get("width"), style.get("min-width")]
        .into_iter()
        .flatten()
        .filter_map(to_px)
        .reduce(f64::max);
    inline.or_else(|| attr(node, "width").and_then(|w| numeric_attr(&w)))
}

/// `width="600"` or `width="600px"`; percentages are not absolute
fn numeric_attr(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.ends_with('%') {
        return None;
    }
    parse_float_prefix(value).filter(|v| *v >= 0.0)
}

/// Effective font size in px, inherited through the ancestors
fn font_px(node: &NodeRef) -> f64 {
    for ancestor in node.inclusive_ancestors() {
        if let Some(px) = InlineStyle::of(&ancestor).get("font-size").and_then(to_px) {
            return px;
        }
        if is_tag(&ancestor, "font") {
            if let Some(size) = attr(&ancestor, "size").and_then(|s| parse_float_prefix(&s)) {
                return font_size_attr_px(size);
            }
        }
    }
    DEFAULT_FONT_SIZE_PX
}

fn in_non_rendered(node: &NodeRef) -> bool {
    node.ancestors().any(|ancestor| {
        matches!(
            tag_name(&ancestor),
            Some("style" | "script" | "head" | "title")
        )
    })
}

fn declared_text_color(node: &NodeRef) -> Option<String> {
    if let Some(color) = InlineStyle::of(node).get("color") {
        return Some(color.to_string());
    }
    if is_tag(node, "font") {
        return attr(node, "color");
    }
    None
}

fn declared_background(node: &NodeRef) -> Option<String> {
    let style = InlineStyle::of(node);
    if let Some(color) = style.get("background-color") {
        return Some(color.to_string());
    }
    if let Some(shorthand) = style.get("background") {
        if let Some(token) = shorthand
            .split(|c: char| c.is_whitespace())
            .scan(String::new(), |pending, token| {
                // re-join tokens split inside rgb( ... )
                pending.push_str(token);
                if pending.matches('(').count() > pending.matches(')').count() {
                    pending.push(' ');
                    return Some(None);
                }
                Some(Some(std::mem::take(pending)))
            })
            .flatten()
            .find(|token| Rgba::parse(token).is_some())
        {
            return Some(token);
        }
    }
    attr(node, "bgcolor")
}
