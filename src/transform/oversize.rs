//! Content too wide for the view: long unbroken link text and big images.

use kuchiki::NodeRef;

use crate::config::RenderConfig;
use crate::dom::InlineStyle;
use crate::dom::node_util::{add_class, attr, new_element_like, select_descendants};
use crate::layout::LayoutProbe;
use crate::utils::{LIMIT_WIDTH_CLASS, chunk_chars, parse_float_prefix};

/// Margin kept free beside images sized only by `max-width`
const IMAGE_MAX_WIDTH_MARGIN_PX: f64 = 100.0;

/// Break a long plain-text link into chunks separated by `<wbr>`.
///
/// Only links whose whole content is one text node are touched. Returns
/// whether the link was rewritten.
pub fn fix_long_url(link: &NodeRef, chunk_size: usize) -> bool {
    let mut children = link.children();
    let (Some(only), None) = (children.next(), children.next()) else {
        return false;
    };
    let Some(text) = only.as_text().map(|text| text.borrow().clone()) else {
        return false;
    };
    let Some(template) = link.as_element() else {
        return false;
    };
    if text.chars().count() <= chunk_size {
        return false;
    }

    only.detach();
    for chunk in chunk_chars(&text, chunk_size) {
        link.append(NodeRef::new_text(chunk));
        link.append(new_element_like(template, "wbr"));
    }
    true
}

/// Whether an image is wider than `container_width` or, with no declared
/// width, allowed to grow past the viewport
pub fn image_is_oversize(img: &NodeRef, container_width: f64, viewport_width: f64) -> bool {
    if let Some(width) = attr(img, "width").filter(|w| !w.is_empty()) {
        return width
            .trim()
            .parse::<f64>()
            .is_ok_and(|width| width > container_width);
    }
    let style = InlineStyle::of(img);
    if style.get("width").is_none_or(|width| width == "none") {
        return style
            .get("max-width")
            .and_then(parse_float_prefix)
            .is_some_and(|max| max.trunc() > viewport_width - IMAGE_MAX_WIDTH_MARGIN_PX);
    }
    false
}

pub fn limit_image_width(img: &NodeRef, container_width: f64, viewport_width: f64) -> bool {
    if image_is_oversize(img, container_width, viewport_width) {
        add_class(img, LIMIT_WIDTH_CLASS);
        true
    } else {
        false
    }
}

/// Run both fixes over `root`; returns (links rewritten, images limited)
pub fn fix_oversize<P: LayoutProbe>(root: &NodeRef, probe: &P, config: &RenderConfig) -> (usize, usize) {
    let links = select_descendants(root, "a")
        .iter()
        .filter(|link| config.is_on_screen(probe.bounding_top(link)))
        .filter(|link| fix_long_url(link, config.long_url_chunk_chars()))
        .count();

    let container_width = probe.offset_width(root);
    let images = select_descendants(root, "img")
        .iter()
        .filter(|img| limit_image_width(img, container_width, config.viewport_width()))
        .count();
    (links, images)
}
