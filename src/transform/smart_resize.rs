//! Shrink oversized fixed-width layouts to the viewport.
//!
//! The root is scaled with a CSS transform, which shrinks text along with
//! everything else. Text is then compensated by zooming font sizes and line
//! heights by the reciprocal, in `<style>` sheets and inline styles, under
//! a cap so headings do not explode. Elements that still overflow get a
//! second, constrained scale-down.

use kuchiki::NodeRef;

use crate::config::RenderConfig;
use crate::dom::InlineStyle;
use crate::dom::css_values::{is_relative_font_size, to_px, zoomed_size};
use crate::dom::node_util::{
    add_class, attr, is_tag, next_element_sibling, previous_element_sibling, select_descendants,
    set_attr,
};
use crate::dom::stylesheet::rewrite_declaration_blocks;
use crate::layout::LayoutProbe;
use crate::utils::{LEVEL2_SHRINK_FACTOR, TRANSFORM_CLASS, format_css_number, parse_float_prefix};

/// Outcome of one resize pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeReport {
    /// Target width divided by content width; 1.0 when nothing was scaled
    pub ratio: f64,
    /// Visual height of the scaled root, for the host to size its view
    pub content_height: Option<f64>,
    /// Inline-styled elements whose text was zoomed
    pub zoomed_elements: usize,
    /// Stylesheets rewritten
    pub zoomed_sheets: usize,
}

impl ResizeReport {
    fn unscaled() -> Self {
        Self {
            ratio: 1.0,
            content_height: None,
            zoomed_elements: 0,
            zoomed_sheets: 0,
        }
    }

    #[must_use]
    pub fn is_scaled(&self) -> bool {
        self.ratio < 1.0
    }
}

/// Pin the root to its natural width and shrink it with a transform.
///
/// The scale is truncated to two decimals so the result is never wider
/// than the viewport.
pub fn scale_element(element: &NodeRef, from_width: f64, ratio: f64) {
    let truncated = (ratio * 100.0).floor() / 100.0;
    let mut style = InlineStyle::of(element);
    style.set("width", format!("{}px", format_css_number(from_width)));
    style.set("transform", format!("scale({})", format_css_number(truncated)));
    style.write_to(element);
    add_class(element, TRANSFORM_CLASS);
}

/// Zoom `font-size` and `line-height` in every rule block of a stylesheet.
///
/// Font sizes whose pixel value is already at least `cap * zoom` are left
/// alone; smaller ones are capped at `cap` before zooming. Returns the new
/// sheet text, or `None` when no rule changed.
pub fn zoom_font_size_in_css(css: &str, zoom: f64, cap: f64) -> Option<String> {
    rewrite_declaration_blocks(css, |rule| {
        let mut changed = false;
        if let Some(size) = rule.get("font-size").map(str::to_string) {
            if to_px(&size).is_some_and(|px| px < cap * zoom) {
                if let Some(zoomed) = zoomed_size(&size, zoom, Some(cap)) {
                    rule.set("font-size", zoomed);
                    changed = true;
                }
            }
        }
        if let Some(line_height) = rule.get("line-height").map(str::to_string) {
            if let Some(zoomed) = zoomed_size(&line_height, zoom, None) {
                rule.set("line-height", zoomed);
                changed = true;
            }
        }
        changed
    })
}

/// Rewrite every `<style>` element under `root`; returns how many changed
pub fn zoom_style_elements(root: &NodeRef, zoom: f64, cap: f64) -> usize {
    let mut changed = 0;
    for sheet in select_descendants(root, "style") {
        let css = sheet.text_contents();
        let Some(rewritten) = zoom_font_size_in_css(&css, zoom, cap) else {
            continue;
        };
        for child in sheet.children().collect::<Vec<_>>() {
            child.detach();
        }
        sheet.append(NodeRef::new_text(rewritten));
        changed += 1;
    }
    changed
}

/// Compensate one inline-styled element for a root scaled by `1 / zoom`.
///
/// Returns whether the element's text was zoomed.
pub fn zoom_text<P: LayoutProbe>(element: &NodeRef, zoom: f64, cap: f64, probe: &P) -> bool {
    if is_tag(element, "img") {
        return false;
    }

    let mut style = InlineStyle::of(element);
    if let Some(height) = style.get("height") {
        // a fixed box cannot grow: pin the current size so sheet zoom skips it
        if !height.contains('%') {
            if style.get("font-size").is_none() {
                if let Some(pinned) = probe
                    .computed_font_size(element)
                    .and_then(|size| zoomed_size(&size, 1.0 / zoom, None))
                {
                    style.set("font-size", pinned);
                    style.write_to(element);
                }
            }
            return false;
        }
    }

    let original_width = probe.scroll_width(element);

    if is_tag(element, "font") {
        if let Some(size_attr) = attr(element, "size") {
            zoom_font_size_attribute(element, &size_attr, zoom, original_width, probe);
            return true;
        }
    }

    let mut safe_scale = 1.0;
    let mut zoomed = false;
    if let Some(original) = style.get("font-size").map(str::to_string) {
        if to_px(&original).is_some_and(|px| px < cap * zoom) {
            if let Some(size) = zoomed_size(&original, zoom, Some(cap)) {
                style.set("font-size", size.clone());
                style.write_to(element);
                zoomed = true;
                if let (Some(now), Some(before)) =
                    (parse_float_prefix(&size), parse_float_prefix(&original))
                {
                    if now != 0.0 && before != 0.0 {
                        safe_scale = now / before;
                    }
                }

                let in_cell_alone = is_tag(element, "td")
                    && previous_element_sibling(element).is_none()
                    && next_element_sibling(element).is_none();
                if !in_cell_alone {
                    let now_width = probe.scroll_width(element);
                    if now_width > original_width {
                        let level2 = LEVEL2_SHRINK_FACTOR * original_width / now_width;
                        safe_scale *= level2;
                        if let Some(shrunk) = zoomed_size(&size, level2, None) {
                            style.set("font-size", shrunk);
                            style.write_to(element);
                        }
                    }
                }
            }
        }
    }

    if safe_scale > 1.0 {
        if let Some(zoomed_line) = style
            .get("line-height")
            .and_then(|line_height| zoomed_size(line_height, safe_scale, None))
        {
            style.set("line-height", zoomed_line);
            style.write_to(element);
        }
    } else if style.get("line-height").is_some()
        && style
            .get("font-size")
            .is_none_or(is_relative_font_size)
    {
        style.remove("line-height");
        style.write_to(element);
    }
    zoomed
}

fn zoom_font_size_attribute<P: LayoutProbe>(
    element: &NodeRef,
    size_attr: &str,
    zoom: f64,
    original_width: f64,
    probe: &P,
) {
    let Some(original) = parse_float_prefix(size_attr).filter(|size| *size > 0.0) else {
        log::debug!("Ignoring unusable font size attribute '{size_attr}'");
        return;
    };
    let size = (original * zoom).ceil();
    set_attr(element, "size", format_css_number(size));
    let now_width = probe.scroll_width(element);
    if now_width > original_width {
        let level2 = LEVEL2_SHRINK_FACTOR * original_width / now_width;
        set_attr(element, "size", format_css_number((level2 * size).floor()));
    }
}

/// Shrink the text of one overflowing cell child by `scale`.
///
/// An inline font-size change that does not move the parent's width is
/// reverted, since it only made the text smaller for nothing.
pub fn scale_down_text<P: LayoutProbe>(element: &NodeRef, scale: f64, probe: &P) -> bool {
    let mut scaled = false;
    let mut style = InlineStyle::of(element);

    let size_attr = attr(element, "size");
    if let (true, Some(size_attr)) = (is_tag(element, "font"), size_attr) {
        if let Some(original) = parse_float_prefix(&size_attr) {
            set_attr(element, "size", format_css_number((original * scale).floor()));
            scaled = true;
        }
    } else if let Some(original) = style.get("font-size").map(str::to_string) {
        let parent_width = |probe: &P| element.parent().map_or(0.0, |p| probe.scroll_width(&p));
        let original_width = parent_width(probe);
        if let Some(size) = zoomed_size(&original, scale, None) {
            style.set("font-size", size);
            style.write_to(element);
            if parent_width(probe) == original_width {
                style.set("font-size", original);
                style.write_to(element);
            } else {
                scaled = true;
            }
        }
    }

    if scaled && style.get("height").is_none() {
        if let Some(line_height) = style
            .get("line-height")
            .and_then(|line_height| zoomed_size(line_height, scale, None))
        {
            style.set("line-height", line_height);
            style.write_to(element);
        }
    }
    scaled
}

/// Fit `root` into the configured viewport width.
///
/// A no-op (ratio 1.0, nothing touched) when the content already fits.
pub fn smart_resize<P: LayoutProbe>(root: &NodeRef, probe: &P, config: &RenderConfig) -> ResizeReport {
    let target_width = config.viewport_width();
    let original_width = probe.scroll_width(root);
    if original_width <= target_width || original_width <= 0.0 {
        return ResizeReport::unscaled();
    }

    let ratio = target_width / original_width;
    let zoom = 1.0 / ratio;
    scale_element(root, original_width, ratio);

    let zoomed_sheets = zoom_style_elements(root, zoom, config.stylesheet_font_cap());

    let mut zoomed_elements = 0;
    for element in select_descendants(root, "*[style], font[size]") {
        if !config.is_on_screen(probe.bounding_top(&element)) {
            continue;
        }
        if zoom_text(&element, zoom, config.inline_font_cap(), probe) {
            zoomed_elements += 1;
        }
    }

    let slack = config.overflow_slack();
    let scroll_width = probe.scroll_width(root);
    let offset_width = probe.offset_width(root);
    if scroll_width > offset_width + slack {
        let scale = (offset_width - slack) / scroll_width;
        for element in select_descendants(root, "td > a[style], td > span[style], td > font[size]") {
            if config.is_on_screen(probe.bounding_top(&element)) {
                scale_down_text(&element, scale, probe);
            }
        }
    }

    let content_height = probe.offset_height(root).map(|height| height * ratio);
    tracing::debug!(
        ratio,
        original_width,
        target_width,
        zoomed_sheets,
        zoomed_elements,
        "smart resize applied"
    );
    ResizeReport {
        ratio,
        content_height,
        zoomed_elements,
        zoomed_sheets,
    }
}
