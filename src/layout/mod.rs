//! Layout capability interface.
//!
//! The passes never measure anything themselves. Every geometric or
//! computed-style question goes through a [`LayoutProbe`], so a host with
//! a real layout engine can answer precisely while the bundled
//! [`StaticLayout`] estimates from declared attributes and inline styles.

mod static_layout;

pub use static_layout::StaticLayout;

use kuchiki::NodeRef;

/// Which computed colour property is being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorProperty {
    Color,
    BackgroundColor,
}

impl ColorProperty {
    /// CSS property name
    #[must_use]
    pub fn css_name(self) -> &'static str {
        match self {
            ColorProperty::Color => "color",
            ColorProperty::BackgroundColor => "background-color",
        }
    }
}

/// Minimal computed-style and geometry queries needed by the passes
pub trait LayoutProbe {
    /// Computed colour string (e.g. `rgb(0, 0, 0)`), `None` if unknown
    fn computed_color(&self, node: &NodeRef, property: ColorProperty) -> Option<String>;

    /// Top edge of the element's bounding box relative to the viewport
    fn bounding_top(&self, node: &NodeRef) -> f64;

    /// Width of the element's content including overflow
    fn scroll_width(&self, node: &NodeRef) -> f64;

    /// Layout width of the element's box
    fn offset_width(&self, node: &NodeRef) -> f64;

    /// Layout height of the element's box, `None` if it cannot be known
    fn offset_height(&self, node: &NodeRef) -> Option<f64>;

    /// Computed font size with unit (e.g. `16px`)
    fn computed_font_size(&self, node: &NodeRef) -> Option<String>;

    /// The host's viewport width changed
    fn viewport_changed(&mut self, _width: f64) {}
}
