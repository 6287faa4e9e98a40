//! Colour inversion for the dark view.
//!
//! Works per element on the computed `color` and `background-color`:
//! - dark text (HSP < 130) is brightened, capped at 234 per channel
//! - bright backgrounds (HSP > 200) are pulled down to the base background
//! - everything else is desaturated by 20% toward gray
//!
//! Transparent samples are never touched. The source colour is stashed in a
//! `data-mv-*` attribute the first time an element is rewritten and every
//! later run recomputes from it, so repeated passes never drift.

use kuchiki::NodeRef;

use crate::config::RenderConfig;
use crate::dom::InlineStyle;
use crate::dom::color::Rgba;
use crate::dom::node_util::{attr, set_attr};
use crate::layout::{ColorProperty, LayoutProbe};
use crate::utils::{
    DARK_FOREGROUND_CAP, DARK_FOREGROUND_THRESHOLD, DESATURATION_RETAIN,
    LIGHT_BACKGROUND_THRESHOLD,
};

const STASH_COLOR: &str = "data-mv-color";
const STASH_BACKGROUND: &str = "data-mv-background";

/// Perceptual brightness, see <http://alienryderflex.com/hsp.html>
#[must_use]
pub fn hsp(color: Rgba) -> f64 {
    let [r, g, b] = color.channels().map(f64::from);
    (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt()
}

/// Dark-view replacement for one colour sample, as `[r, g, b]`.
///
/// Lifted foregrounds and floored backgrounds keep their fractional
/// channels; only desaturation rounds.
#[must_use]
pub fn reversed_color(
    color: Rgba,
    property: ColorProperty,
    base_background: [u8; 3],
    fallback_floor: [u8; 3],
) -> [f64; 3] {
    let brightness = hsp(color);
    let channels = color.channels().map(f64::from);
    match property {
        ColorProperty::Color if brightness < DARK_FOREGROUND_THRESHOLD => {
            let delta = 255.0 - brightness;
            channels.map(|c| (c + delta).min(DARK_FOREGROUND_CAP))
        }
        ColorProperty::BackgroundColor if brightness > LIGHT_BACKGROUND_THRESHOLD => {
            let mut reversed = channels;
            for (idx, channel) in reversed.iter_mut().enumerate() {
                let base = base_background[idx];
                let floor = f64::from(if base == 0 { fallback_floor[idx] } else { base });
                *channel = (*channel - brightness).max(floor);
            }
            reversed
        }
        _ => desaturate(color).channels().map(f64::from),
    }
}

/// `rgb(r,g,b)` with channels printed in their shortest exact form
#[must_use]
pub fn css_rgb([r, g, b]: [f64; 3]) -> String {
    format!("rgb({r},{g},{b})")
}

/// Blend toward the luminance gray, keeping 80% of the saturation
#[must_use]
pub fn desaturate(color: Rgba) -> Rgba {
    let [r, g, b] = color.channels().map(f64::from);
    let gray = r * 0.3086 + g * 0.6094 + b * 0.082;
    let blend = |c: f64| {
        (c * DESATURATION_RETAIN + gray * (1.0 - DESATURATION_RETAIN))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba::rgb(blend(r), blend(g), blend(b))
}

/// Rewrite both colours of one element; returns whether anything changed
pub fn apply_dark_mode_for_node<P: LayoutProbe>(
    node: &NodeRef,
    probe: &P,
    base_background: [u8; 3],
    fallback_floor: [u8; 3],
) -> bool {
    let mut style = InlineStyle::of(node);
    let mut changed = false;

    for (property, stash) in [
        (ColorProperty::Color, STASH_COLOR),
        (ColorProperty::BackgroundColor, STASH_BACKGROUND),
    ] {
        let source = match attr(node, stash) {
            Some(stashed) => stashed,
            None => match probe.computed_color(node, property) {
                Some(computed) => computed,
                None => continue,
            },
        };
        let Some(sample) = Rgba::parse(&source) else {
            log::debug!("Skipping unparsable {} '{source}'", property.css_name());
            continue;
        };
        if sample.is_transparent() {
            continue;
        }
        let reversed = reversed_color(sample, property, base_background, fallback_floor);
        if attr(node, stash).is_none() {
            set_attr(node, stash, source);
        }
        style.set_with_priority(
            property.css_name(),
            css_rgb(reversed),
            true,
        );
        changed = true;
    }

    if changed {
        style.write_to(node);
    }
    changed
}

/// Apply the dark view to every element under `root`.
///
/// Elements are visited in reverse document order so descendants read
/// their inherited colour before any ancestor is rewritten. Elements below
/// the screen cutoff are skipped. Returns the number of elements changed.
pub fn apply_dark_mode<P: LayoutProbe>(root: &NodeRef, probe: &P, config: &RenderConfig) -> usize {
    let elements: Vec<NodeRef> = root
        .descendants()
        .filter(|node| node.as_element().is_some())
        .collect();

    let mut changed = 0;
    for node in elements.iter().rev() {
        if !config.is_on_screen(probe.bounding_top(node)) {
            continue;
        }
        if apply_dark_mode_for_node(
            node,
            probe,
            config.base_background(),
            config.fallback_floor(),
        ) {
            changed += 1;
        }
    }
    tracing::debug!(changed, "dark mode pass finished");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{DARK_BASE_BACKGROUND, DARK_FALLBACK_FLOOR};

    fn reverse(color: Rgba, property: ColorProperty) -> [f64; 3] {
        reversed_color(color, property, DARK_BASE_BACKGROUND, DARK_FALLBACK_FLOOR)
    }

    #[test]
    fn test_black_text_becomes_light_gray() {
        assert_eq!(
            reverse(Rgba::rgb(0, 0, 0), ColorProperty::Color),
            [234.0, 234.0, 234.0]
        );
    }

    #[test]
    fn test_white_background_hits_base_floor() {
        assert_eq!(
            reverse(Rgba::rgb(255, 255, 255), ColorProperty::BackgroundColor),
            [37.0, 37.0, 37.0]
        );
    }

    #[test]
    fn test_zero_base_channels_use_fallback_floor() {
        let color = reversed_color(
            Rgba::rgb(255, 255, 255),
            ColorProperty::BackgroundColor,
            [0, 0, 0],
            DARK_FALLBACK_FLOOR,
        );
        assert_eq!(color, [27.0, 28.0, 30.0]);
    }

    #[test]
    fn test_mid_colors_are_desaturated() {
        // white text is already light: desaturating gray keeps it
        assert_eq!(
            reverse(Rgba::rgb(255, 255, 255), ColorProperty::Color),
            [255.0, 255.0, 255.0]
        );
        // dark background stays dark
        let dark = reverse(Rgba::rgb(20, 20, 20), ColorProperty::BackgroundColor);
        assert_eq!(dark, [20.0, 20.0, 20.0]);
        let red = desaturate(Rgba::rgb(255, 0, 0));
        assert!(red.r < 255 && red.g > 0);
    }

    #[test]
    fn test_lifted_channels_are_not_rounded() {
        let [r, g, b] = reverse(Rgba::rgb(0, 0, 120), ColorProperty::Color);
        let expected = 255.0 - (0.114_f64 * 120.0 * 120.0).sqrt();
        assert!((r - expected).abs() < 1e-9);
        assert_eq!(r, g);
        assert_eq!(b, 234.0);
        assert!(r.fract() != 0.0);
        assert!(css_rgb([r, g, b]).starts_with("rgb(214.483"));
        assert_eq!(css_rgb([234.0, 234.0, 234.0]), "rgb(234,234,234)");
    }

    #[test]
    fn test_hsp() {
        assert_eq!(hsp(Rgba::rgb(0, 0, 0)), 0.0);
        assert!((hsp(Rgba::rgb(255, 255, 255)) - 255.0).abs() < 1e-9);
    }
}
