//! Length values and unit conversion for font and line-height rewriting.

use crate::utils::{format_css_number, parse_float_prefix};

/// Absolute CSS length units the resize pass is allowed to touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsoluteUnit {
    Px,
    Pt,
    Cm,
    Mm,
    In,
    Pc,
}

impl AbsoluteUnit {
    /// Detect the unit from the value's suffix
    pub fn of(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        // "rem" and "em" never collide with these suffixes
        if value.ends_with("px") {
            Some(Self::Px)
        } else if value.ends_with("pt") {
            Some(Self::Pt)
        } else if value.ends_with("cm") {
            Some(Self::Cm)
        } else if value.ends_with("mm") {
            Some(Self::Mm)
        } else if value.ends_with("in") {
            Some(Self::In)
        } else if value.ends_with("pc") {
            Some(Self::Pc)
        } else {
            None
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Pt => "pt",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::In => "in",
            Self::Pc => "pc",
        }
    }

    /// How many of this unit make one CSS pixel
    pub fn per_px(self) -> f64 {
        match self {
            Self::Px => 1.0,
            Self::Pt => 0.75,
            Self::Cm => 1.0 / 37.8,
            Self::Mm => 1.0 / 3.78,
            Self::In => 1.0 / 96.0,
            Self::Pc => 1.0 / 16.0,
        }
    }
}

/// Convert an absolute length to CSS pixels
pub fn to_px(value: &str) -> Option<f64> {
    let unit = AbsoluteUnit::of(value)?;
    let number = parse_float_prefix(value)?;
    Some(number / unit.per_px())
}

/// Scale an absolute length by `scale`, optionally capping it first.
///
/// `max_px` is expressed in CSS pixels and converted into the value's own
/// unit before the cap is applied. Relative or unitless values return
/// `None` and must be left alone.
pub fn zoomed_size(value: &str, scale: f64, max_px: Option<f64>) -> Option<String> {
    let unit = AbsoluteUnit::of(value)?;
    let number = parse_float_prefix(value)?;
    if !scale.is_finite() {
        return None;
    }
    let base = match max_px {
        Some(max) if max > 0.0 => number.min(max * unit.per_px()),
        _ => number,
    };
    Some(format!("{}{}", format_css_number(base * scale), unit.suffix()))
}

/// Font sizes that follow their ancestors and so already track any scaling
pub fn is_relative_font_size(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    !value.is_empty()
        && (value.ends_with("em")
            || value.ends_with("rem")
            || value.ends_with("ch")
            || value.ends_with("vw")
            || value.ends_with('%'))
}

/// Legacy `<font size=N>` to pixels, per the HTML rendering defaults
pub fn font_size_attr_px(size: f64) -> f64 {
    match size.round() as i64 {
        i64::MIN..=1 => 10.0,
        2 => 13.0,
        3 => 16.0,
        4 => 18.0,
        5 => 24.0,
        6 => 32.0,
        _ => 48.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoomed_size_px() {
        assert_eq!(zoomed_size("12px", 2.0, None).as_deref(), Some("24px"));
        assert_eq!(zoomed_size("12px", 2.0, Some(10.0)).as_deref(), Some("20px"));
    }

    #[test]
    fn test_cap_is_converted_into_value_unit() {
        // 15px == 11.25pt, so 14pt is capped at 11.25pt before zooming
        assert_eq!(zoomed_size("14pt", 2.0, Some(15.0)).as_deref(), Some("22.5pt"));
        // 10pt is below the cap and zooms untouched
        assert_eq!(zoomed_size("10pt", 2.0, Some(15.0)).as_deref(), Some("20pt"));
    }

    #[test]
    fn test_relative_units_are_not_zoomed() {
        for value in ["1.2em", "2rem", "80%", "3vw", "10ch", "normal", "1.5"] {
            assert_eq!(zoomed_size(value, 2.0, None), None, "{value}");
        }
        assert!(is_relative_font_size("1.2em"));
        assert!(is_relative_font_size("90%"));
        assert!(!is_relative_font_size("12px"));
        assert!(!is_relative_font_size(""));
    }

    #[test]
    fn test_to_px() {
        assert_eq!(to_px("12pt"), Some(16.0));
        assert_eq!(to_px("1in"), Some(96.0));
        assert_eq!(to_px("2em"), None);
    }

    #[test]
    fn test_font_size_attr_px() {
        assert_eq!(font_size_attr_px(3.0), 16.0);
        assert_eq!(font_size_attr_px(9.0), 48.0);
        assert_eq!(font_size_attr_px(-1.0), 10.0);
    }
}
