//! CSS colour parsing.

use std::fmt;

/// An sRGB colour sample with alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    #[must_use]
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Parse `rgb()`/`rgba()` (comma or space syntax), hex forms,
    /// `transparent` and the basic named colours.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        let value = value
            .strip_suffix("!important")
            .map(str::trim_end)
            .unwrap_or(&value);
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
        {
            return parse_functional(args.strip_suffix(')')?);
        }
        named(value)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |idx: usize| u8::from_str_radix(&hex[idx..=idx], 16).ok().map(|n| n * 17);
    let byte = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
    match hex.len() {
        3 | 4 => {
            let a = if hex.len() == 4 {
                f64::from(nibble(3)?) / 255.0
            } else {
                1.0
            };
            Some(Rgba {
                r: nibble(0)?,
                g: nibble(1)?,
                b: nibble(2)?,
                a,
            })
        }
        6 | 8 => {
            let a = if hex.len() == 8 {
                f64::from(byte(6)?) / 255.0
            } else {
                1.0
            };
            Some(Rgba {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a,
            })
        }
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }
    let channel = |raw: &str| -> Option<u8> {
        let value = match raw.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 2.55,
            None => raw.parse::<f64>().ok()?,
        };
        Some(value.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(raw) => {
            let alpha = match raw.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().ok()? / 100.0,
                None => raw.parse::<f64>().ok()?,
            };
            alpha.clamp(0.0, 1.0)
        }
        None => 1.0,
    };
    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha,
    })
}

fn named(name: &str) -> Option<Rgba> {
    let rgb = match name {
        "transparent" => return Some(Rgba::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "purple" => (128, 0, 128),
        "fuchsia" | "magenta" => (255, 0, 255),
        "lime" => (0, 255, 0),
        "olive" => (128, 128, 0),
        "yellow" => (255, 255, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "aqua" | "cyan" => (0, 255, 255),
        "orange" => (255, 165, 0),
        "whitesmoke" => (245, 245, 245),
        _ => return None,
    };
    Some(Rgba::rgb(rgb.0, rgb.1, rgb.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_functional_forms() {
        assert_eq!(Rgba::parse("rgb(1, 2, 3)"), Some(Rgba::rgb(1, 2, 3)));
        assert_eq!(Rgba::parse("rgb(1 2 3 / 0.5)").map(|c| c.a), Some(0.5));
        assert_eq!(Rgba::parse("RGBA(0,0,0,0)"), Some(Rgba::TRANSPARENT));
        assert_eq!(Rgba::parse("rgb(100%, 0%, 0%)"), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_hex_and_named() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::rgb(255, 255, 255)));
        assert_eq!(Rgba::parse("#1a2B3c"), Some(Rgba::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(Rgba::parse("White"), Some(Rgba::rgb(255, 255, 255)));
        assert_eq!(Rgba::parse("red !important"), Some(Rgba::rgb(255, 0, 0)));
        assert!(Rgba::parse("transparent").is_some_and(|c| c.is_transparent()));
    }

    #[test]
    fn test_unparsable_colours() {
        assert_eq!(Rgba::parse("#ggg"), None);
        assert_eq!(Rgba::parse("hsl(0, 0%, 0%)"), None);
        assert_eq!(Rgba::parse("rgb(1,2)"), None);
        assert_eq!(Rgba::parse("inherit"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgba::rgb(1, 2, 3).to_string(), "rgb(1, 2, 3)");
        assert_eq!(Rgba::TRANSPARENT.to_string(), "rgba(0, 0, 0, 0)");
    }
}
