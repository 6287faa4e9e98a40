//! Getter methods for `RenderConfig`
//!
//! This module provides the accessor methods for retrieving configuration
//! values from a `RenderConfig` instance.

use std::time::Duration;

use super::types::RenderConfig;

impl RenderConfig {
    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    #[must_use]
    pub fn screen_height(&self) -> f64 {
        self.screen_height
    }

    #[must_use]
    pub fn base_background(&self) -> [u8; 3] {
        self.base_background
    }

    #[must_use]
    pub fn fallback_floor(&self) -> [u8; 3] {
        self.fallback_floor
    }

    #[must_use]
    pub fn stylesheet_font_cap(&self) -> f64 {
        self.stylesheet_font_cap
    }

    #[must_use]
    pub fn inline_font_cap(&self) -> f64 {
        self.inline_font_cap
    }

    #[must_use]
    pub fn overflow_slack(&self) -> f64 {
        self.overflow_slack
    }

    #[must_use]
    pub fn autolink_min_chars(&self) -> usize {
        self.autolink_min_chars
    }

    #[must_use]
    pub fn long_url_chunk_chars(&self) -> usize {
        self.long_url_chunk_chars
    }

    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn dark_mode_settle(&self) -> Duration {
        Duration::from_millis(self.dark_mode_settle_ms)
    }

    /// Whether an element whose top edge sits at `top` should be processed
    #[must_use]
    pub fn is_on_screen(&self, top: f64) -> bool {
        top < self.screen_height
    }

    /// Replace the viewport width after a host resize event
    pub fn set_viewport_width(&mut self, width: f64) {
        if width > 0.0 {
            self.viewport_width = width;
        } else {
            log::warn!("Ignoring non-positive viewport width {width}");
        }
    }
}
