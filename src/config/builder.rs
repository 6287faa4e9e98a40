//! Builder for `RenderConfig`
//!
//! This module provides a fluent builder interface. Every field has a
//! default, so `build()` only validates the values that would make the
//! resize arithmetic meaningless.

use crate::error::{MailviewError, MailviewResult};
use crate::utils::{
    AUTOLINK_MIN_CHARS, CONTENT_CHANGE_DEBOUNCE_MS, DARK_BASE_BACKGROUND, DARK_FALLBACK_FLOOR,
    DARK_MODE_SETTLE_MS, DEFAULT_SCREEN_HEIGHT, DEFAULT_VIEWPORT_WIDTH, INLINE_FONT_CAP_PX,
    LONG_URL_CHUNK_CHARS, OVERFLOW_SLACK_PX, STYLESHEET_FONT_CAP_PX,
};

use super::types::RenderConfig;

#[derive(Debug, Clone)]
pub struct RenderConfigBuilder {
    pub(crate) viewport_width: f64,
    pub(crate) screen_height: f64,
    pub(crate) base_background: [u8; 3],
    pub(crate) fallback_floor: [u8; 3],
    pub(crate) stylesheet_font_cap: f64,
    pub(crate) inline_font_cap: f64,
    pub(crate) overflow_slack: f64,
    pub(crate) autolink_min_chars: usize,
    pub(crate) long_url_chunk_chars: usize,
    pub(crate) debounce_ms: u64,
    pub(crate) dark_mode_settle_ms: u64,
}

impl Default for RenderConfigBuilder {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            base_background: DARK_BASE_BACKGROUND,
            fallback_floor: DARK_FALLBACK_FLOOR,
            stylesheet_font_cap: STYLESHEET_FONT_CAP_PX,
            inline_font_cap: INLINE_FONT_CAP_PX,
            overflow_slack: OVERFLOW_SLACK_PX,
            autolink_min_chars: AUTOLINK_MIN_CHARS,
            long_url_chunk_chars: LONG_URL_CHUNK_CHARS,
            debounce_ms: CONTENT_CHANGE_DEBOUNCE_MS,
            dark_mode_settle_ms: DARK_MODE_SETTLE_MS,
        }
    }
}

impl RenderConfig {
    /// Create a builder for configuring a `RenderConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }
}

impl RenderConfigBuilder {
    #[must_use]
    pub fn viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    #[must_use]
    pub fn screen_height(mut self, height: f64) -> Self {
        self.screen_height = height;
        self
    }

    #[must_use]
    pub fn base_background(mut self, rgb: [u8; 3]) -> Self {
        self.base_background = rgb;
        self
    }

    #[must_use]
    pub fn fallback_floor(mut self, rgb: [u8; 3]) -> Self {
        self.fallback_floor = rgb;
        self
    }

    #[must_use]
    pub fn stylesheet_font_cap(mut self, px: f64) -> Self {
        self.stylesheet_font_cap = px;
        self
    }

    #[must_use]
    pub fn inline_font_cap(mut self, px: f64) -> Self {
        self.inline_font_cap = px;
        self
    }

    #[must_use]
    pub fn overflow_slack(mut self, px: f64) -> Self {
        self.overflow_slack = px;
        self
    }

    #[must_use]
    pub fn autolink_min_chars(mut self, chars: usize) -> Self {
        self.autolink_min_chars = chars;
        self
    }

    #[must_use]
    pub fn long_url_chunk_chars(mut self, chars: usize) -> Self {
        self.long_url_chunk_chars = chars;
        self
    }

    #[must_use]
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    #[must_use]
    pub fn dark_mode_settle_ms(mut self, ms: u64) -> Self {
        self.dark_mode_settle_ms = ms;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns `MailviewError::InvalidConfig` when the viewport width, the
    /// screen height or one of the font caps is not strictly positive, or
    /// when the long-link chunk size is zero.
    pub fn build(self) -> MailviewResult<RenderConfig> {
        if !(self.viewport_width > 0.0) {
            return Err(MailviewError::InvalidConfig(format!(
                "viewport width must be positive, got {}",
                self.viewport_width
            )));
        }
        if !(self.screen_height > 0.0) {
            return Err(MailviewError::InvalidConfig(format!(
                "screen height must be positive, got {}",
                self.screen_height
            )));
        }
        if !(self.stylesheet_font_cap > 0.0) || !(self.inline_font_cap > 0.0) {
            return Err(MailviewError::InvalidConfig(
                "font caps must be positive".to_string(),
            ));
        }
        if self.long_url_chunk_chars == 0 {
            return Err(MailviewError::InvalidConfig(
                "long link chunk size must be non-zero".to_string(),
            ));
        }
        Ok(self.into_config())
    }

    pub(crate) fn into_config(self) -> RenderConfig {
        RenderConfig {
            viewport_width: self.viewport_width,
            screen_height: self.screen_height,
            base_background: self.base_background,
            fallback_floor: self.fallback_floor,
            stylesheet_font_cap: self.stylesheet_font_cap,
            inline_font_cap: self.inline_font_cap,
            overflow_slack: self.overflow_slack.max(0.0),
            autolink_min_chars: self.autolink_min_chars,
            long_url_chunk_chars: self.long_url_chunk_chars,
            debounce_ms: self.debounce_ms,
            dark_mode_settle_ms: self.dark_mode_settle_ms,
        }
    }
}
