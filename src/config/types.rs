//! Core configuration types for rendering
//!
//! This module contains the `RenderConfig` struct that carries the viewport
//! metrics supplied by the host and the tuning knobs of every pass.

use serde::{Deserialize, Serialize};

/// Main configuration struct for a render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Inner width of the host view in CSS pixels.
    ///
    /// **INVARIANT:** strictly positive (checked in builder).
    pub(crate) viewport_width: f64,

    /// Screen height used as the off-screen cutoff for per-element passes
    pub(crate) screen_height: f64,

    /// Background the dark view paints behind the message
    pub(crate) base_background: [u8; 3],

    /// Floor used for base channels that are zero
    pub(crate) fallback_floor: [u8; 3],

    /// Font cap applied to stylesheet rules before zooming, in px
    pub(crate) stylesheet_font_cap: f64,

    /// Font cap applied to inline-styled elements before zooming, in px
    pub(crate) inline_font_cap: f64,

    /// Overflow tolerated before the secondary scale-down pass, in px
    pub(crate) overflow_slack: f64,

    /// Minimum trimmed text length considered for autolinking
    pub(crate) autolink_min_chars: usize,

    /// Chunk size used to break long link text
    pub(crate) long_url_chunk_chars: usize,

    /// Debounce window for repeated content-change triggers
    pub(crate) debounce_ms: u64,

    /// Completion delay after a dark-mode render
    pub(crate) dark_mode_settle_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::builder().into_config()
    }
}
