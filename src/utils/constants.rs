//! Shared configuration constants for mailview
//!
//! This module contains default values and tuning constants used
//! throughout the passes to ensure consistency and avoid magic numbers.

/// Default viewport width: 375 CSS pixels
///
/// The narrowest common phone width. Hosts are expected to override this
/// with the real inner width of their view.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 375.0;

/// Default screen height cutoff: 2000 CSS pixels
///
/// Elements whose top edge lies at or beyond this offset are treated as
/// off-screen and skipped by the per-element passes.
pub const DEFAULT_SCREEN_HEIGHT: f64 = 2000.0;

/// Base background of the dark view: `rgb(37,37,37)`
///
/// Bright backgrounds are darkened toward this colour, never below it.
pub const DARK_BASE_BACKGROUND: [u8; 3] = [37, 37, 37];

/// Per-channel floor used when the base background has a zero channel
pub const DARK_FALLBACK_FLOOR: [u8; 3] = [27, 28, 30];

/// Brightest value a brightened foreground channel may reach
pub const DARK_FOREGROUND_CAP: f64 = 234.0;

/// Foreground colours below this HSP brightness are brightened
pub const DARK_FOREGROUND_THRESHOLD: f64 = 130.0;

/// Background colours above this HSP brightness are darkened
pub const LIGHT_BACKGROUND_THRESHOLD: f64 = 200.0;

/// Saturation kept when a colour is desaturated instead of inverted
pub const DESATURATION_RETAIN: f64 = 0.8;

/// Font zoom cap for stylesheet rules: 17px before zoom
pub const STYLESHEET_FONT_CAP_PX: f64 = 17.0;

/// Font zoom cap for inline-styled elements: 15px before zoom
pub const INLINE_FONT_CAP_PX: f64 = 15.0;

/// Slack, in pixels, tolerated before the secondary scale-down runs
pub const OVERFLOW_SLACK_PX: f64 = 20.0;

/// Extra shrink applied when a zoomed element overflows its original width
pub const LEVEL2_SHRINK_FACTOR: f64 = 0.9;

/// Text nodes shorter than this (after trimming) are never autolinked
pub const AUTOLINK_MIN_CHARS: usize = 4;

/// Link text longer than this is broken into chunks with `<wbr>`
pub const LONG_URL_CHUNK_CHARS: usize = 30;

/// Debounce window for repeated content-change triggers (milliseconds)
pub const CONTENT_CHANGE_DEBOUNCE_MS: u64 = 300;

/// Delay before reporting completion in dark mode (milliseconds)
///
/// Lets layout settle after the colour rewrite before the host measures.
pub const DARK_MODE_SETTLE_MS: u64 = 300;

/// Assumed default font size when nothing is declared
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Maximum HTML input size accepted by the parser (10 MB)
///
/// Larger payloads are replaced by an error placeholder document.
pub const MAX_HTML_SIZE: usize = 10 * 1024 * 1024;

/// Id of the wrapper element the content passes operate on
pub const CONTAINER_ID: &str = "edo-container";

/// Class added to a scaled root element
pub const TRANSFORM_CLASS: &str = "edo-transform";

/// Class added to images wider than the container
pub const LIMIT_WIDTH_CLASS: &str = "edo-limit-width";
