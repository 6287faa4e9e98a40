//! Prepares untrusted HTML email bodies for display in a narrow,
//! dark-mode capable message view.
//!
//! The work happens in [`Pipeline`]: quote-chain removal, colour
//! inversion, responsive scaling, autolinking and artifact scrubbing over
//! a mutable `kuchiki` tree. [`Renderer`] wraps a pipeline in a host
//! session (payload intake, load signalling, resize and image-load
//! re-renders).

pub mod config;
pub mod dom;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod transform;
pub mod utils;

pub use config::{RenderConfig, RenderConfigBuilder};
pub use error::{MailviewError, MailviewResult};
pub use layout::{ColorProperty, LayoutProbe, StaticLayout};
pub use pipeline::{
    HostBridge, HostEvent, HostMessage, HostPayload, JsonLineBridge, Pipeline, PreparedMessage,
    RenderOutput, RenderSignals, Renderer, TransferEncoding,
};
pub use transform::{has_quoted_html, remove_quoted_html};

/// Run every pass once over `html` with the default configuration
///
/// # Errors
///
/// Fails only when the transformed tree cannot be serialized.
pub fn render_html(html: &str, dark_mode: bool) -> MailviewResult<RenderOutput> {
    Pipeline::with_static_layout(RenderConfig::default()).render(html, dark_mode)
}
