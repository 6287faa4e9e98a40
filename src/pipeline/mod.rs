//! The rendering pipeline.
//!
//! A raw message goes through two stages:
//! 1. [`Pipeline::prepare`]: pre-parse scrubbing, the media probe and quote
//!    removal. Runs once per payload.
//! 2. [`Pipeline::render_content`]: wrap the message in the container and
//!    run the content-visible passes (dark mode, autolink, artifact scrub,
//!    oversize fixes, smart resize). Runs again on every content change,
//!    always from the prepared html, so repeated runs never compound.

pub mod debounce;
pub mod payload;
pub mod renderer;

pub use debounce::Debouncer;
pub use payload::{HostPayload, TransferEncoding, decode_html, has_media, scrub_payload_html};
pub use renderer::{HostBridge, HostEvent, HostMessage, JsonLineBridge, Renderer};

use kuchiki::NodeRef;
use serde::Serialize;

use crate::config::RenderConfig;
use crate::dom::node_util::{add_class, attr, body, new_element_like, select_descendants, set_attr};
use crate::dom::{outer_html, parse_document};
use crate::error::MailviewResult;
use crate::layout::{LayoutProbe, StaticLayout};
use crate::transform;
use crate::utils::{CONTAINER_ID, LIMIT_WIDTH_CLASS};

/// Container padding when the message has no media
pub const PADDING_TEXT_CLASS: &str = "padding2ex";
/// Container padding when the message shows images or video
pub const PADDING_MEDIA_CLASS: &str = "padding2px";

/// A message after the once-per-payload stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMessage {
    /// Quote-stripped html
    pub html: String,
    pub has_media: bool,
}

impl PreparedMessage {
    #[must_use]
    pub fn padding_class(&self) -> &'static str {
        if self.has_media {
            PADDING_MEDIA_CLASS
        } else {
            PADDING_TEXT_CLASS
        }
    }
}

/// Signals reported to the host next to the transformed html
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSignals {
    pub has_media: bool,
    pub padding_class: &'static str,
    pub dark_mode: bool,
    /// Scale applied to the container, 1.0 when it fit
    pub ratio: f64,
    /// Visual height of a scaled container, for the host's body height
    pub content_height: Option<f64>,
    /// Layout width of the container; images loading wider are limited
    pub container_width: f64,
    pub recolored_elements: usize,
    pub links_created: usize,
    pub removed_artifacts: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Outer html of the `#edo-container` element
    pub html: String,
    pub signals: RenderSignals,
}

/// Runs the passes with one configuration and one layout probe
#[derive(Debug, Clone)]
pub struct Pipeline<P: LayoutProbe> {
    config: RenderConfig,
    probe: P,
}

impl Pipeline<StaticLayout> {
    /// Pipeline using the declared-size layout estimator
    #[must_use]
    pub fn with_static_layout(config: RenderConfig) -> Self {
        let probe = StaticLayout::new(config.viewport_width());
        Self { config, probe }
    }
}

impl<P: LayoutProbe> Pipeline<P> {
    pub fn new(config: RenderConfig, probe: P) -> Self {
        Self { config, probe }
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[must_use]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.config.set_viewport_width(width);
        self.probe.viewport_changed(self.config.viewport_width());
    }

    /// Scrub, probe for media and strip quotes
    #[must_use]
    pub fn prepare(&self, raw_html: &str) -> PreparedMessage {
        let scrubbed = scrub_payload_html(raw_html);
        let has_media = has_media(&scrubbed);
        let html = transform::remove_quoted_html(&scrubbed);
        PreparedMessage { html, has_media }
    }

    /// Run the content-visible passes over a prepared message.
    ///
    /// `oversized_images` lists image sources reported too wide after they
    /// loaded; they get the width-limit class.
    pub fn render_content(
        &self,
        prepared: &PreparedMessage,
        dark_mode: bool,
        oversized_images: &[String],
    ) -> MailviewResult<RenderOutput> {
        let document = parse_document(&prepared.html);
        let container = wrap_in_container(&document).unwrap_or_else(|| {
            log::warn!("Document has no body, rendering the bare document");
            document.clone()
        });

        let recolored_elements = if dark_mode {
            transform::apply_dark_mode(&container, &self.probe, &self.config)
        } else {
            0
        };
        let links_created = transform::auto_link(&container, &self.probe, &self.config);
        let scrubbed = transform::scrub_artifacts(&container, &self.probe, &self.config);
        transform::fix_oversize(&container, &self.probe, &self.config);
        mark_oversized_images(&container, oversized_images);
        let resize = transform::smart_resize(&container, &self.probe, &self.config);
        let container_width = self.probe.offset_width(&container);

        let html = outer_html(&container)?;
        tracing::debug!(
            bytes = html.len(),
            ratio = resize.ratio,
            dark_mode,
            "content passes finished"
        );
        Ok(RenderOutput {
            html,
            signals: RenderSignals {
                has_media: prepared.has_media,
                padding_class: prepared.padding_class(),
                dark_mode,
                ratio: resize.ratio,
                content_height: resize.content_height,
                container_width,
                recolored_elements,
                links_created,
                removed_artifacts: scrubbed.removed_spans,
            },
        })
    }

    /// Both stages in one go
    pub fn render(&self, raw_html: &str, dark_mode: bool) -> MailviewResult<RenderOutput> {
        let prepared = self.prepare(raw_html);
        self.render_content(&prepared, dark_mode, &[])
    }
}

/// Move the body's content, and any `<style>` from the head, into
/// `<div id="edo-container">` inside the body
fn wrap_in_container(document: &NodeRef) -> Option<NodeRef> {
    let body = body(document)?;
    let container = new_element_like(body.as_element()?, "div");
    set_attr(&container, "id", CONTAINER_ID);

    for style in select_descendants(document, "head style") {
        container.append(style);
    }
    for child in body.children().collect::<Vec<_>>() {
        container.append(child);
    }
    body.append(container.clone());
    Some(container)
}

fn mark_oversized_images(root: &NodeRef, sources: &[String]) {
    if sources.is_empty() {
        return;
    }
    for img in select_descendants(root, "img") {
        if attr(&img, "src").is_some_and(|src| sources.contains(&src)) {
            add_class(&img, LIMIT_WIDTH_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline<StaticLayout> {
        Pipeline::with_static_layout(RenderConfig::default())
    }

    #[test]
    fn test_container_wraps_body_and_head_styles() {
        let output = pipeline()
            .render("<html><head><style>p{}</style></head><body><p>hi</p></body></html>", false)
            .expect("render");
        assert_eq!(
            output.html,
            r#"<div id="edo-container"><style>p{}</style><p>hi</p></div>"#
        );
        assert_eq!(output.signals.padding_class, PADDING_TEXT_CLASS);
        assert_eq!(output.signals.ratio, 1.0);
    }

    #[test]
    fn test_media_signal() {
        let output = pipeline().render(r#"<img src="a.png">"#, false).expect("render");
        assert!(output.signals.has_media);
        assert_eq!(output.signals.padding_class, PADDING_MEDIA_CLASS);
    }

    #[test]
    fn test_late_oversized_images_are_limited() {
        let p = pipeline();
        let prepared = p.prepare(r#"<img src="a.png"><img src="b.png">"#);
        let output = p
            .render_content(&prepared, false, &["b.png".to_string()])
            .expect("render");
        assert_eq!(output.html.matches(LIMIT_WIDTH_CLASS).count(), 1);
        assert!(output.html.contains(r#"<img src="a.png">"#));
    }
}
