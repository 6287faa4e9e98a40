//! Host session: payload intake, re-render triggers and host signalling.

use std::io::Write;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::debounce::Debouncer;
use super::payload::{HostPayload, TransferEncoding};
use super::{Pipeline, PreparedMessage, RenderOutput};
use crate::error::MailviewResult;
use crate::layout::LayoutProbe;

/// Signals sent to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostEvent {
    /// The renderer is ready for payloads
    IsMounted,
    /// The current payload finished rendering
    OnLoad,
}

/// Wire form: `{"type":"onLoad","data":true}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMessage {
    #[serde(rename = "type")]
    pub event: HostEvent,
    pub data: bool,
}

impl From<HostEvent> for HostMessage {
    fn from(event: HostEvent) -> Self {
        Self { event, data: true }
    }
}

/// Channel back to the embedding host
pub trait HostBridge {
    fn post_message(&mut self, message: HostMessage);
}

/// Collects messages in memory
impl HostBridge for Vec<HostMessage> {
    fn post_message(&mut self, message: HostMessage) {
        self.push(message);
    }
}

/// Writes each message as one JSON line
#[derive(Debug)]
pub struct JsonLineBridge<W: Write> {
    writer: W,
}

impl<W: Write> JsonLineBridge<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HostBridge for JsonLineBridge<W> {
    fn post_message(&mut self, message: HostMessage) {
        let written = serde_json::to_writer(&mut self.writer, &message)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = written {
            log::warn!("Failed to post {:?} to host: {e}", message.event);
        }
    }
}

/// One rendering session bound to a host.
///
/// Time is passed in by the caller (`now`), so timers are just deadlines
/// checked by [`Renderer::tick`].
pub struct Renderer<B: HostBridge, P: LayoutProbe> {
    pipeline: Pipeline<P>,
    bridge: B,
    encoding: TransferEncoding,
    window_width: f64,

    raw_html: Option<String>,
    dark_mode: bool,
    prepared: Option<PreparedMessage>,
    output: Option<RenderOutput>,
    oversized_images: Vec<String>,

    onload_sent: bool,
    onload_due: Option<Instant>,
    content_change: Debouncer,
}

impl<B: HostBridge, P: LayoutProbe> Renderer<B, P> {
    /// Create the session and tell the host it is mounted
    pub fn new(pipeline: Pipeline<P>, mut bridge: B, encoding: TransferEncoding) -> Self {
        bridge.post_message(HostEvent::IsMounted.into());
        let content_change = Debouncer::new(pipeline.config().debounce_window());
        let window_width = pipeline.config().viewport_width();
        Self {
            pipeline,
            bridge,
            encoding,
            window_width,
            raw_html: None,
            dark_mode: false,
            prepared: None,
            output: None,
            oversized_images: Vec::new(),
            onload_sent: false,
            onload_due: None,
            content_change,
        }
    }

    /// Accept a host payload (`{"html": ..., "isDarkMode": ...}`).
    ///
    /// A payload without html is ignored and returns `Ok(None)`.
    pub fn set_html(&mut self, params: &str, now: Instant) -> MailviewResult<Option<&RenderOutput>> {
        let payload = HostPayload::from_json(params)?;
        if !payload.has_html() {
            log::debug!("Ignoring payload without html");
            return Ok(None);
        }
        let html = payload.decode_html(self.encoding)?;

        self.prepared = Some(self.pipeline.prepare(&html));
        self.raw_html = Some(html);
        self.dark_mode = payload.is_dark_mode;
        self.oversized_images.clear();
        self.content_change.cancel();
        self.onload_sent = false;
        self.onload_due = None;

        self.on_content_change(now)?;
        Ok(self.output.as_ref())
    }

    /// Re-run the content passes and schedule the load signal
    fn on_content_change(&mut self, now: Instant) -> MailviewResult<()> {
        let Some(prepared) = &self.prepared else {
            return Ok(());
        };
        let output =
            self.pipeline
                .render_content(prepared, self.dark_mode, &self.oversized_images)?;
        self.output = Some(output);

        if !self.onload_sent {
            if self.dark_mode {
                // let the recoloured layout settle before the host measures
                if self.onload_due.is_none() {
                    self.onload_due = Some(now + self.pipeline.config().dark_mode_settle());
                }
            } else {
                self.send_onload();
            }
        }
        Ok(())
    }

    fn send_onload(&mut self) {
        self.onload_sent = true;
        self.onload_due = None;
        self.bridge.post_message(HostEvent::OnLoad.into());
    }

    /// Deliver due timers: the delayed load signal and debounced re-renders.
    ///
    /// Returns whether a re-render ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.onload_due.is_some_and(|due| now >= due) {
            self.send_onload();
        }
        if !self.content_change.poll(now) {
            return false;
        }
        match self.on_content_change(now) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Debounced re-render failed: {e}");
                false
            }
        }
    }

    /// The host view changed width.
    ///
    /// A scaled message is rebuilt from the raw payload; an unscaled one
    /// only reruns the content passes. Returns whether anything ran.
    pub fn on_window_resize(&mut self, width: f64, now: Instant) -> MailviewResult<bool> {
        if width == self.window_width {
            return Ok(false);
        }
        self.window_width = width;
        self.pipeline.set_viewport_width(width);
        if self.prepared.is_none() {
            return Ok(false);
        }

        let was_scaled = self
            .output
            .as_ref()
            .is_some_and(|output| output.signals.ratio != 1.0);
        if was_scaled {
            if let Some(raw) = &self.raw_html {
                tracing::debug!(width, "scaled message resized, rebuilding from payload");
                self.prepared = Some(self.pipeline.prepare(raw));
            }
        }
        self.on_content_change(now)?;
        Ok(true)
    }

    /// An image finished loading at `width` pixels.
    ///
    /// Images wider than the rendered container get the width limit and
    /// schedule a debounced re-render. Returns whether the image was
    /// oversized.
    pub fn on_image_loaded(&mut self, src: &str, width: f64, now: Instant) -> bool {
        let container_width = self.output.as_ref().map_or_else(
            || self.pipeline.config().viewport_width(),
            |output| output.signals.container_width,
        );
        if width <= container_width {
            return false;
        }
        if !self.oversized_images.iter().any(|known| known == src) {
            self.oversized_images.push(src.to_string());
        }
        self.content_change.trigger(now);
        true
    }

    #[must_use]
    pub fn output(&self) -> Option<&RenderOutput> {
        self.output.as_ref()
    }

    #[must_use]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    /// End the session and hand back the bridge
    pub fn into_bridge(self) -> B {
        self.bridge
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<P> {
        &self.pipeline
    }

    /// Whether a timer is still waiting for [`Renderer::tick`]
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.onload_due.is_some() || self.content_change.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_message_wire_format() {
        let json = serde_json::to_string(&HostMessage::from(HostEvent::OnLoad)).expect("json");
        assert_eq!(json, r#"{"type":"onLoad","data":true}"#);
        let json = serde_json::to_string(&HostMessage::from(HostEvent::IsMounted)).expect("json");
        assert_eq!(json, r#"{"type":"isMounted","data":true}"#);
    }

    #[test]
    fn test_json_line_bridge() {
        let mut bridge = JsonLineBridge::new(Vec::new());
        bridge.post_message(HostEvent::IsMounted.into());
        let written = String::from_utf8(bridge.into_inner()).expect("utf8");
        assert_eq!(written, "{\"type\":\"isMounted\",\"data\":true}\n");
    }

    use std::time::Duration;

    use crate::config::RenderConfig;
    use crate::layout::StaticLayout;

    fn renderer() -> Renderer<Vec<HostMessage>, StaticLayout> {
        let pipeline = Pipeline::with_static_layout(RenderConfig::default());
        Renderer::new(pipeline, Vec::new(), TransferEncoding::Percent)
    }

    fn events(renderer: &Renderer<Vec<HostMessage>, StaticLayout>) -> Vec<HostEvent> {
        renderer.bridge().iter().map(|m| m.event).collect()
    }

    #[test]
    fn test_mounted_on_creation() {
        let renderer = renderer();
        assert_eq!(events(&renderer), vec![HostEvent::IsMounted]);
        assert!(renderer.output().is_none());
    }

    #[test]
    fn test_light_payload_loads_immediately() {
        let mut renderer = renderer();
        let now = Instant::now();
        let output = renderer
            .set_html(r#"{"html":"%3Cp%3Ehi%3C%2Fp%3E"}"#, now)
            .expect("payload")
            .expect("rendered");
        assert!(output.html.contains("<p>hi</p>"));
        assert_eq!(events(&renderer), vec![HostEvent::IsMounted, HostEvent::OnLoad]);
        assert!(!renderer.has_pending_work());
    }

    #[test]
    fn test_payload_without_html_is_ignored() {
        let mut renderer = renderer();
        let result = renderer.set_html(r#"{"isDarkMode":true}"#, Instant::now());
        assert!(matches!(result, Ok(None)));
        assert_eq!(events(&renderer), vec![HostEvent::IsMounted]);
    }

    #[test]
    fn test_dark_payload_waits_for_settle() {
        let mut renderer = renderer();
        let now = Instant::now();
        renderer
            .set_html(r#"{"html":"%3Cp%3Ehi%3C%2Fp%3E","isDarkMode":true}"#, now)
            .expect("payload");
        assert_eq!(events(&renderer), vec![HostEvent::IsMounted]);

        renderer.tick(now + Duration::from_millis(100));
        assert_eq!(renderer.bridge().len(), 1);

        renderer.tick(now + Duration::from_millis(300));
        assert_eq!(events(&renderer), vec![HostEvent::IsMounted, HostEvent::OnLoad]);
    }

    #[test]
    fn test_image_load_rerender_is_debounced() {
        let mut renderer = renderer();
        let now = Instant::now();
        renderer
            .set_html(r#"{"html":"%3Cimg%20src%3D%22a.png%22%3E"}"#, now)
            .expect("payload");
        assert!(!renderer.on_image_loaded("a.png", 100.0, now));
        assert!(renderer.on_image_loaded("a.png", 900.0, now));
        assert!(renderer.on_image_loaded("a.png", 900.0, now + Duration::from_millis(200)));

        assert!(!renderer.tick(now + Duration::from_millis(300)));
        assert!(renderer.tick(now + Duration::from_millis(500)));
        let html = &renderer.output().expect("output").html;
        assert!(html.contains(crate::utils::LIMIT_WIDTH_CLASS));
        // OnLoad is not repeated for the same payload
        assert_eq!(renderer.bridge().len(), 2);
    }

    /// Static layout whose container box loses 10px of padding per side
    #[derive(Debug, Default)]
    struct PaddedContainer(StaticLayout);

    impl LayoutProbe for PaddedContainer {
        fn computed_color(
            &self,
            node: &kuchiki::NodeRef,
            property: crate::layout::ColorProperty,
        ) -> Option<String> {
            self.0.computed_color(node, property)
        }

        fn bounding_top(&self, node: &kuchiki::NodeRef) -> f64 {
            self.0.bounding_top(node)
        }

        fn scroll_width(&self, node: &kuchiki::NodeRef) -> f64 {
            self.0.scroll_width(node)
        }

        fn offset_width(&self, node: &kuchiki::NodeRef) -> f64 {
            let width = self.0.offset_width(node);
            if crate::dom::node_util::attr(node, "id").as_deref() == Some(crate::utils::CONTAINER_ID) {
                width - 20.0
            } else {
                width
            }
        }

        fn offset_height(&self, node: &kuchiki::NodeRef) -> Option<f64> {
            self.0.offset_height(node)
        }

        fn computed_font_size(&self, node: &kuchiki::NodeRef) -> Option<String> {
            self.0.computed_font_size(node)
        }
    }

    #[test]
    fn test_image_wider_than_padded_container_is_oversized() {
        let pipeline = Pipeline::new(RenderConfig::default(), PaddedContainer::default());
        let mut renderer = Renderer::new(pipeline, Vec::new(), TransferEncoding::Percent);
        let now = Instant::now();
        renderer
            .set_html(r#"{"html":"%3Cimg%20src%3D%22a.png%22%3E"}"#, now)
            .expect("payload");
        assert_eq!(renderer.output().expect("output").signals.container_width, 355.0);

        // narrower than the viewport, wider than the container
        assert!(renderer.on_image_loaded("a.png", 365.0, now));
        assert!(!renderer.on_image_loaded("b.png", 350.0, now));
    }

    #[test]
    fn test_resize_to_same_width_is_ignored() {
        let mut renderer = renderer();
        let now = Instant::now();
        renderer
            .set_html(r#"{"html":"%3Cp%3Ehi%3C%2Fp%3E"}"#, now)
            .expect("payload");
        let width = renderer.pipeline().config().viewport_width();
        assert!(!renderer.on_window_resize(width, now).expect("resize"));
        assert!(renderer.on_window_resize(width + 100.0, now).expect("resize"));
        assert_eq!(renderer.pipeline().config().viewport_width(), width + 100.0);
    }
}
