//! Client-injected artifacts.

use kuchiki::NodeRef;

use crate::config::RenderConfig;
use crate::dom::InlineStyle;
use crate::dom::node_util::{is_tag, select_descendants, set_attr};
use crate::layout::LayoutProbe;

/// Hides an embedded object once the user clicks it
const DISMISS_ON_CLICK: &str = "this.style.display='none'";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrubReport {
    pub removed_spans: usize,
    pub disabled_objects: usize,
}

/// `<span style="font-size:1px">` is how some senders hide preview text
pub fn is_hidden_text_span(node: &NodeRef) -> bool {
    is_tag(node, "span") && InlineStyle::of(node).get("font-size") == Some("1px")
}

/// Remove hidden-text spans and make `<object>` elements click-to-dismiss
pub fn scrub_artifacts<P: LayoutProbe>(root: &NodeRef, probe: &P, config: &RenderConfig) -> ScrubReport {
    let mut report = ScrubReport::default();

    let hidden: Vec<NodeRef> = select_descendants(root, "span[style]")
        .into_iter()
        .filter(|span| config.is_on_screen(probe.bounding_top(span)))
        .filter(is_hidden_text_span)
        .collect();
    for span in hidden {
        span.detach();
        report.removed_spans += 1;
    }

    for object in select_descendants(root, "object") {
        set_attr(&object, "onclick", DISMISS_ON_CLICK);
        report.disabled_objects += 1;
    }

    if report != ScrubReport::default() {
        log::debug!(
            "Scrubbed {} hidden-text spans, disabled {} objects",
            report.removed_spans,
            report.disabled_objects
        );
    }
    report
}
