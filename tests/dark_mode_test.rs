//! Dark view colour inversion

mod common;

use common::{PositionedLayout, html_of, parse_with_root};
use mailview::transform::apply_dark_mode;
use mailview::{Pipeline, RenderConfig, StaticLayout};
use proptest::prelude::*;

#[test]
fn test_black_on_white_becomes_light_on_dark() {
    let (_doc, root) = parse_with_root(
        r#"<div id="c"><p id="p" style="color: #000; background-color: #fff">text</p></div>"#,
    );
    apply_dark_mode(&root, &StaticLayout::default(), &RenderConfig::default());
    let html = html_of(&root);
    assert!(html.contains("color: rgb(234,234,234) !important"));
    assert!(html.contains("background-color: rgb(37,37,37) !important"));
}

#[test]
fn test_transparent_background_untouched() {
    let (_doc, root) = parse_with_root(r#"<div id="c"><span>plain</span></div>"#);
    apply_dark_mode(&root, &StaticLayout::default(), &RenderConfig::default());
    let html = html_of(&root);
    assert!(!html.contains("background-color"));
    assert!(html.contains("color: rgb(234,234,234) !important"));
}

#[test]
fn test_offscreen_elements_skipped() {
    let (_doc, root) = parse_with_root(
        r#"<div id="c"><p id="top">visible</p><p id="far" data-top="5000" style="color: #000">far below</p></div>"#,
    );
    let changed = apply_dark_mode(&root, &PositionedLayout::default(), &RenderConfig::default());
    assert_eq!(changed, 1);
    let far = root.select_first("#far").expect("far").as_node().clone();
    assert_eq!(html_of(&far), r#"<p data-top="5000" id="far" style="color: #000">far below</p>"#);
}

#[test]
fn test_pipeline_reports_recolored_elements() {
    let pipeline = Pipeline::with_static_layout(RenderConfig::default());
    let light = pipeline.render("<p>hello</p>", false).expect("render");
    assert_eq!(light.signals.recolored_elements, 0);
    assert!(!light.html.contains("!important"));

    let dark = pipeline.render("<p>hello</p>", true).expect("render");
    assert!(dark.signals.dark_mode);
    assert!(dark.signals.recolored_elements >= 1);
    assert!(dark.html.contains("!important"));
}

fn rgb() -> impl Strategy<Value = (u8, u8, u8)> {
    (any::<u8>(), any::<u8>(), any::<u8>())
}

proptest! {
    #[test]
    fn prop_dark_mode_is_stable(fg in rgb(), bg in rgb(), nested in prop::bool::ANY) {
        let inner = if nested { "<b>bold</b>" } else { "" };
        let html = format!(
            r#"<div id="c"><p style="color: rgb({}, {}, {}); background-color: rgb({}, {}, {})">text{inner}</p><span>x</span></div>"#,
            fg.0, fg.1, fg.2, bg.0, bg.1, bg.2
        );
        let (_doc, root) = parse_with_root(&html);
        let probe = StaticLayout::default();
        let config = RenderConfig::default();

        apply_dark_mode(&root, &probe, &config);
        let once = html_of(&root);
        apply_dark_mode(&root, &probe, &config);
        prop_assert_eq!(once, html_of(&root));
    }
}
