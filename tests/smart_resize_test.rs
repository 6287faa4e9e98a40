//! Fitting wide layouts into the viewport

mod common;

use common::{PositionedLayout, config_with_width, html_of, parse_with_root};
use mailview::transform::smart_resize;
use mailview::utils::TRANSFORM_CLASS;
use mailview::{Pipeline, RenderConfig, StaticLayout};

#[test]
fn test_fitting_content_is_untouched() {
    let (_doc, root) = parse_with_root(r#"<div id="c"><p style="font-size: 12px">short text</p></div>"#);
    let before = html_of(&root);
    let report = smart_resize(&root, &StaticLayout::default(), &RenderConfig::default());
    assert_eq!(report.ratio, 1.0);
    assert!(!report.is_scaled());
    assert_eq!(html_of(&root), before);
}

#[test]
fn test_wide_table_is_scaled_and_text_compensated() {
    let (_doc, root) = parse_with_root(
        r#"<div id="c"><table width="750"><tr><td style="font-size: 12px; line-height: 14px">Hello</td></tr></table></div>"#,
    );
    let report = smart_resize(&root, &StaticLayout::default(), &RenderConfig::default());
    assert_eq!(report.ratio, 0.5);
    assert_eq!(report.zoomed_elements, 1);

    let root_style = root
        .as_element()
        .and_then(|el| el.attributes.borrow().get("style").map(str::to_string));
    assert_eq!(
        root_style.as_deref(),
        Some("width: 750px; transform: scale(0.5)")
    );
    let html = html_of(&root);
    assert!(html.contains(TRANSFORM_CLASS));
    assert!(html.contains("font-size: 24px; line-height: 28px"));
}

#[test]
fn test_inline_font_zoom_is_capped() {
    let (_doc, root) = parse_with_root(
        r#"<div id="c" style="width: 750px"><span style="font-size: 20px">big</span><span style="font-size: 40px">huge</span></div>"#,
    );
    smart_resize(&root, &StaticLayout::new(375.0), &RenderConfig::default());
    let html = html_of(&root);
    // 20px is under 15 * 2, so it zooms from the 15px cap
    assert!(html.contains(r#"<span style="font-size: 30px">big</span>"#));
    assert!(html.contains(r#"<span style="font-size: 40px">huge</span>"#));
}

#[test]
fn test_fixed_height_box_pins_font_size() {
    let (_doc, root) = parse_with_root(
        r#"<div id="c"><table width="750"><tr><td><div style="height: 40px">Fixed</div></td></tr></table></div>"#,
    );
    smart_resize(&root, &StaticLayout::default(), &RenderConfig::default());
    assert!(html_of(&root).contains(r#"style="height: 40px; font-size: 8px""#));
}

#[test]
fn test_stylesheet_fonts_are_zoomed() {
    let (_doc, root) = parse_with_root(
        r#"<div id="c"><style>.note { font-size: 12px } @media (min-width: 10px) { .x { font-size: 10pt !important } }</style><table width="750"><tr><td class="note">Hi</td></tr></table></div>"#,
    );
    let report = smart_resize(&root, &StaticLayout::default(), &RenderConfig::default());
    assert_eq!(report.zoomed_sheets, 1);
    let html = html_of(&root);
    assert!(html.contains("font-size: 24px"));
    assert!(html.contains("font-size: 20pt !important"));
}

#[test]
fn test_legacy_font_size_attribute_zoomed() {
    let (_doc, root) = parse_with_root(
        r#"<div id="c"><table width="750"><tr><td><font size="2">old school</font></td></tr></table></div>"#,
    );
    smart_resize(&root, &StaticLayout::default(), &RenderConfig::default());
    assert!(html_of(&root).contains(r#"<font size="4">old school</font>"#));
}

#[test]
fn test_pipeline_reports_ratio_and_height() {
    let pipeline = Pipeline::with_static_layout(config_with_width(300.0));
    let output = pipeline
        .render(r#"<div style="width: 600px">wide</div>"#, false)
        .expect("render");
    assert_eq!(output.signals.ratio, 0.5);
    assert!(output.html.contains("transform: scale(0.5)"));
}

#[test]
fn test_cells_still_overflowing_are_scaled_down_again() {
    // the lone 10px cell zooms to 20px and its long word overflows the
    // scaled root, so cell children get the second, constrained shrink
    let long_word = "w".repeat(100);
    let (_doc, root) = parse_with_root(&format!(
        r#"<div id="c"><table width="750">
<tr><td style="font-size: 10px">{long_word}</td></tr>
<tr><td width="100"><span id="wide" style="font-size: 40px">abcdefghij</span></td><td width="100"><span id="narrow" style="font-size: 40px">ab</span></td><td width="100" data-top="5000"><span id="below" style="font-size: 40px">klmnopqrst</span></td></tr>
</table></div>"#
    ));
    let report = smart_resize(&root, &PositionedLayout::default(), &RenderConfig::default());
    assert_eq!(report.ratio, 0.5);

    let html = html_of(&root);
    assert!(html.contains(r#"<td style="font-size: 20px">"#));
    // 40px * (750 - 20) / 1100 narrows its cell, so the shrink is kept
    assert!(html.contains(r#"<span id="wide" style="font-size: 26.545px">abcdefghij</span>"#));
    // shrinking did not narrow its cell, so the original size is restored
    assert!(html.contains(r#"<span id="narrow" style="font-size: 40px">ab</span>"#));
    assert!(html.contains(r#"<span id="below" style="font-size: 40px">klmnopqrst</span>"#));
}
