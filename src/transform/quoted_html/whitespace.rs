//! Cleanup after quote removal.

use kuchiki::NodeRef;

use crate::dom::node_util::{
    attr, child_element_count, last_element_child, parent_element, select_descendants, tag_name,
    text_of,
};

/// Marker other clients leave in the `alt` of images they stripped
const STRIPPED_IMAGE_ALT: &str = "removed by sender";

/// Remove `<img>` placeholders left by clients that stripped the image
pub(crate) fn remove_images_stripped_by_another_client(body: &NodeRef) -> usize {
    let stripped: Vec<NodeRef> = select_descendants(body, "img")
        .into_iter()
        .filter(|img| attr(img, "alt").is_some_and(|alt| alt.contains(STRIPPED_IMAGE_ALT)))
        .collect();
    for img in &stripped {
        img.detach();
    }
    stripped.len()
}

/// Prune blank trailing content left behind by removed quotes.
///
/// Starts at the deepest last element and walks up; at each level trailing
/// blank text and empty `br`/`p`/`div`/`span`/`hr` children are removed
/// until a child with content is reached.
pub(crate) fn remove_unnecessary_whitespace(body: &NodeRef) {
    let mut last_of_last = body.clone();
    while let Some(child) = last_element_child(&last_of_last) {
        last_of_last = child;
    }
    while let Some(parent) = parent_element(&last_of_last) {
        last_of_last = parent;
        remove_trailing_whitespace_children(&last_of_last);
    }
}

fn remove_trailing_whitespace_children(el: &NodeRef) {
    while let Some(child) = el.last_child() {
        if text_of(&child).is_some_and(|text| text.trim().is_empty()) {
            child.detach();
            continue;
        }
        if matches!(tag_name(&child), Some("br" | "p" | "div" | "span" | "hr")) {
            remove_trailing_whitespace_children(&child);
            if child_element_count(&child) == 0 && child.text_contents().trim().is_empty() {
                child.detach();
                continue;
            }
        }
        break;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node_util::body;
    use crate::dom::{inner_html, parse_document};

    #[test]
    fn test_trailing_blank_blocks_are_pruned() {
        let doc = parse_document("<div>Keep<p> </p><br><span><br></span>\n</div><hr>");
        let body = body(&doc).expect("body");
        remove_unnecessary_whitespace(&body);
        assert_eq!(inner_html(&body).expect("html"), "<div>Keep</div>");
    }

    #[test]
    fn test_images_keep_their_container() {
        let doc = parse_document("<div>Text</div><p><img src=\"a.png\"></p>");
        let body = body(&doc).expect("body");
        remove_unnecessary_whitespace(&body);
        assert_eq!(
            inner_html(&body).expect("html"),
            "<div>Text</div><p><img src=\"a.png\"></p>"
        );
    }

    #[test]
    fn test_stripped_images_removed() {
        let doc = parse_document(
            r#"<img alt="Image removed by sender."><img alt="logo">"#,
        );
        let body = body(&doc).expect("body");
        assert_eq!(remove_images_stripped_by_another_client(&body), 1);
        assert_eq!(inner_html(&body).expect("html"), r#"<img alt="logo">"#);
    }
}
