//! Linkify bare email addresses, phone numbers and URLs in text nodes.

use std::collections::VecDeque;

use kuchiki::NodeRef;
use regex::Regex;

use super::regexp::{EMAIL_EXCLUDE_RE, EMAIL_RE, PHONE_RE, URL_RE};
use crate::config::RenderConfig;
use crate::dom::node_util::{closest, is_tag, new_element_like, set_attr};
use crate::layout::LayoutProbe;

/// A detector: scheme prefix, pattern, optional veto pattern
struct Matcher {
    prefix: &'static str,
    regex: &'static Regex,
    exclude: Option<&'static Regex>,
}

fn matchers() -> [Matcher; 3] {
    [
        Matcher {
            prefix: "mailto:",
            regex: &EMAIL_RE,
            exclude: Some(&EMAIL_EXCLUDE_RE),
        },
        Matcher {
            prefix: "tel:",
            regex: &PHONE_RE,
            exclude: None,
        },
        Matcher {
            prefix: "",
            regex: &URL_RE,
            exclude: None,
        },
    ]
}

/// The link chosen for one text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Link target including its scheme
    pub href: String,
    /// Byte offset of the match in the text
    pub start: usize,
    /// Byte offset one past the match
    pub end: usize,
}

/// Pick the single longest candidate among the detectors.
///
/// Each detector contributes only its first match. Ties keep the earlier
/// detector, so an address that is both an email and a URL stays a
/// `mailto:` link.
pub fn find_link(text: &str) -> Option<LinkMatch> {
    let mut longest: Option<(&Matcher, regex::Match<'_>)> = None;
    let mut longest_len = 0;
    let matchers = matchers();
    for matcher in &matchers {
        let Some(found) = matcher.regex.find(text) else {
            continue;
        };
        if matcher
            .exclude
            .is_some_and(|exclude| exclude.is_match(found.as_str()))
        {
            continue;
        }
        let len = found.as_str().chars().count();
        if len > longest_len {
            longest_len = len;
            longest = Some((matcher, found));
        }
    }

    let (matcher, found) = longest?;
    Some(LinkMatch {
        href: href_for(matcher.prefix, found.as_str()),
        start: found.start(),
        end: found.end(),
    })
}

fn href_for(prefix: &str, matched: &str) -> String {
    if !prefix.is_empty() {
        return format!("{prefix}{matched}");
    }
    let lower = matched.to_ascii_lowercase();
    if lower.contains("://") || lower.starts_with("mailto:") {
        matched.to_string()
    } else {
        // schemeless hosts would otherwise resolve as relative paths
        format!("http://{matched}")
    }
}

/// Linkify every eligible text node under `root`; returns the number of
/// links created.
///
/// Text inside `script`, `style` or an existing link is left alone, as is
/// text whose parent starts below the screen cutoff. After a match is
/// wrapped, the remainder of the text node is examined again, so one node
/// may yield several links.
pub fn auto_link<P: LayoutProbe>(root: &NodeRef, probe: &P, config: &RenderConfig) -> usize {
    let mut pending: VecDeque<NodeRef> = root
        .inclusive_descendants()
        .filter(|node| node.as_text().is_some())
        .collect();
    let mut created = 0;

    while let Some(node) = pending.pop_front() {
        let Some(parent) = node.parent() else {
            continue;
        };
        if is_tag(&parent, "script") || is_tag(&parent, "style") || closest(&parent, "a").is_some()
        {
            continue;
        }
        if parent.as_element().is_some() && !config.is_on_screen(probe.bounding_top(&parent)) {
            continue;
        }
        if let Some(rest) = wrap_first_link(&node, &parent, config.autolink_min_chars()) {
            created += 1;
            pending.push_front(rest);
        }
    }

    tracing::debug!(created, "autolink pass finished");
    created
}

/// Wrap the chosen match of `node` in an `<a>`; returns the trailing text node
fn wrap_first_link(node: &NodeRef, parent: &NodeRef, min_chars: usize) -> Option<NodeRef> {
    let text = node.as_text()?;
    let content = text.borrow().clone();
    if content.trim().chars().count() < min_chars {
        return None;
    }
    let link = find_link(&content)?;
    let template = parent.as_element()?;

    let anchor = new_element_like(template, "a");
    set_attr(&anchor, "href", link.href.clone());
    set_attr(&anchor, "title", link.href);
    anchor.append(NodeRef::new_text(&content[link.start..link.end]));

    let rest = NodeRef::new_text(&content[link.end..]);
    *text.borrow_mut() = content[..link.start].to_string();
    node.insert_after(anchor.clone());
    anchor.insert_after(rest.clone());
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_gets_mailto() {
        let link = find_link("write to jane.doe@example.org today").expect("link");
        assert_eq!(link.href, "mailto:jane.doe@example.org");
    }

    #[test]
    fn test_email_inside_path_is_excluded() {
        // the url detector still gets a chance
        let link = find_link("see https://host.com/a?u=jane@example.org").expect("link");
        assert!(link.href.starts_with("https://host.com/a"));
    }

    #[test]
    fn test_phone_gets_tel() {
        let link = find_link("call 555-123-4567 now").expect("link");
        assert_eq!(link.href, "tel:555-123-4567");
    }

    #[test]
    fn test_schemeless_url_only_at_end_of_text() {
        let link = find_link("visit example.com").expect("link");
        assert_eq!(link.href, "http://example.com");
        assert!(find_link("example.com is nice").is_none());
    }

    #[test]
    fn test_url_with_scheme_and_path() {
        let text = "go to https://mail.example.ai/inbox?id=3 please";
        let link = find_link(text).expect("link");
        assert_eq!(&text[link.start..link.end], "https://mail.example.ai/inbox?id=3");
        assert_eq!(link.href, "https://mail.example.ai/inbox?id=3");
    }

    #[test]
    fn test_plain_text_has_no_link() {
        assert!(find_link("nothing to see here").is_none());
    }
}
