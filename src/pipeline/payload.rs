//! Host payload decoding and pre-parse scrubbing.
//!
//! The host hands over `{"html": "<encoded>", "isDarkMode": bool}`. The html
//! is percent-encoded by default (base64 for older hosts). Before parsing,
//! the viewport meta tag and landscape-only media preludes are stripped so
//! the message keeps its own styling in our narrow view.

use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::MailviewResult;

static VIEWPORT_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta\s+name=(?:'viewport'|"viewport"|\sviewport\s|viewport)\s+content=[^>]*>"#,
    )
    .expect("VIEWPORT_META_RE: hardcoded regex is valid")
});

static LANDSCAPE_MEDIA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@media screen and [:()\sA-Za-z0-9_-]*\(orientation: landscape\)")
        .expect("LANDSCAPE_MEDIA_RE: hardcoded regex is valid")
});

static MEDIA_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img, video").expect("BUG: hardcoded CSS selector 'img, video' is invalid")
});

/// How the `html` field of the payload is encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferEncoding {
    /// `encodeURIComponent`-style percent encoding
    #[default]
    Percent,
    Base64,
}

/// The parameter object a host passes to `setHTML`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPayload {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub is_dark_mode: bool,
}

impl HostPayload {
    pub fn from_json(params: &str) -> MailviewResult<Self> {
        Ok(serde_json::from_str(params)?)
    }

    /// Whether the payload carries any html at all
    #[must_use]
    pub fn has_html(&self) -> bool {
        !self.html.is_empty()
    }

    /// Decode the transfer encoding of the `html` field
    pub fn decode_html(&self, encoding: TransferEncoding) -> MailviewResult<String> {
        decode_html(&self.html, encoding)
    }
}

pub fn decode_html(encoded: &str, encoding: TransferEncoding) -> MailviewResult<String> {
    match encoding {
        TransferEncoding::Percent => Ok(urlencoding::decode(encoded)?.into_owned()),
        TransferEncoding::Base64 => {
            let bytes = STANDARD.decode(encoded.trim())?;
            Ok(String::from_utf8(bytes)?)
        }
    }
}

/// Remove the viewport meta tag and landscape-only `@media` preludes
#[must_use]
pub fn scrub_payload_html(html: &str) -> String {
    let without_meta = VIEWPORT_META_RE.replace_all(html, "");
    LANDSCAPE_MEDIA_RE.replace_all(&without_meta, "").into_owned()
}

/// Whether the message shows any image or video
#[must_use]
pub fn has_media(html: &str) -> bool {
    let fragment = Html::parse_fragment(html);
    fragment.select(&MEDIA_SELECTOR).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_json_defaults() {
        let payload = HostPayload::from_json(r#"{"html":"%3Cp%3Ehi%3C%2Fp%3E"}"#).expect("json");
        assert!(!payload.is_dark_mode);
        assert_eq!(payload.decode_html(TransferEncoding::Percent).expect("decode"), "<p>hi</p>");
    }

    #[test]
    fn test_base64_payload() {
        let payload = HostPayload::from_json(r#"{"html":"PGI+aGk8L2I+","isDarkMode":true}"#)
            .expect("json");
        assert!(payload.is_dark_mode);
        assert_eq!(payload.decode_html(TransferEncoding::Base64).expect("decode"), "<b>hi</b>");
    }

    #[test]
    fn test_bad_payloads_are_payload_errors() {
        assert!(HostPayload::from_json("{").is_err_and(|e| e.is_payload_error()));
        assert!(decode_html("***", TransferEncoding::Base64).is_err_and(|e| e.is_payload_error()));
        assert!(decode_html("%FF%FE", TransferEncoding::Percent).is_err_and(|e| e.is_payload_error()));
    }

    #[test]
    fn test_scrub_viewport_meta_and_landscape_media() {
        let html = r#"<meta name="viewport" content="width=device-width"><style>@media screen and (max-width: 600px) and (orientation: landscape) { p { color: red } }</style>"#;
        let scrubbed = scrub_payload_html(html);
        assert!(!scrubbed.contains("viewport"));
        assert!(scrubbed.contains("<style> { p { color: red } }</style>"));
    }

    #[test]
    fn test_has_media() {
        assert!(has_media(r#"<p><img src="a.png"></p>"#));
        assert!(has_media("<video></video>"));
        assert!(!has_media("<p>text only</p>"));
    }
}
