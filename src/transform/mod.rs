//! Tree-rewriting passes.
//!
//! - `quoted_html`: strip quoted replies and forwards (string in, string out)
//! - `dark_mode`: colour inversion
//! - `auto_link`: linkify emails, phone numbers and URLs
//! - `special_handle`: hidden-text spans and embedded objects
//! - `oversize`: long link text and wide images
//! - `smart_resize`: shrink fixed-width layouts to the viewport
//!
//! Every pass is failure tolerant: a node it cannot handle is skipped,
//! never reported as an error.

pub mod auto_link;
pub mod dark_mode;
pub mod oversize;
pub mod quoted_html;
pub mod regexp;
pub mod smart_resize;
pub mod special_handle;

pub use auto_link::{LinkMatch, auto_link, find_link};
pub use dark_mode::{apply_dark_mode, apply_dark_mode_for_node, reversed_color};
pub use oversize::{fix_long_url, fix_oversize, limit_image_width};
pub use quoted_html::{has_quoted_html, remove_quoted_html};
pub use smart_resize::{ResizeReport, smart_resize};
pub use special_handle::{ScrubReport, scrub_artifacts};
