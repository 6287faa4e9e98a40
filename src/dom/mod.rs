//! DOM layer shared by every pass.
//!
//! - `node_util`: browser-like tree primitives over kuchiki
//! - `style`: inline `style` attribute reader/writer
//! - `stylesheet`: declaration-block rewriting inside `<style>` text
//! - `color`: colour samples parsed from declared values
//! - `css_values`: absolute length units and zoom arithmetic
//! - `serialize`: inner/outer HTML

pub mod color;
pub mod css_values;
pub mod node_util;
pub mod serialize;
pub mod style;
pub mod stylesheet;

pub use color::Rgba;
pub use node_util::{NodeSet, parse_document, walk_backwards};
pub use serialize::{inner_html, outer_html};
pub use style::InlineStyle;
pub use stylesheet::rewrite_declaration_blocks;
