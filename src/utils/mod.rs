pub mod constants;
pub mod string_utils;

pub use constants::*;
pub use string_utils::{chunk_chars, format_css_number, parse_float_prefix, strip_whitespace};
