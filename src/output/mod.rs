//! Output formatting for computed blocks.
//!
//! - [`json`] - JSON document of the subnet, its blocks and ranges
//! - [`terminal`] - Plain and verbose terminal output

mod json;
mod terminal;

pub use json::{to_json, BlocksReport};
pub use terminal::{render_ranges, render_verbose};
