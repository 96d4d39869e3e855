//! Block processing logic.
//!
//! - [`subdivide`] - Tiling a block with smaller sub-blocks
//! - [`ranges`] - CIDR text for the divided blocks

mod ranges;
mod subdivide;

// Re-export public functions
pub use ranges::format_ranges;
pub use subdivide::{subdivide, Blocks};
