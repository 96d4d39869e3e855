//! IPv4 block calculations.
//!
//! Derives the mask, wildcard, network, start and end addresses of a subnet
//! and divides a subnet into a consecutive series of equally sized blocks.
//!
//! ```
//! use ipblocks::models::{AddressDescriptor, BlockKind};
//! use std::net::Ipv4Addr;
//!
//! let subnet = AddressDescriptor::build(Ipv4Addr::new(192, 168, 1, 0), 24, BlockKind::Subnet).unwrap();
//! let ranges = subnet.ranges(28).unwrap();
//! assert_eq!(ranges.len(), 16);
//! assert_eq!(ranges[1], "192.168.1.16/28");
//! ```

pub mod cli;
mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;
pub mod scan;

pub use error::{Error, Result};
pub use models::{AddressDescriptor, BlockKind, Ipv4};
pub use processing::{format_ranges, subdivide, Blocks};
