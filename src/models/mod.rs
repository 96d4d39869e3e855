//! Domain models for IPv4 block calculations.
//!
//! - [`Ipv4`] - IPv4 address with CIDR notation support
//! - [`AddressDescriptor`] - every address derived from an address and prefix length

mod descriptor;
mod ipv4;

// Re-export public types
pub use descriptor::{AddressDescriptor, BlockKind, MAX_PREFIX_LENGTH, OCTET_BIT_MASKS};
pub use ipv4::{get_cidr_mask, next_addr, parse_block_size, Ipv4, MAX_LENGTH};
