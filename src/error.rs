//! Error types for address derivation and block subdivision.

use std::net::Ipv4Addr;
use thiserror::Error;

/// Result type for ipblocks operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the descriptor builder and the subdivider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("mask must be integer between 0 and 31, got {0}")]
    InvalidPrefixLength(u8),

    #[error("block mask /{target} must not be larger than the subnet mask /{prefix_len}")]
    InvalidSubdivision { prefix_len: u8, target: u8 },

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("block ending at {block} runs past the subnet end {end}")]
    BlockOverrun { block: Ipv4Addr, end: Ipv4Addr },
}
