//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`] for reading `a.b.c.d/n` strings at the boundary, along
//! with the 32-bit helpers the descriptor builder and subdivider share.

use super::descriptor::{AddressDescriptor, BlockKind};
use crate::{Error, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use ipblocks::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32> {
    if len > MAX_LENGTH {
        Err(Error::InvalidCidr(format!("network length /{len} is too long")))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// The address directly after `addr`.
///
/// The increment carries right to left across octets, so `10.0.0.255`
/// becomes `10.0.1.0`. `255.255.255.255` wraps to `0.0.0.0`.
pub fn next_addr(addr: Ipv4Addr) -> Ipv4Addr {
    let mut octets = addr.octets();
    for octet in octets.iter_mut().rev() {
        let (next, carry) = octet.overflowing_add(1);
        *octet = next;
        if !carry {
            break;
        }
    }
    Ipv4Addr::from(octets)
}

/// Parse a block size given as `/28` or `28`.
pub fn parse_block_size(block: &str) -> Result<u8> {
    let block = block.trim();
    let digits = block.strip_prefix('/').unwrap_or(block);
    digits
        .parse()
        .map_err(|_| Error::InvalidCidr(format!("invalid block size {block}")))
}

/// IPv4 address with CIDR notation support.
///
/// `addr` is kept exactly as written, host bits included.
#[derive(Eq, Ord, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::new(&s).map_err(de::Error::custom)
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| Error::InvalidCidr(format!("missing /mask in {addr_cidr}")))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| Error::InvalidCidr(format!("invalid address {addr}")))?;
        let mask: u8 = mask
            .parse()
            .map_err(|_| Error::InvalidCidr(format!("invalid subnet mask {mask}")))?;
        if mask > MAX_LENGTH {
            return Err(Error::InvalidCidr(format!(
                "network length /{mask} is too long"
            )));
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Build the [`AddressDescriptor`] for this CIDR.
    pub fn descriptor(&self, kind: BlockKind) -> Result<AddressDescriptor> {
        AddressDescriptor::build(self.addr, self.mask, kind)
    }
}

impl FromStr for Ipv4 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ipv4::new(s)
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

impl PartialEq for Ipv4 {
    fn eq(&self, other: &Ipv4) -> bool {
        self.addr == other.addr && self.mask == other.mask
    }
}

impl PartialOrd for Ipv4 {
    fn partial_cmp(&self, other: &Ipv4) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
