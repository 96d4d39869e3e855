//! Address descriptor: every address derived from an IPv4 address and a
//! prefix length.
//!
//! Derivation works on the four octets separately, the way the mask is
//! written down in dotted-quad form. Each step produces a fresh `[u8; 4]`.

use super::ipv4::{get_cidr_mask, next_addr};
use crate::{Error, Result};
use serde::Serialize;
use std::net::Ipv4Addr;

/// Largest prefix length a descriptor accepts. A /32 is a single host and
/// has no block to describe.
pub const MAX_PREFIX_LENGTH: u8 = 31;

/// Bits of the 32-bit mask value covered by each octet, most significant first.
pub const OCTET_BIT_MASKS: [u32; 4] = [0xff00_0000, 0x00ff_0000, 0x0000_ff00, 0x0000_00ff];

type Octets = [u8; 4];

/// How the start of a block is chosen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// The network address is reserved, the block starts at the first usable host.
    Subnet,
    /// The block starts at the network address itself.
    Range,
}

/// Derived addressing information for a subnet or address range.
///
/// Invariants: `network_address <= start_address <= end_address` and
/// `end_address == start_address | wildcard_address`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AddressDescriptor {
    /// Address as supplied by the caller, host bits included.
    pub address: Ipv4Addr,
    /// Number of leading network bits (0-31).
    pub prefix_len: u8,
    pub mask_address: Ipv4Addr,
    pub network_address: Ipv4Addr,
    pub wildcard_address: Ipv4Addr,
    pub start_address: Ipv4Addr,
    pub end_address: Ipv4Addr,
    pub kind: BlockKind,
}

impl AddressDescriptor {
    /// Derive the mask, wildcard, network, start and end addresses for
    /// `address/prefix_len`.
    ///
    /// # Examples
    /// ```
    /// use ipblocks::models::{AddressDescriptor, BlockKind};
    /// use std::net::Ipv4Addr;
    ///
    /// let d = AddressDescriptor::build(Ipv4Addr::new(192, 168, 1, 0), 24, BlockKind::Subnet).unwrap();
    /// assert_eq!(d.start_address, Ipv4Addr::new(192, 168, 1, 1));
    /// assert_eq!(d.end_address, Ipv4Addr::new(192, 168, 1, 255));
    /// ```
    pub fn build(address: Ipv4Addr, prefix_len: u8, kind: BlockKind) -> Result<AddressDescriptor> {
        if prefix_len > MAX_PREFIX_LENGTH {
            return Err(Error::InvalidPrefixLength(prefix_len));
        }

        let mask = mask_octets(get_cidr_mask(prefix_len)?);
        let wildcard = mask.map(|octet| !octet);
        let network = octetwise(address.octets(), mask, |a, m| a & m);
        let start = start_octets(network, kind);
        let end = octetwise(start, wildcard, |s, w| s | w);

        let descriptor = AddressDescriptor {
            address,
            prefix_len,
            mask_address: Ipv4Addr::from(mask),
            network_address: Ipv4Addr::from(network),
            wildcard_address: Ipv4Addr::from(wildcard),
            start_address: Ipv4Addr::from(start),
            end_address: Ipv4Addr::from(end),
            kind,
        };
        log::trace!("build({address}/{prefix_len}, {kind:?}) = {descriptor}");
        Ok(descriptor)
    }

    /// The block as `network/prefix_len`.
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.network_address, self.prefix_len)
    }
}

/// Spread a 32-bit mask value over four octets.
///
/// Each octet gets as many leading ones as the mask value has set bits in
/// that octet's span, so every octet is one of 0, 128, 192 .. 254, 255.
fn mask_octets(mask_value: u32) -> Octets {
    OCTET_BIT_MASKS.map(|span| {
        let ones = (mask_value & span).count_ones();
        // shifting a u8 by 8 is out of range: no ones means an empty octet
        u8::MAX.checked_shl(8 - ones).unwrap_or(0)
    })
}

fn octetwise(a: Octets, b: Octets, op: impl Fn(u8, u8) -> u8) -> Octets {
    [op(a[0], b[0]), op(a[1], b[1]), op(a[2], b[2]), op(a[3], b[3])]
}

fn start_octets(network: Octets, kind: BlockKind) -> Octets {
    match kind {
        BlockKind::Range => network,
        BlockKind::Subnet => next_addr(Ipv4Addr::from(network)).octets(),
    }
}

impl std::fmt::Display for AddressDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Address: {} Mask: {} Mask Address: {} Wildcard Address: {} Network Address: {} Start Address: {} End Address: {}",
            self.address,
            self.prefix_len,
            self.mask_address,
            self.wildcard_address,
            self.network_address,
            self.start_address,
            self.end_address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_MASK_OCTETS: [u8; 9] = [0, 128, 192, 224, 240, 248, 252, 254, 255];

    fn build(addr: [u8; 4], prefix_len: u8, kind: BlockKind) -> AddressDescriptor {
        AddressDescriptor::build(Ipv4Addr::from(addr), prefix_len, kind).unwrap()
    }

    #[test]
    fn test_build_subnet_24() {
        let d = build([192, 168, 1, 0], 24, BlockKind::Subnet);
        assert_eq!(d.mask_address, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(d.network_address, Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(d.wildcard_address, Ipv4Addr::new(0, 0, 0, 255));
        assert_eq!(d.start_address, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(d.end_address, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(d.cidr(), "192.168.1.0/24");
    }

    #[test]
    fn test_build_range_keeps_network_as_start() {
        let d = build([192, 168, 1, 77], 26, BlockKind::Range);
        assert_eq!(d.address, Ipv4Addr::new(192, 168, 1, 77));
        assert_eq!(d.mask_address, Ipv4Addr::new(255, 255, 255, 192));
        assert_eq!(d.network_address, Ipv4Addr::new(192, 168, 1, 64));
        assert_eq!(d.start_address, d.network_address);
        assert_eq!(d.end_address, Ipv4Addr::new(192, 168, 1, 127));
    }

    #[test]
    fn test_build_prefix_bounds() {
        let d = build([10, 20, 30, 40], 0, BlockKind::Range);
        assert_eq!(d.mask_address, Ipv4Addr::UNSPECIFIED);
        assert_eq!(d.wildcard_address, Ipv4Addr::BROADCAST);
        assert_eq!(d.network_address, Ipv4Addr::UNSPECIFIED);
        assert_eq!(d.end_address, Ipv4Addr::BROADCAST);

        let d = build([10, 20, 30, 41], 31, BlockKind::Subnet);
        assert_eq!(d.mask_address, Ipv4Addr::new(255, 255, 255, 254));
        assert_eq!(d.network_address, Ipv4Addr::new(10, 20, 30, 40));
        assert_eq!(d.start_address, Ipv4Addr::new(10, 20, 30, 41));
        assert_eq!(d.end_address, Ipv4Addr::new(10, 20, 30, 41));
    }

    #[test]
    fn test_build_mask_crossing_octets() {
        let d = build([172, 31, 200, 1], 12, BlockKind::Subnet);
        assert_eq!(d.mask_address, Ipv4Addr::new(255, 240, 0, 0));
        assert_eq!(d.wildcard_address, Ipv4Addr::new(0, 15, 255, 255));
        assert_eq!(d.network_address, Ipv4Addr::new(172, 16, 0, 0));
        assert_eq!(d.start_address, Ipv4Addr::new(172, 16, 0, 1));
        assert_eq!(d.end_address, Ipv4Addr::new(172, 31, 255, 255));
    }

    #[test]
    fn test_build_invalid_prefix() {
        let addr = Ipv4Addr::new(192, 168, 1, 0);
        assert_eq!(
            AddressDescriptor::build(addr, 32, BlockKind::Subnet),
            Err(Error::InvalidPrefixLength(32))
        );
        assert_eq!(
            AddressDescriptor::build(addr, 200, BlockKind::Range),
            Err(Error::InvalidPrefixLength(200))
        );
    }

    #[test]
    fn test_derivation_invariants_every_prefix() {
        let addr = Ipv4Addr::new(203, 0, 113, 187);
        for prefix_len in 0..=MAX_PREFIX_LENGTH {
            for kind in [BlockKind::Subnet, BlockKind::Range] {
                let d = AddressDescriptor::build(addr, prefix_len, kind).unwrap();
                let mask = u32::from(d.mask_address);

                assert_eq!(mask, get_cidr_mask(prefix_len).unwrap(), "/{prefix_len}");
                assert_eq!(u32::from(d.wildcard_address), !mask);
                assert_eq!(u32::from(d.network_address), u32::from(addr) & mask);
                assert_eq!(
                    u32::from(d.end_address),
                    u32::from(d.start_address) | u32::from(d.wildcard_address)
                );
                assert!(d.network_address <= d.start_address);
                assert!(d.start_address <= d.end_address);
                for octet in d.mask_address.octets() {
                    assert!(VALID_MASK_OCTETS.contains(&octet), "octet {octet}");
                }
            }
        }
    }

    #[test]
    fn test_subnet_start_is_network_plus_one() {
        for prefix_len in 0..=MAX_PREFIX_LENGTH {
            let d = build([10, 0, 255, 254], prefix_len, BlockKind::Subnet);
            assert_eq!(
                u32::from(d.start_address),
                u32::from(d.network_address) + 1,
                "/{prefix_len}"
            );
        }
    }

    #[test]
    fn test_display() {
        let d = build([192, 168, 1, 0], 24, BlockKind::Subnet);
        assert_eq!(
            d.to_string(),
            "Address: 192.168.1.0 Mask: 24 Mask Address: 255.255.255.0 Wildcard Address: 0.0.0.255 Network Address: 192.168.1.0 Start Address: 192.168.1.1 End Address: 192.168.1.255"
        );
    }

    #[test]
    fn test_serialize() {
        let d = build([10, 0, 0, 0], 30, BlockKind::Range);
        let json = serde_json::to_value(d).unwrap();
        assert_eq!(json["prefix_len"], 30);
        assert_eq!(json["mask_address"], "255.255.255.252");
        assert_eq!(json["end_address"], "10.0.0.3");
        assert_eq!(json["kind"], "range");
    }
}
