//! CIDR text for divided blocks.

use crate::models::AddressDescriptor;
use crate::Result;

/// Map each block to `network/prefix_len`, keeping the order.
pub fn format_ranges(blocks: &[AddressDescriptor]) -> Vec<String> {
    blocks.iter().map(AddressDescriptor::cidr).collect()
}

impl AddressDescriptor {
    /// CIDR strings of the `/target` sub-blocks contained within this block.
    pub fn ranges(&self, target: u8) -> Result<Vec<String>> {
        Ok(format_ranges(&self.subdivide(target)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockKind;
    use std::net::Ipv4Addr;

    #[test]
    fn test_format_ranges() {
        let original =
            AddressDescriptor::build(Ipv4Addr::new(192, 168, 1, 0), 24, BlockKind::Subnet).unwrap();
        let ranges = format_ranges(&original.subdivide(28).unwrap());

        let expected: Vec<String> = (0..16).map(|i| format!("192.168.1.{}/28", i * 16)).collect();
        assert_eq!(ranges, expected);
        assert_eq!(original.ranges(28).unwrap(), expected);
    }

    #[test]
    fn test_format_ranges_empty() {
        assert!(format_ranges(&[]).is_empty());
    }

    #[test]
    fn test_ranges_uses_network_address() {
        let original =
            AddressDescriptor::build(Ipv4Addr::new(10, 9, 8, 7), 16, BlockKind::Subnet).unwrap();
        assert_eq!(original.ranges(16).unwrap(), vec!["10.9.0.0/16"]);
        assert!(original.ranges(15).is_err());
    }
}
