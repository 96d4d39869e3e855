//! Block subdivision.
//!
//! Tiles a block with consecutive, equally sized sub-blocks. Each sub-block
//! starts at the address after the previous one's end, and the walk stops on
//! the sub-block that ends where the source block ends.

use crate::models::{next_addr, AddressDescriptor, BlockKind, MAX_PREFIX_LENGTH};
use crate::{Error, Result};
use std::net::Ipv4Addr;

/// Iterator over the sub-blocks of a descriptor, in address order.
///
/// Created by [`AddressDescriptor::blocks`]. Every item is built in
/// [`BlockKind::Range`] mode.
#[derive(Debug, Clone)]
pub struct Blocks {
    prefix_len: u8,
    next_start: Option<Ipv4Addr>,
    end: Ipv4Addr,
}

impl Iterator for Blocks {
    type Item = Result<AddressDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start.take()?;
        let block = match AddressDescriptor::build(start, self.prefix_len, BlockKind::Range) {
            Ok(block) => block,
            Err(e) => return Some(Err(e)),
        };

        if block.end_address > self.end {
            return Some(Err(Error::BlockOverrun {
                block: block.end_address,
                end: self.end,
            }));
        }
        if block.end_address != self.end {
            self.next_start = Some(next_addr(block.end_address));
        }
        log::trace!(
            "block {} [{} - {}]",
            block.cidr(),
            block.start_address,
            block.end_address
        );
        Some(Ok(block))
    }
}

impl AddressDescriptor {
    /// Lazily walk the sub-blocks of size `/target`.
    ///
    /// Fails with [`Error::InvalidSubdivision`] when `target` is coarser than
    /// this block and [`Error::InvalidPrefixLength`] when it is above /31.
    pub fn blocks(&self, target: u8) -> Result<Blocks> {
        if target > MAX_PREFIX_LENGTH {
            return Err(Error::InvalidPrefixLength(target));
        }
        if target < self.prefix_len {
            return Err(Error::InvalidSubdivision {
                prefix_len: self.prefix_len,
                target,
            });
        }
        Ok(Blocks {
            prefix_len: target,
            next_start: Some(self.start_address),
            end: self.end_address,
        })
    }

    /// Number of `/target` sub-blocks this block splits into.
    pub fn block_count(&self, target: u8) -> Result<u64> {
        self.blocks(target)?;
        Ok(1u64 << (target - self.prefix_len))
    }

    /// Divide the block into consecutive `/target` sub-blocks.
    pub fn subdivide(&self, target: u8) -> Result<Vec<AddressDescriptor>> {
        subdivide(self, target)
    }
}

/// Divide `descriptor` into consecutive `/target` sub-blocks contained within it.
pub fn subdivide(descriptor: &AddressDescriptor, target: u8) -> Result<Vec<AddressDescriptor>> {
    log::debug!(
        "subdivide({}) into {} blocks of /{target}",
        descriptor.cidr(),
        descriptor.block_count(target)?
    );
    descriptor.blocks(target)?.collect()
}
