//! Known-invalid blocks.
//!
//! Each entry names a block that belongs to an abandoned or invalid history,
//! such as the losing side of a consensus incident. A block is rejected only
//! when both its height and hash match an entry.

use std::collections::BTreeSet;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::InvalidChain;

/// A (block height, hash) pair identifying a known-invalid block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BadHash {
    /// Block height.
    pub block: u64,
    /// Block hash.
    pub hash: B256,
}

impl BadHash {
    /// Creates a new entry.
    pub const fn new(block: u64, hash: B256) -> Self {
        Self { block, hash }
    }
}

/// The set of known-invalid blocks of a network.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BadHashes(BTreeSet<BadHash>);

impl BadHashes {
    /// Returns true if `(block, hash)` is a known-invalid block.
    pub fn contains(&self, block: u64, hash: &B256) -> bool {
        self.0.contains(&BadHash::new(block, *hash))
    }

    /// Rejects `(block, hash)` if it is a known-invalid block.
    pub fn check(&self, block: u64, hash: &B256) -> Result<(), InvalidChain> {
        if self.contains(block, hash) {
            warn!(block, %hash, "rejected known bad block");
            return Err(InvalidChain { block, hash: *hash });
        }
        Ok(())
    }

    /// Iterates over entries ordered by block.
    pub fn iter(&self) -> impl Iterator<Item = &BadHash> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<BadHash> for BadHashes {
    fn from_iter<I: IntoIterator<Item = BadHash>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
