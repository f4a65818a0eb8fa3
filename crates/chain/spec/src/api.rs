//! The ChainSpec trait
//!
//! This module defines [`ChainSpec`], the read-only view a consensus or
//! execution engine has of a network configuration. It answers two questions
//! for any block: which rules apply, and is this block known to be invalid.
//!
//! Code accepting `impl ChainSpec` works with mainnet, testnet or custom
//! configurations without modification.
//!
//! # Example
//!
//! ```ignore
//! use keel_chainspec::{ChainSpec, GasOperation};
//!
//! fn import_block<S: ChainSpec>(spec: &S, number: u64, hash: B256) -> eyre::Result<()> {
//!     spec.check_block(number, &hash)?;
//!     let rules = spec.rules_at(number);
//!     let sload = rules.gas_cost(GasOperation::SLoad);
//!     // execute with `rules`
//!     Ok(())
//! }
//! ```

use std::{fmt::Debug, sync::Arc};

use alloy_primitives::B256;
use keel_forks::{Fork, ForkSchedule, ResolvedRules};

use crate::{
    BadHashes, InvalidChain,
    constants::{mainnet, testnet},
};

/// A network configuration.
///
/// Covers the consensus-critical parameters all nodes on a network share:
/// - Network identity (name, chain identifier)
/// - Fork schedule and the rules it resolves to
/// - Known-invalid blocks
#[auto_impl::auto_impl(&, Arc)]
pub trait ChainSpec: Send + Sync + Debug + 'static {
    /// Returns the network name (like "mainnet", "testnet", etc.).
    fn name(&self) -> &str;

    /// Returns the chain identifier used for replay protection.
    fn chain_id(&self) -> u64;

    /// Returns the fork schedule.
    fn schedule(&self) -> &ForkSchedule;

    /// Returns the known-invalid blocks.
    fn bad_hashes(&self) -> &BadHashes;

    /// Returns the rules in effect at `block`.
    fn rules_at(&self, block: u64) -> Arc<ResolvedRules>;

    /// Forks active at `block`, ascending.
    fn active_forks(&self, block: u64) -> &[Fork] {
        self.schedule().active_forks(block)
    }

    /// The most recent fork active at `block`.
    fn current_fork(&self, block: u64) -> Option<&Fork> {
        self.schedule().current_fork(block)
    }

    /// Returns whether the fork named `fork` is active at `block`.
    fn is_fork_active_at_block(&self, fork: &str, block: u64) -> bool {
        self.schedule().is_fork_active_at_block(fork, block)
    }

    /// Returns the activation block of the next fork after `after`.
    ///
    /// Returns `None` if all known forks are already active.
    fn next_fork_block(&self, after: u64) -> Option<u64> {
        self.schedule().next_fork_block(after)
    }

    /// Rejects a block matching a known-invalid (height, hash) pair.
    fn check_block(&self, block: u64, hash: &B256) -> Result<(), InvalidChain> {
        self.bad_hashes().check(block, hash)
    }

    /// Returns whether EIP-155 replay protection applies at `block`.
    fn is_replay_protected(&self, block: u64) -> bool {
        self.rules_at(block).is_replay_protected()
    }

    /// Returns the chain identifier transactions at `block` are signed with,
    /// or `None` before replay protection activates.
    fn signing_chain_id(&self, block: u64) -> Option<u64> {
        self.is_replay_protected(block).then(|| self.chain_id())
    }

    /// Returns whether this is the Classic mainnet.
    fn is_mainnet(&self) -> bool {
        self.chain_id() == mainnet::CHAIN_ID
    }

    /// Returns whether this is the Classic testnet.
    fn is_testnet(&self) -> bool {
        self.chain_id() == testnet::CHAIN_ID
    }

    /// Returns whether this is a development network.
    fn is_dev(&self) -> bool {
        !self.is_mainnet() && !self.is_testnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChainConfigBuilder, init_mainnet, init_testnet};

    #[test]
    fn test_chain_spec_trait() {
        fn assert_spec<S: ChainSpec>(_s: &S) {}

        let spec = init_mainnet();
        assert_spec(&*spec);
        assert_spec(&spec);
    }

    #[test]
    fn test_network_checks() {
        let spec = init_mainnet();
        assert!(spec.is_mainnet());
        assert!(!spec.is_testnet());
        assert!(!spec.is_dev());

        let spec = init_testnet();
        assert!(!spec.is_mainnet());
        assert!(spec.is_testnet());

        let dev = ChainConfigBuilder::new().build().unwrap();
        assert!(dev.is_dev());
    }

    #[test]
    fn test_signing_chain_id() {
        let spec = init_mainnet();
        assert_eq!(spec.signing_chain_id(mainnet::DIEHARD_BLOCK - 1), None);
        assert_eq!(spec.signing_chain_id(mainnet::DIEHARD_BLOCK), Some(61));

        let spec = init_testnet();
        assert_eq!(spec.signing_chain_id(testnet::DIEHARD_BLOCK), Some(62));
    }

    #[test]
    fn test_next_fork_block() {
        let spec = init_mainnet();
        assert_eq!(spec.next_fork_block(0), Some(mainnet::HOMESTEAD_BLOCK));
        assert_eq!(spec.next_fork_block(mainnet::HOMESTEAD_BLOCK), Some(mainnet::ETF_BLOCK));
        assert_eq!(spec.next_fork_block(mainnet::DIEHARD_BLOCK), None);
    }
}
