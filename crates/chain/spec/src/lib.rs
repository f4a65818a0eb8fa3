//! Chain configurations
//!
//! This crate defines the networks keel knows about: their identity, fork
//! schedule and known-invalid blocks, and answers the two questions a block
//! import pipeline asks of them.
//!
//! # Design Philosophy
//!
//! A chain configuration answers: "Which rules govern block N of this network?"
//!
//! Everything in it is fixed once built. Two nodes with equal configurations
//! resolve identical rules for every block; a node that disagrees at a fork
//! checkpoint is on a different chain. Rule lookup is read-only and lock-free
//! after the first resolution of each segment, so a configuration can be
//! shared across any number of importer threads behind an `Arc`.
//!
//! # Core Types
//!
//! - [`ChainSpec`] - Trait defining what a chain configuration must provide
//! - [`ChainConfig`] - Concrete configuration for mainnet, testnet and custom networks
//! - [`ChainConfigBuilder`] - Constructs and validates custom configurations
//! - [`ChainRegistry`] - Named lookup of configurations
//!
//! # Example
//!
//! ```ignore
//! use keel_chainspec::{init_mainnet, ChainSpec, GasOperation};
//!
//! let spec = init_mainnet();
//! spec.check_block(number, &hash)?;
//!
//! let rules = spec.rules_at(number);
//! if rules.is_feature_active("homestead") {
//!     // Post-Homestead behavior
//! }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod api;
mod bad_hash;
mod cache;
pub mod constants;
pub mod display;
mod error;
pub mod features;
mod registry;
mod spec;

// Re-export fork schedule types
pub use keel_forks::*;

pub use api::ChainSpec;
pub use bad_hash::{BadHash, BadHashes};
pub use constants::*;
pub use display::{ChainSpecExt, DisplayChainSpec};
pub use error::{ChainConfigFileError, InvalidChain, RegistryError};
pub use registry::ChainRegistry;
pub use spec::{ChainConfig, ChainConfigBuilder, MAINNET, TESTNET};

use std::sync::Arc;

/// Initialize and return the mainnet configuration.
///
/// This lazily initializes the mainnet configuration on first call and
/// returns a clone of the Arc on subsequent calls.
pub fn init_mainnet() -> Arc<ChainConfig> {
    spec::init_mainnet()
}

/// Initialize and return the testnet configuration.
///
/// This lazily initializes the testnet configuration on first call and
/// returns a clone of the Arc on subsequent calls.
pub fn init_testnet() -> Arc<ChainConfig> {
    spec::init_testnet()
}

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use super::{
        // Concrete type
        ChainConfig,
        ChainConfigBuilder,
        ChainRegistry,
        // Core trait
        ChainSpec,
        ChainSpecExt,
        // Initialization
        init_mainnet,
        init_testnet,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_spec() {
        let spec = init_mainnet();
        assert!(spec.is_mainnet());
        assert_eq!(spec.chain_id(), mainnet::CHAIN_ID);
    }

    #[test]
    fn test_testnet_spec() {
        let spec = init_testnet();
        assert!(spec.is_testnet());
        assert_eq!(spec.chain_id(), testnet::CHAIN_ID);
    }

    #[test]
    fn test_custom_network() {
        let custom = ChainConfigBuilder::new()
            .name("local")
            .chain_id(999)
            .add_fork(features::homestead(5))
            .build()
            .unwrap();

        assert!(custom.is_dev());
        assert!(!custom.rules_at(4).is_feature_active("homestead"));
        assert!(custom.rules_at(5).is_feature_active("homestead"));
    }
}
