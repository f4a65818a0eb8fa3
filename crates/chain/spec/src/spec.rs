//! Concrete chain configurations
//!
//! This module provides [`ChainConfig`], the frozen configuration of one
//! network, and [`ChainConfigBuilder`], which assembles and validates it.
//!
//! Pre-built configurations are available via [`init_mainnet`] and
//! [`init_testnet`]. Custom configurations can be built with
//! [`ChainConfigBuilder`] or loaded from JSON with [`ChainConfig::from_file`].
//!
//! [`init_mainnet`]: crate::init_mainnet
//! [`init_testnet`]: crate::init_testnet

use std::sync::{Arc, OnceLock};

use alloy_primitives::B256;
use keel_forks::{
    CanonicalHashes, ConfigError, ForkError, ForkSchedule, ForkSpec, ResolvedRules, resolve_rules,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    BadHash, BadHashes, ChainSpec,
    cache::RulesCache,
    constants::{dev, mainnet, testnet},
    error::ChainConfigFileError,
    features,
};

/// The frozen configuration of one network.
///
/// Holds the chain identifier, the validated fork schedule and the known bad
/// blocks. Nothing in it changes after [`ChainConfigBuilder::build`]; share it
/// as `Arc<ChainConfig>`.
///
/// Rule sets are memoized per activation segment, so repeated
/// [`rules_at`](ChainSpec::rules_at) queries within a segment return the same
/// allocation.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    name: String,
    chain_id: u64,
    schedule: ForkSchedule,
    bad_hashes: BadHashes,
    cache: RulesCache,
}

impl PartialEq for ChainConfig {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.chain_id == other.chain_id
            && self.schedule == other.schedule
            && self.bad_hashes == other.bad_hashes
    }
}

impl Eq for ChainConfig {}

/// On-disk form of a [`ChainConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ChainConfigFile {
    #[serde(default)]
    name: Option<String>,
    chain_id: u64,
    #[serde(default)]
    forks: Vec<ForkSpec>,
    #[serde(default)]
    bad_hashes: Vec<BadHash>,
}

/// The Ethereum Classic mainnet configuration
pub static MAINNET: OnceLock<Arc<ChainConfig>> = OnceLock::new();

/// Initialize the mainnet configuration
#[allow(clippy::expect_used)]
pub(crate) fn init_mainnet() -> Arc<ChainConfig> {
    MAINNET
        .get_or_init(|| {
            Arc::new(
                ChainConfigBuilder::mainnet()
                    .build()
                    .expect("embedded mainnet configuration is valid"),
            )
        })
        .clone()
}

/// The Ethereum Classic testnet configuration
pub static TESTNET: OnceLock<Arc<ChainConfig>> = OnceLock::new();

/// Initialize the testnet configuration
#[allow(clippy::expect_used)]
pub(crate) fn init_testnet() -> Arc<ChainConfig> {
    TESTNET
        .get_or_init(|| {
            Arc::new(
                ChainConfigBuilder::testnet()
                    .build()
                    .expect("embedded testnet configuration is valid"),
            )
        })
        .clone()
}

/// Builder for constructing [`ChainConfig`]s.
///
/// Start from scratch with [`ChainConfigBuilder::new()`], or derive from a
/// built-in network with [`ChainConfigBuilder::mainnet()`] or
/// [`ChainConfigBuilder::testnet()`]. Nothing is validated until
/// [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct ChainConfigBuilder {
    name: Option<String>,
    chain_id: Option<u64>,
    forks: Vec<ForkSpec>,
    bad_hashes: Vec<BadHash>,
}

impl ChainConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the network name
    pub fn name(mut self, name: impl ToString) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the chain identifier
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Append a fork. Forks must be added in ascending block order.
    pub fn add_fork(mut self, fork: ForkSpec) -> Self {
        self.forks.push(fork);
        self
    }

    /// Replace all forks.
    pub fn forks(mut self, forks: Vec<ForkSpec>) -> Self {
        self.forks = forks;
        self
    }

    /// Add a known-invalid block.
    pub fn add_bad_hash(mut self, block: u64, hash: B256) -> Self {
        self.bad_hashes.push(BadHash::new(block, hash));
        self
    }

    /// Replace all known-invalid blocks.
    pub fn bad_hashes(mut self, bad_hashes: Vec<BadHash>) -> Self {
        self.bad_hashes = bad_hashes;
        self
    }

    /// Create a builder initialized with mainnet settings
    pub fn mainnet() -> Self {
        let (bad_block, bad_hash) = mainnet::BAD_BLOCK_116522;
        Self::new()
            .name(mainnet::NAME)
            .chain_id(mainnet::CHAIN_ID)
            .add_fork(features::homestead(mainnet::HOMESTEAD_BLOCK))
            .add_fork(features::etf(mainnet::ETF_BLOCK).with_required_hash(mainnet::ETF_HASH))
            .add_fork(features::gas_reprice(mainnet::GAS_REPRICE_BLOCK))
            .add_fork(features::diehard(mainnet::DIEHARD_BLOCK))
            .add_bad_hash(bad_block, bad_hash)
    }

    /// Create a builder initialized with testnet settings
    pub fn testnet() -> Self {
        let mut builder = Self::new()
            .name(testnet::NAME)
            .chain_id(testnet::CHAIN_ID)
            .add_fork(features::homestead(testnet::HOMESTEAD_BLOCK))
            .add_fork(features::gas_reprice(testnet::GAS_REPRICE_BLOCK))
            .add_fork(features::etf(testnet::ETF_BLOCK))
            .add_fork(features::diehard(testnet::DIEHARD_BLOCK));
        for (block, hash) in [testnet::BAD_BLOCK_383792, testnet::BAD_BLOCK_1915277] {
            builder = builder.add_bad_hash(block, hash);
        }
        builder
    }

    /// Validate, decode and freeze the configuration.
    ///
    /// Fails if the fork schedule is malformed or any option payload does not
    /// decode.
    pub fn build(self) -> Result<ChainConfig, ConfigError> {
        let chain_id = self.chain_id.unwrap_or(dev::CHAIN_ID);

        // Use the chain id as network name if not specified
        let name = self.name.unwrap_or_else(|| match chain_id {
            dev::CHAIN_ID => dev::NAME.to_string(),
            id => format!("chain-{id}"),
        });

        let schedule = ForkSchedule::new(&self.forks)?;
        let cache = RulesCache::new(schedule.activation_points());
        let bad_hashes = self.bad_hashes.into_iter().collect();

        debug!(%name, chain_id, forks = schedule.len(), "chain configuration frozen");
        Ok(ChainConfig {
            name,
            chain_id,
            schedule,
            bad_hashes,
            cache,
        })
    }
}

impl ChainConfigFile {
    fn into_builder(self) -> ChainConfigBuilder {
        ChainConfigBuilder {
            name: self.name,
            chain_id: Some(self.chain_id),
            forks: self.forks,
            bad_hashes: self.bad_hashes,
        }
    }
}

impl ChainConfig {
    /// Returns a fresh builder.
    pub fn builder() -> ChainConfigBuilder {
        ChainConfigBuilder::new()
    }

    /// Resolves the rules at `block` without touching the cache.
    pub fn resolve_uncached(&self, block: u64) -> ResolvedRules {
        resolve_rules(self.schedule.active_forks(block), block)
    }

    /// Number of rule segments resolved and cached so far.
    pub fn cached_segments(&self) -> usize {
        self.cache.resolved()
    }

    /// Resolves the rules at `block`, first verifying fork checkpoints
    /// against the local chain.
    ///
    /// Fails with [`ForkError::ChainMismatch`] if an active fork's required
    /// hash disagrees with the hash `hashes` reports at that fork's block.
    pub fn rules_at_verified<H: CanonicalHashes>(
        &self,
        block: u64,
        hashes: &H,
    ) -> Result<Arc<ResolvedRules>, ForkError> {
        self.schedule.active_forks_verified(block, hashes)?;
        Ok(self.rules_at(block))
    }

    /// Load a ChainConfig from a JSON file.
    ///
    /// Example file:
    /// ```json
    /// {
    ///   "name": "local",
    ///   "chainId": 1337,
    ///   "forks": [
    ///     {
    ///       "name": "Homestead",
    ///       "block": 10,
    ///       "features": [
    ///         {
    ///           "id": "homestead",
    ///           "options": {
    ///             "gastable": { "sload": 50 },
    ///             "difficulty": { "name": "homestead", "options": {} }
    ///           }
    ///         }
    ///       ]
    ///     }
    ///   ],
    ///   "badHashes": []
    /// }
    /// ```
    pub fn from_file(path: &std::path::Path) -> Result<Self, ChainConfigFileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and freeze a ChainConfig from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ChainConfigFileError> {
        let file: ChainConfigFile = serde_json::from_str(json)?;
        Ok(file.into_builder().build()?)
    }

    /// Serialize this ChainConfig to a JSON string.
    pub fn to_json(&self) -> Result<String, ChainConfigFileError> {
        let file = ChainConfigFile {
            name: Some(self.name.clone()),
            chain_id: self.chain_id,
            forks: self.schedule.to_specs(),
            bad_hashes: self.bad_hashes.iter().copied().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Write this ChainConfig to a JSON file.
    pub fn to_file(&self, path: &std::path::Path) -> Result<(), ChainConfigFileError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl ChainSpec for ChainConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn schedule(&self) -> &ForkSchedule {
        &self.schedule
    }

    fn bad_hashes(&self) -> &BadHashes {
        &self.bad_hashes
    }

    fn rules_at(&self, block: u64) -> Arc<ResolvedRules> {
        self.cache
            .get_or_resolve(block, || self.resolve_uncached(block))
    }
}
