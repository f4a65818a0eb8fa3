//! Error types for chainspec operations.

use alloy_primitives::B256;
use keel_forks::ConfigError;

/// A block matched a known-invalid (height, hash) pair.
///
/// Rejects that block only; the caller should flag the peer that served it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("block {block} with hash {hash} belongs to a known invalid chain")]
pub struct InvalidChain {
    /// The rejected block height.
    pub block: u64,
    /// The rejected block hash.
    pub hash: B256,
}

/// Error type for [`ChainRegistry`](crate::ChainRegistry) lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No configuration is registered under the name.
    #[error("no chain configuration named {0:?}")]
    NotFound(String),

    /// A configuration is already registered under the name.
    #[error("chain configuration {0:?} is already registered")]
    DuplicateConfig(String),
}

/// Error type for ChainConfig file operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainConfigFileError {
    /// IO error reading/writing file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parsed but describes an invalid schedule.
    #[error("invalid chain configuration: {0}")]
    Config(#[from] ConfigError),
}
