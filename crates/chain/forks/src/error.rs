//! Error types for fork schedule construction and resolution.

use alloy_primitives::B256;

/// Failure to decode a single encoded option payload.
#[derive(Debug, thiserror::Error)]
pub enum OptionDecodeError {
    /// The payload is not valid JSON of the expected shape.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A gas table names an operation that is not metered by any fork.
    #[error("unknown gas operation {0:?}")]
    UnknownOperation(String),

    /// A difficulty selector names an algorithm outside the supported set.
    #[error("unknown difficulty algorithm {0:?}")]
    UnknownAlgorithm(String),

    /// A difficulty algorithm is missing a required parameter.
    #[error("difficulty algorithm {algorithm} requires parameter {parameter:?}")]
    MissingParameter {
        /// The selected algorithm.
        algorithm: &'static str,
        /// The missing parameter name.
        parameter: &'static str,
    },

    /// A difficulty algorithm was given a parameter it does not take.
    #[error("difficulty algorithm {algorithm} does not take parameter {parameter:?}")]
    UnexpectedParameter {
        /// The selected algorithm.
        algorithm: &'static str,
        /// The unexpected parameter name.
        parameter: String,
    },

    /// A difficulty parameter is present but not an unsigned integer.
    #[error("difficulty parameter {parameter:?} must be an unsigned integer")]
    InvalidParameter {
        /// The offending parameter name.
        parameter: &'static str,
    },
}

/// A malformed fork schedule. Always fatal when a configuration is frozen.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A fork was declared without a name.
    #[error("fork at block {block} has an empty name")]
    EmptyForkName {
        /// Activation block of the unnamed fork.
        block: u64,
    },

    /// A feature was declared without an identifier.
    #[error("fork {fork} declares a feature with an empty id")]
    EmptyFeatureId {
        /// The fork declaring the feature.
        fork: String,
    },

    /// Two forks share an activation block.
    #[error("forks {first} and {second} share activation block {block}")]
    DuplicateForkHeight {
        /// The shared activation block.
        block: u64,
        /// The fork declared first.
        first: String,
        /// The fork declared second.
        second: String,
    },

    /// Forks are not declared in ascending activation order.
    #[error("fork {fork} (block {block}) is declared after {previous} (block {previous_block})")]
    UnorderedForks {
        /// The fork declared before the offending one.
        previous: String,
        /// Activation block of `previous`.
        previous_block: u64,
        /// The offending fork.
        fork: String,
        /// Activation block of `fork`.
        block: u64,
    },

    /// A feature activates before the fork that introduces it.
    #[error("feature {feature} activates at block {block}, before its fork {fork} (block {fork_block})")]
    FeatureBeforeFork {
        /// The containing fork.
        fork: String,
        /// Activation block of the containing fork.
        fork_block: u64,
        /// The offending feature.
        feature: String,
        /// The feature's declared activation block.
        block: u64,
    },

    /// A feature declares an option key with no known decoder.
    #[error("feature {feature} declares unknown option {key:?}")]
    UnknownOption {
        /// The declaring feature.
        feature: String,
        /// The unknown option key.
        key: String,
    },

    /// An option payload failed to decode.
    #[error("feature {feature} option {key}: {source}")]
    MalformedOption {
        /// The declaring feature.
        feature: String,
        /// The option key being decoded.
        key: &'static str,
        /// The decoder failure.
        #[source]
        source: OptionDecodeError,
    },
}

/// Errors surfaced by fork schedule queries.
#[derive(Debug, thiserror::Error)]
pub enum ForkError {
    /// The schedule itself is malformed.
    #[error("invalid chain configuration: {0}")]
    ConfigInvalid(#[from] ConfigError),

    /// The observed chain disagrees with a fork's required checkpoint hash.
    #[error("chain mismatch at fork {fork} (block {block}): expected {expected}, found {observed}")]
    ChainMismatch {
        /// The fork carrying the checkpoint.
        fork: String,
        /// The checkpoint block.
        block: u64,
        /// The required hash.
        expected: B256,
        /// The hash observed on the local chain.
        observed: B256,
    },
}
