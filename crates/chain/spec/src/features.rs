//! Feature definitions shared by the built-in networks.
//!
//! Option payloads are kept in their encoded form, exactly as the historical
//! schedules declare them, and decoded when a configuration is built.

use std::sync::{Arc, LazyLock};

use keel_forks::{EIP155_FEATURE_ID, FeatureSpec, ForkSpec};

use crate::constants::DEFAULT_BOMB_DELAY_LENGTH;

const HOMESTEAD_GAS_TABLE: &str = r#"{
    "extcodesize":     20,
    "extcodecopy":     20,
    "balance":         20,
    "sload":           50,
    "calls":           40,
    "suicide":         0,
    "expbyte":         10
}"#;

const GAS_REPRICE_GAS_TABLE: &str = r#"{
    "extcodesize":     700,
    "extcodecopy":     700,
    "balance":         400,
    "sload":           200,
    "calls":           700,
    "suicide":         5000,
    "expbyte":         10,
    "createBySuicide": 25000
}"#;

const DIEHARD_GAS_TABLE: &str = r#"{
    "extcodesize":     700,
    "extcodecopy":     700,
    "balance":         400,
    "sload":           200,
    "calls":           700,
    "suicide":         5000,
    "expbyte":         50,
    "createBySuicide": 25000
}"#;

/// EIP-150 gas reprice.
pub static DEFAULT_GAS_REPRICE_FEATURE: LazyLock<Arc<FeatureSpec>> = LazyLock::new(|| {
    Arc::new(FeatureSpec::new("gasReprice").with_option("gastable", GAS_REPRICE_GAS_TABLE))
});

/// EIP-160 `EXP` reprice, on top of EIP-150.
pub static DEFAULT_DIEHARD_GAS_REPRICE_FEATURE: LazyLock<Arc<FeatureSpec>> =
    LazyLock::new(|| {
        Arc::new(FeatureSpec::new("diehardGasReprice").with_option("gastable", DIEHARD_GAS_TABLE))
    });

/// EIP-155 replay protection.
pub static DEFAULT_EIP155_FEATURE: LazyLock<Arc<FeatureSpec>> =
    LazyLock::new(|| Arc::new(FeatureSpec::new(EIP155_FEATURE_ID)));

/// The Homestead fork at `block`.
pub fn homestead(block: u64) -> ForkSpec {
    ForkSpec::new("Homestead", block).with_feature(
        FeatureSpec::new("homestead")
            .with_option("gastable", HOMESTEAD_GAS_TABLE)
            .with_option("difficulty", r#"{"name": "homestead", "options": {}}"#),
    )
}

/// The EIP-150 gas reprice fork at `block`.
pub fn gas_reprice(block: u64) -> ForkSpec {
    ForkSpec::new("GasReprice", block).with_feature(DEFAULT_GAS_REPRICE_FEATURE.clone())
}

/// The ETF fork at `block`. Carries no features; on mainnet it checkpoints
/// the non-DAO chain.
pub fn etf(block: u64) -> ForkSpec {
    ForkSpec::new("ETF", block)
}

/// The Diehard fork at `block`, with the difficulty bomb resuming
/// [`DEFAULT_BOMB_DELAY_LENGTH`] blocks later.
///
/// If the resume height does not fit in a `u64` the bomb never resumes and
/// the explosion feature is left out.
pub fn diehard(block: u64) -> ForkSpec {
    let fork = ForkSpec::new("Diehard", block)
        .with_feature(DEFAULT_EIP155_FEATURE.clone())
        .with_feature(DEFAULT_DIEHARD_GAS_REPRICE_FEATURE.clone())
        .with_feature(
            FeatureSpec::new("ecip1010Default")
                .with_option("difficulty", r#"{"name": "diehard", "options": {}}"#),
        );

    let Some(explosion) = block.checked_add(DEFAULT_BOMB_DELAY_LENGTH) else {
        return fork;
    };
    fork.with_feature(
        FeatureSpec::new("explosionDefault")
            .at_block(explosion)
            .with_option(
                "difficulty",
                format!(
                    r#"{{"name": "explosion", "options": {{"delay": {DEFAULT_BOMB_DELAY_LENGTH}}}}}"#
                ),
            ),
    )
}
