//! Fork schedules and per-block rule resolution.
//!
//! A network upgrades its protocol through forks activated at fixed block
//! heights. Each fork bundles features, and a feature may activate later than
//! its fork. Features carry typed rule options (gas table, difficulty
//! algorithm) that override one another as they activate.
//!
//! # Core Types
//!
//! - [`ForkSpec`] / [`FeatureSpec`] - Forks as declared, options encoded
//! - [`ForkSchedule`] - Validated, decoded schedule; answers "which forks are active"
//! - [`ResolvedRules`] - The merged rule set in effect at one block
//! - [`CanonicalHashes`] - Local chain lookup used to verify fork checkpoints
//!
//! # Usage
//!
//! ```ignore
//! use keel_forks::{ForkSchedule, ForkSpec, FeatureSpec, GasOperation};
//!
//! let schedule = ForkSchedule::new(&[ForkSpec::new("Homestead", 1_150_000)
//!     .with_feature(FeatureSpec::new("homestead").with_option("gastable", r#"{"sload": 50}"#))])?;
//!
//! let rules = schedule.rules_at(1_150_000);
//! assert_eq!(rules.gas_cost(GasOperation::SLoad), Some(50));
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod display;
mod error;
mod fork;
pub mod options;
mod resolve;
mod schedule;

pub use display::DisplayForks;
pub use error::{ConfigError, ForkError, OptionDecodeError};
pub use fork::{FeatureSpec, Fork, ForkFeature, ForkSpec};
pub use options::{DifficultyAlgorithm, GasOperation, GasTable, OptionKey, RuleOption};
pub use resolve::{EIP155_FEATURE_ID, ResolvedRules, resolve_rules};
pub use schedule::{CanonicalHashes, FeatureTie, ForkSchedule};
