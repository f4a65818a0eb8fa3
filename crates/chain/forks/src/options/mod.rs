//! Typed rule options carried by fork features.
//!
//! Features declare their parameters as encoded payloads keyed by option name.
//! The set of option keys is closed and each key has exactly one decoder, so
//! payloads are decoded once, when a schedule is frozen, into [`RuleOption`].

mod difficulty;
mod gastable;

pub use difficulty::DifficultyAlgorithm;
pub use gastable::{GasOperation, GasTable};

use std::{collections::BTreeMap, str::FromStr};

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{ConfigError, OptionDecodeError};

/// Key of a rule option, as spelled in encoded feature options.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum OptionKey {
    /// Gas cost table, see [`GasTable`].
    #[strum(serialize = "gastable")]
    GasTable,
    /// Difficulty algorithm, see [`DifficultyAlgorithm`].
    #[strum(serialize = "difficulty")]
    Difficulty,
}

/// A decoded rule option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOption {
    /// Gas costs of repriceable operations.
    GasTable(GasTable),
    /// The difficulty algorithm selector and its parameters.
    Difficulty(DifficultyAlgorithm),
}

impl RuleOption {
    /// Decodes `encoded` with the decoder registered for `key`.
    pub fn decode(key: OptionKey, encoded: &str) -> Result<Self, OptionDecodeError> {
        Ok(match key {
            OptionKey::GasTable => Self::GasTable(GasTable::decode(encoded)?),
            OptionKey::Difficulty => Self::Difficulty(DifficultyAlgorithm::decode(encoded)?),
        })
    }

    /// Encodes the option back into its wire form.
    pub fn encode(&self) -> String {
        match self {
            Self::GasTable(table) => table.encode(),
            Self::Difficulty(algorithm) => algorithm.encode(),
        }
    }

    /// The key this option is stored under.
    pub const fn key(&self) -> OptionKey {
        match self {
            Self::GasTable(_) => OptionKey::GasTable,
            Self::Difficulty(_) => OptionKey::Difficulty,
        }
    }
}

/// Decodes the encoded option map of feature `feature`.
pub(crate) fn decode_options(
    feature: &str,
    encoded: &BTreeMap<String, String>,
) -> Result<BTreeMap<OptionKey, RuleOption>, ConfigError> {
    encoded
        .iter()
        .map(|(raw_key, payload)| {
            let key = OptionKey::from_str(raw_key).map_err(|_| ConfigError::UnknownOption {
                feature: feature.to_string(),
                key: raw_key.clone(),
            })?;
            let option =
                RuleOption::decode(key, payload).map_err(|source| ConfigError::MalformedOption {
                    feature: feature.to_string(),
                    key: key.into(),
                    source,
                })?;
            Ok((key, option))
        })
        .collect()
}
