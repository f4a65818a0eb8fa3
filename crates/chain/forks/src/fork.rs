//! Fork and feature definitions.
//!
//! Forks exist in two layers. [`ForkSpec`] and [`FeatureSpec`] hold a fork as
//! it is declared, with option payloads still encoded; they are what embedded
//! tables and configuration files describe. [`Fork`] and [`ForkFeature`] are
//! the validated, decoded form produced when a schedule is frozen.

use std::{collections::BTreeMap, sync::Arc};

use alloy_primitives::B256;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::value::RawValue;
use serde_with::{DeserializeAs, MapPreventDuplicates, Same};

use crate::{
    ConfigError,
    options::{OptionKey, RuleOption, decode_options},
};

/// A feature as declared, options still encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeatureSpec {
    /// Feature identifier, e.g. `homestead` or `eip155`.
    pub id: String,

    /// Activation block, if later than the containing fork.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<u64>,

    /// Encoded option payloads keyed by option name.
    #[serde(default, deserialize_with = "encoded_options")]
    pub options: BTreeMap<String, String>,
}

impl FeatureSpec {
    /// Creates a feature with no options that activates with its fork.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block: None,
            options: BTreeMap::new(),
        }
    }

    /// Delays activation to `block`.
    pub fn at_block(mut self, block: u64) -> Self {
        self.block = Some(block);
        self
    }

    /// Adds an encoded option payload.
    pub fn with_option(mut self, key: impl Into<String>, encoded: impl Into<String>) -> Self {
        self.options.insert(key.into(), encoded.into());
        self
    }
}

/// Accepts option payloads either as strings holding the encoded text or as
/// inline JSON values, which are kept verbatim. Declaring an option key twice
/// is an error.
fn encoded_options<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Box<RawValue>> =
        MapPreventDuplicates::<Same, Same>::deserialize_as(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let text = value.get();
            if text.starts_with('"') {
                let encoded = serde_json::from_str(text).map_err(D::Error::custom)?;
                Ok((key, encoded))
            } else {
                Ok((key, text.to_string()))
            }
        })
        .collect()
}

/// A fork as declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ForkSpec {
    /// Fork name, e.g. `Homestead`.
    pub name: String,

    /// Activation block.
    pub block: u64,

    /// Hash the canonical chain must have at `block`, if checkpointed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_hash: Option<B256>,

    /// Features introduced by this fork, in declaration order.
    #[serde(default)]
    pub features: Vec<Arc<FeatureSpec>>,
}

impl ForkSpec {
    /// Creates a fork with no features and no checkpoint.
    pub fn new(name: impl Into<String>, block: u64) -> Self {
        Self {
            name: name.into(),
            block,
            required_hash: None,
            features: Vec::new(),
        }
    }

    /// Requires the canonical chain to have `hash` at the activation block.
    pub fn with_required_hash(mut self, hash: B256) -> Self {
        self.required_hash = Some(hash);
        self
    }

    /// Appends a feature.
    pub fn with_feature(mut self, feature: impl Into<Arc<FeatureSpec>>) -> Self {
        self.features.push(feature.into());
        self
    }
}

/// A decoded fork feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkFeature {
    id: String,
    block: Option<u64>,
    options: BTreeMap<OptionKey, RuleOption>,
}

impl ForkFeature {
    /// Decodes a declared feature belonging to `fork`.
    pub fn decode(fork: &ForkSpec, spec: &FeatureSpec) -> Result<Self, ConfigError> {
        if spec.id.is_empty() {
            return Err(ConfigError::EmptyFeatureId {
                fork: fork.name.clone(),
            });
        }
        if let Some(block) = spec.block.filter(|block| *block < fork.block) {
            return Err(ConfigError::FeatureBeforeFork {
                fork: fork.name.clone(),
                fork_block: fork.block,
                feature: spec.id.clone(),
                block,
            });
        }

        Ok(Self {
            id: spec.id.clone(),
            block: spec.block,
            options: decode_options(&spec.id, &spec.options)?,
        })
    }

    /// The feature identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The explicitly declared activation block, if any.
    pub const fn block(&self) -> Option<u64> {
        self.block
    }

    /// Activation block given the containing fork's block.
    pub fn effective_block(&self, fork_block: u64) -> u64 {
        self.block.unwrap_or(fork_block)
    }

    /// All decoded options.
    pub const fn options(&self) -> &BTreeMap<OptionKey, RuleOption> {
        &self.options
    }

    /// The option stored under `key`.
    pub fn option(&self, key: OptionKey) -> Option<&RuleOption> {
        self.options.get(&key)
    }

    /// Re-encodes the feature.
    pub fn to_spec(&self) -> FeatureSpec {
        FeatureSpec {
            id: self.id.clone(),
            block: self.block,
            options: self
                .options
                .iter()
                .map(|(key, option)| (key.to_string(), option.encode()))
                .collect(),
        }
    }
}

/// A decoded fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fork {
    name: String,
    block: u64,
    required_hash: Option<B256>,
    features: Vec<ForkFeature>,
}

impl Fork {
    /// Validates and decodes a declared fork.
    pub fn decode(spec: &ForkSpec) -> Result<Self, ConfigError> {
        if spec.name.is_empty() {
            return Err(ConfigError::EmptyForkName { block: spec.block });
        }

        let features = spec
            .features
            .iter()
            .map(|feature| ForkFeature::decode(spec, feature))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            name: spec.name.clone(),
            block: spec.block,
            required_hash: spec.required_hash,
            features,
        })
    }

    /// The fork name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The activation block.
    pub const fn block(&self) -> u64 {
        self.block
    }

    /// The checkpoint hash required at the activation block, if any.
    pub const fn required_hash(&self) -> Option<B256> {
        self.required_hash
    }

    /// Features in declaration order.
    pub fn features(&self) -> &[ForkFeature] {
        &self.features
    }

    /// Checks whether the fork is active at `block`.
    pub const fn active_at_block(&self, block: u64) -> bool {
        block >= self.block
    }

    /// Checks if `block` is the first block of the fork.
    pub const fn transitions_at_block(&self, block: u64) -> bool {
        block == self.block
    }

    /// Re-encodes the fork.
    pub fn to_spec(&self) -> ForkSpec {
        ForkSpec {
            name: self.name.clone(),
            block: self.block,
            required_hash: self.required_hash,
            features: self
                .features
                .iter()
                .map(|feature| Arc::new(feature.to_spec()))
                .collect(),
        }
    }
}
