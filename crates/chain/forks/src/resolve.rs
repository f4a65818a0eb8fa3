//! Merging active fork features into the rule set of one block.

use std::collections::{BTreeMap, btree_map::Entry};

use tracing::trace;

use crate::{
    Fork, ForkFeature,
    options::{DifficultyAlgorithm, GasOperation, GasTable, OptionKey, RuleOption},
};

/// Identifier of the feature enabling EIP-155 replay protection.
pub const EIP155_FEATURE_ID: &str = "eip155";

/// The protocol rules in effect at a block.
///
/// Produced by [`resolve_rules`]. Options no active feature sets fall back to
/// their Frontier values: [`GasTable::frontier`] and
/// [`DifficultyAlgorithm::Frontier`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedRules {
    fork: Option<String>,
    features: BTreeMap<String, u64>,
    options: BTreeMap<OptionKey, RuleOption>,
}

impl ResolvedRules {
    /// Name of the most recent active fork.
    pub fn current_fork(&self) -> Option<&str> {
        self.fork.as_deref()
    }

    /// Active feature identifiers with the block each took effect.
    pub const fn features(&self) -> &BTreeMap<String, u64> {
        &self.features
    }

    /// Checks whether feature `id` is active.
    pub fn is_feature_active(&self, id: &str) -> bool {
        self.features.contains_key(id)
    }

    /// Checks whether EIP-155 replay protection applies.
    pub fn is_replay_protected(&self) -> bool {
        self.is_feature_active(EIP155_FEATURE_ID)
    }

    /// Options explicitly set by active features.
    pub const fn options(&self) -> &BTreeMap<OptionKey, RuleOption> {
        &self.options
    }

    /// The option stored under `key`, if an active feature sets it.
    pub fn option(&self, key: OptionKey) -> Option<&RuleOption> {
        self.options.get(&key)
    }

    /// The gas table in effect.
    pub fn gas_table(&self) -> &GasTable {
        match self.option(OptionKey::GasTable) {
            Some(RuleOption::GasTable(table)) => table,
            _ => GasTable::frontier(),
        }
    }

    /// Gas cost of `op` in effect.
    pub fn gas_cost(&self, op: GasOperation) -> Option<u64> {
        self.gas_table().cost(op)
    }

    /// The difficulty algorithm in effect.
    pub fn difficulty(&self) -> DifficultyAlgorithm {
        match self.option(OptionKey::Difficulty) {
            Some(RuleOption::Difficulty(algorithm)) => *algorithm,
            _ => DifficultyAlgorithm::Frontier,
        }
    }
}

/// Resolves the rules at `block` from the forks active at `block`.
///
/// Features activating after `block` are ignored. Among features sharing an
/// identifier the one with the greatest effective block wins, with later
/// declarations winning ties. Winning features are then applied in order of
/// effective block (declaration order on ties), so each option key is taken
/// from the most recently activated feature that sets it.
pub fn resolve_rules(active_forks: &[Fork], block: u64) -> ResolvedRules {
    let declared = active_forks.iter().flat_map(|fork| {
        fork.features()
            .iter()
            .map(move |feature| (feature.effective_block(fork.block()), feature))
    });

    // id -> (effective block, declaration index, feature)
    let mut winners: BTreeMap<&str, (u64, usize, &ForkFeature)> = BTreeMap::new();
    for (index, (at, feature)) in declared.enumerate() {
        if at > block {
            continue;
        }
        match winners.entry(feature.id()) {
            Entry::Vacant(entry) => {
                entry.insert((at, index, feature));
            }
            Entry::Occupied(mut entry) => {
                if at >= entry.get().0 {
                    entry.insert((at, index, feature));
                }
            }
        }
    }

    let mut ordered: Vec<_> = winners.into_values().collect();
    ordered.sort_by_key(|(at, index, _)| (*at, *index));

    let mut rules = ResolvedRules {
        fork: active_forks.last().map(|fork| fork.name().to_string()),
        ..Default::default()
    };
    for (at, _, feature) in ordered {
        rules.features.insert(feature.id().to_string(), at);
        for (key, option) in feature.options() {
            rules.options.insert(*key, option.clone());
        }
    }

    trace!(
        block,
        fork = rules.current_fork(),
        features = rules.features.len(),
        "resolved rules"
    );
    rules
}
