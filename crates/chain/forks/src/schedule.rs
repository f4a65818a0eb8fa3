use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    hash::BuildHasher,
};

use alloy_primitives::B256;
use tracing::{debug, warn};

use crate::{ConfigError, Fork, ForkError, ForkSpec, ResolvedRules, resolve_rules};

/// Read access to the hashes of the local canonical chain.
///
/// Used to verify fork checkpoints. Returning `None` means the hash at that
/// block is not known, in which case the checkpoint is not checked.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait CanonicalHashes {
    /// Returns the canonical block hash at `block`.
    fn canonical_hash(&self, block: u64) -> Option<B256>;
}

impl CanonicalHashes for BTreeMap<u64, B256> {
    fn canonical_hash(&self, block: u64) -> Option<B256> {
        self.get(&block).copied()
    }
}

impl<S: BuildHasher> CanonicalHashes for HashMap<u64, B256, S> {
    fn canonical_hash(&self, block: u64) -> Option<B256> {
        self.get(&block).copied()
    }
}

/// Two same-id features sharing an effective block.
///
/// The later declaration wins, but such a schedule is almost certainly a
/// mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTie {
    /// The duplicated feature identifier.
    pub id: String,
    /// The shared effective block.
    pub block: u64,
}

/// A validated fork schedule, strictly ascending by activation block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForkSchedule {
    forks: Vec<Fork>,
    ties: Vec<FeatureTie>,
}

impl ForkSchedule {
    /// Validates and decodes declared forks.
    ///
    /// Fails if forks are not strictly ascending by block, if a feature
    /// activates before its fork, or if any option payload fails to decode.
    pub fn new(specs: &[ForkSpec]) -> Result<Self, ConfigError> {
        let forks = specs.iter().map(Fork::decode).collect::<Result<Vec<_>, _>>()?;

        for pair in forks.windows(2) {
            let [previous, fork] = pair else { continue };
            if fork.block() == previous.block() {
                return Err(ConfigError::DuplicateForkHeight {
                    block: fork.block(),
                    first: previous.name().to_string(),
                    second: fork.name().to_string(),
                });
            }
            if fork.block() < previous.block() {
                return Err(ConfigError::UnorderedForks {
                    previous: previous.name().to_string(),
                    previous_block: previous.block(),
                    fork: fork.name().to_string(),
                    block: fork.block(),
                });
            }
        }

        let ties = find_ties(&forks);
        for tie in &ties {
            warn!(
                feature = %tie.id,
                block = tie.block,
                "feature declared twice with the same activation block, later declaration wins"
            );
        }

        debug!(forks = forks.len(), "fork schedule frozen");
        Ok(Self { forks, ties })
    }

    /// All forks, ascending.
    pub fn forks(&self) -> &[Fork] {
        &self.forks
    }

    /// Number of forks.
    pub fn len(&self) -> usize {
        self.forks.len()
    }

    /// Returns true if no fork is scheduled.
    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    /// Same-id features sharing an effective block.
    pub fn feature_ties(&self) -> &[FeatureTie] {
        &self.ties
    }

    /// Looks up a fork by name.
    pub fn fork(&self, name: &str) -> Option<&Fork> {
        self.forks.iter().find(|fork| fork.name() == name)
    }

    /// Forks active at `block`, ascending.
    pub fn active_forks(&self, block: u64) -> &[Fork] {
        let active = self.forks.partition_point(|fork| fork.active_at_block(block));
        self.forks.get(..active).unwrap_or_default()
    }

    /// Forks active at `block`, verifying checkpoints against `hashes`.
    ///
    /// Every active fork carrying a required hash is compared with the hash
    /// `hashes` reports at the fork block.
    pub fn active_forks_verified<H: CanonicalHashes>(
        &self,
        block: u64,
        hashes: &H,
    ) -> Result<&[Fork], ForkError> {
        let active = self.active_forks(block);
        for fork in active {
            let Some(expected) = fork.required_hash() else {
                continue;
            };
            if let Some(observed) = hashes.canonical_hash(fork.block()) {
                if observed != expected {
                    return Err(ForkError::ChainMismatch {
                        fork: fork.name().to_string(),
                        block: fork.block(),
                        expected,
                        observed,
                    });
                }
            }
        }
        Ok(active)
    }

    /// The most recent fork active at `block`.
    pub fn current_fork(&self, block: u64) -> Option<&Fork> {
        self.active_forks(block).last()
    }

    /// Checks whether the fork named `name` is active at `block`.
    pub fn is_fork_active_at_block(&self, name: &str, block: u64) -> bool {
        self.fork(name).is_some_and(|fork| fork.active_at_block(block))
    }

    /// Activation block of the first fork scheduled after `after`.
    pub fn next_fork_block(&self, after: u64) -> Option<u64> {
        self.forks
            .iter()
            .map(Fork::block)
            .find(|block| *block > after)
    }

    /// Blocks at which the resolved rules can change, ascending.
    pub fn activation_points(&self) -> Vec<u64> {
        self.forks
            .iter()
            .flat_map(|fork| {
                core::iter::once(fork.block()).chain(
                    fork.features()
                        .iter()
                        .map(|feature| feature.effective_block(fork.block())),
                )
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resolves the rules in effect at `block`.
    pub fn rules_at(&self, block: u64) -> ResolvedRules {
        resolve_rules(self.active_forks(block), block)
    }

    /// Re-encodes the schedule.
    pub fn to_specs(&self) -> Vec<ForkSpec> {
        self.forks.iter().map(Fork::to_spec).collect()
    }
}

fn find_ties(forks: &[Fork]) -> Vec<FeatureTie> {
    let mut seen: BTreeMap<(&str, u64), usize> = BTreeMap::new();
    for fork in forks {
        for feature in fork.features() {
            *seen
                .entry((feature.id(), feature.effective_block(fork.block())))
                .or_default() += 1;
        }
    }
    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((id, block), _)| FeatureTie {
            id: id.to_string(),
            block,
        })
        .collect()
}
