//! Memoized rule sets.
//!
//! Rules only change at a schedule's activation points, so the block line is
//! split into segments `[point_i, point_i+1)` and each segment resolves once.
//! Slots are write-once; readers never lock after the first resolution.

use std::sync::{Arc, OnceLock};

use keel_forks::ResolvedRules;

#[derive(Debug, Clone, Default)]
pub(crate) struct RulesCache {
    /// Ascending activation points.
    boundaries: Vec<u64>,
    /// One slot per segment, `boundaries.len() + 1` in total.
    segments: Vec<OnceLock<Arc<ResolvedRules>>>,
}

impl RulesCache {
    pub(crate) fn new(boundaries: Vec<u64>) -> Self {
        let segments = (0..=boundaries.len()).map(|_| OnceLock::new()).collect();
        Self {
            boundaries,
            segments,
        }
    }

    /// Returns the cached rules of the segment containing `block`, resolving
    /// them with `resolve` on first access.
    pub(crate) fn get_or_resolve(
        &self,
        block: u64,
        resolve: impl FnOnce() -> ResolvedRules,
    ) -> Arc<ResolvedRules> {
        let segment = self.boundaries.partition_point(|point| *point <= block);
        match self.segments.get(segment) {
            Some(slot) => slot.get_or_init(|| Arc::new(resolve())).clone(),
            None => Arc::new(resolve()),
        }
    }

    /// Number of segments resolved so far.
    pub(crate) fn resolved(&self) -> usize {
        self.segments
            .iter()
            .filter(|slot| slot.get().is_some())
            .count()
    }
}
