// ── Keepsake: Important Layer ──────────────────────────────────────────────
//
// Tier 1 of the three-tier memory:
//   Recent Buffer (minutes) → Important Layer (hours) → Archive (days+)
//
// Holds events whose ingestion-time importance beat the promotion threshold.
// Bounded: when over capacity, only the highest-importance entries survive.
// Scores decay on every sweep; entries that fall below the residual floor
// are removed by the sweeper, never merely left stale.
//
// Thread-safety: NOT internally synchronized. Callers lock the whole store.

use crate::atoms::keepsake_types::ScoredEvent;
use std::cmp::Ordering;

/// Score-bounded collection of promoted events.
#[derive(Debug, Clone)]
pub struct ImportantLayer {
    entries: Vec<ScoredEvent>,
    capacity: usize,
}

impl ImportantLayer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Insert a promoted event, then enforce the capacity bound.
    pub fn insert(&mut self, scored: ScoredEvent) {
        self.entries.push(scored);
        self.trim_to_capacity();
    }

    /// Enforce the capacity bound: stable-sort by importance descending and
    /// keep the top entries. Idempotent — a second call with no intervening
    /// insert changes nothing. Overflow is discarded outright, not archived:
    /// it only occurs between sweeps, and the next sweep would have decayed
    /// or archived those entries anyway.
    ///
    /// Returns how many entries were discarded.
    pub fn trim_to_capacity(&mut self) -> usize {
        if self.entries.len() <= self.capacity {
            return 0;
        }
        self.entries
            .sort_by(|a, b| cmp_importance_desc(a, b));
        let discarded = self.entries.len() - self.capacity;
        self.entries.truncate(self.capacity);
        log::debug!(
            "[keepsake] important layer over capacity, discarded {} lowest-scoring entries",
            discarded
        );
        discarded
    }

    /// The top `n` entries by current importance, highest first. Ties keep
    /// insertion order (stable sort), so the result is deterministic.
    pub fn ranked(&self, n: usize) -> Vec<&ScoredEvent> {
        let mut refs: Vec<&ScoredEvent> = self.entries.iter().collect();
        refs.sort_by(|a, b| cmp_importance_desc(a, b));
        refs.truncate(n);
        refs
    }

    /// All entries, unranked.
    pub fn entries(&self) -> &[ScoredEvent] {
        &self.entries
    }

    /// Move all entries out (sweep rebuilds the layer from what it retains).
    pub fn drain(&mut self) -> Vec<ScoredEvent> {
        std::mem::take(&mut self.entries)
    }

    /// Replace the contents wholesale, re-applying the capacity bound.
    pub fn replace(&mut self, entries: Vec<ScoredEvent>) {
        self.entries = entries;
        self.trim_to_capacity();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn cmp_importance_desc(a: &ScoredEvent, b: &ScoredEvent) -> Ordering {
    b.importance
        .partial_cmp(&a.importance)
        .unwrap_or(Ordering::Equal)
}
