// ── Keepsake: Tiered Event Memory ──────────────────────────────────────────
//
// The companion's memory: a bounded, self-curating store over one stream of
// heterogeneous events (chat lines, vision summaries, app switches, …).
//
// Architecture:
//   Recent Buffer (true tail) → Important Layer (scored, decaying) → Archive (day buckets)
//
// Sub-modules:
//   - scoring:   pure importance scoring (type base + content boosts)
//   - recent:    tier 0 — bounded FIFO of the newest events
//   - important: tier 1 — promotion above a threshold, capacity-bounded
//   - sweep:     decay + archival pass, run inline every N ingested events
//   - archive:   tier 2 — date-keyed day buckets with rolling chat summaries
//   - context:   bounded digest rendering for prompt assembly
//
// Writes flow one way (ingest → store → sweep), reads flow the other
// (store → digest). Nothing here does I/O or blocks; the surrounding shell
// owns one `TieredMemory` per session and calls in from its UI, ticker, and
// prompt-building threads through a single lock.

pub mod archive;
pub mod context;
pub mod important;
pub mod recent;
pub mod scoring;
pub mod sweep;

use crate::atoms::error::{KeepsakeError, KeepsakeResult};
use crate::atoms::keepsake_types::{
    DayBucket, Event, EventPayload, KeepsakeConfig, MemorySnapshot, MemoryStats, ScoredEvent,
};
use archive::ArchiveLayer;
use chrono::{NaiveDate, Utc};
use important::ImportantLayer;
use parking_lot::Mutex;
use recent::RecentBuffer;
use std::sync::Arc;
use sweep::SweepReport;

// Re-exports for convenience
pub use context::DEFAULT_SUMMARY_LINES;
pub use scoring::score;

/// The store behind one lock, for shared use from a small number of threads
/// (event producer, periodic ticker, prompt-building reader).
pub type SharedTieredMemory = Arc<Mutex<TieredMemory>>;

/// Three-tier event memory. One instance per application session.
///
/// Thread-safety: NOT internally synchronized — every mutating operation
/// read-modify-writes the same collections, so concurrent callers must hold
/// one lock around the whole store (see [`SharedTieredMemory`]).
pub struct TieredMemory {
    config: KeepsakeConfig,
    recent: RecentBuffer,
    important: ImportantLayer,
    archive: ArchiveLayer,
    /// Monotonic count of ingested events; sole driver of sweep scheduling.
    event_counter: u64,
}

impl TieredMemory {
    /// Create a store with the given configuration.
    ///
    /// This is the only fallible operation: a bad configuration is
    /// programmer error and fails fast, everything afterwards degrades
    /// gracefully instead of erroring.
    pub fn new(config: KeepsakeConfig) -> KeepsakeResult<Self> {
        config.validate().map_err(KeepsakeError::Config)?;
        Ok(Self {
            recent: RecentBuffer::new(config.recent_max),
            important: ImportantLayer::new(config.important_max),
            archive: ArchiveLayer::new(),
            event_counter: 0,
            config,
        })
    }

    /// Create a store with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(KeepsakeConfig::default()).expect("default config is valid")
    }

    /// Wrap the store in the shared handle.
    pub fn into_shared(self) -> SharedTieredMemory {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &KeepsakeConfig {
        &self.config
    }

    // ── Ingestion ──────────────────────────────────────────────────────

    /// Ingest a payload, stamped with the current wall clock. Never fails:
    /// odd payloads become low-importance entries rather than errors.
    pub fn add(&mut self, payload: EventPayload) {
        self.add_event(Event::now(payload));
    }

    /// Ingest a fully-formed event, keeping its timestamp (replayed history,
    /// simulated age in tests).
    pub fn add_event(&mut self, event: Event) {
        let importance = scoring::score(&event.payload);

        if let Some(evicted) = self.recent.push(event.clone()) {
            log::debug!(
                "[keepsake] recent buffer full, evicted {} event {}",
                evicted.kind(),
                evicted.id
            );
        }

        if importance > self.config.importance_threshold {
            self.important.insert(ScoredEvent { event, importance });
        }

        self.event_counter += 1;

        if self.event_counter % self.config.sweep_interval == 0 {
            let report = self.sweep();
            log::info!(
                "[keepsake] sweep at event {}: {} examined, {} retained, {} archived, {} dropped",
                self.event_counter,
                report.examined,
                report.retained,
                report.archived,
                report.dropped
            );
        }
    }

    /// Ingest a chat line.
    pub fn add_chat(&mut self, text: impl Into<String>, who: impl Into<String>) {
        self.add(EventPayload::chat(text, who));
    }

    /// Ingest a vision-snapshot summary.
    pub fn add_vision(&mut self, summary: impl Into<String>, path: Option<String>) {
        self.add(EventPayload::vision(summary, path));
    }

    /// Ingest a foreground-app switch. The flags come from the external
    /// anomaly tracker.
    pub fn add_app_activity(
        &mut self,
        app: impl Into<String>,
        category: impl Into<String>,
        surprised: bool,
        curious: bool,
    ) {
        self.add(EventPayload::app_activity(app, category, surprised, curious));
    }

    // ── Maintenance ────────────────────────────────────────────────────

    /// Run the decay/archival pass now. Scheduled automatically every
    /// `sweep_interval` ingested events; also callable ad hoc.
    pub fn sweep(&mut self) -> SweepReport {
        sweep::decay_and_archive(
            &mut self.important,
            &mut self.archive,
            &self.config,
            Utc::now(),
        )
    }

    // ── Retrieval ──────────────────────────────────────────────────────

    /// Bounded digest of all three tiers for prompt assembly. Deterministic
    /// for a given store state, never fails, at most `max_lines` lines.
    pub fn get_context_summary(&self, max_lines: usize) -> String {
        context::build_summary(&self.recent, &self.important, &self.archive, max_lines)
    }

    /// The last `count` events, chronological, most-recent last.
    pub fn get_recent(&self, count: usize) -> Vec<&Event> {
        self.recent.recent(count).collect()
    }

    /// The top `count` important entries, highest current score first.
    pub fn get_important(&self, count: usize) -> Vec<&ScoredEvent> {
        self.important.ranked(count)
    }

    /// The archive bucket for an ISO `YYYY-MM-DD` date. Malformed input is
    /// just a miss, never an error.
    pub fn get_archive_for_date(&self, date_str: &str) -> Option<&DayBucket> {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
        self.archive.for_date(date)
    }

    /// Memory usage and density info.
    pub fn get_memory_stats(&self) -> MemoryStats {
        MemoryStats {
            recent_items: self.recent.len(),
            important_items: self.important.len(),
            archive_days: self.archive.day_count(),
            total_events: self.event_counter,
            memory_ratio: self.important.len() as f32 / (self.recent.len() + 1) as f32,
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Reset all layers and the counter. Testing and explicit user reset
    /// only — nothing in normal operation clears memory.
    pub fn clear(&mut self) {
        self.recent.clear();
        self.important.clear();
        self.archive.clear();
        self.event_counter = 0;
    }

    // ── Snapshots ──────────────────────────────────────────────────────

    /// Capture the whole store as data. Persistence belongs to the caller;
    /// this is the hand-off point.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            recent: self.recent.entries().cloned().collect(),
            important: self.important.entries().to_vec(),
            archive: self.archive.days().clone(),
            event_counter: self.event_counter,
            saved_at: Utc::now(),
        }
    }

    /// Replace the store's state from a snapshot. Capacity bounds are
    /// re-applied, so a snapshot taken under a larger configuration cannot
    /// violate this store's invariants.
    pub fn restore(&mut self, snapshot: MemorySnapshot) {
        self.recent.replace(snapshot.recent);
        self.important.replace(snapshot.important);
        self.archive.replace(snapshot.archive);
        self.event_counter = snapshot.event_counter;
    }

    /// Snapshot as a JSON string.
    pub fn snapshot_json(&self) -> KeepsakeResult<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Restore from a JSON snapshot.
    pub fn restore_json(&mut self, json: &str) -> KeepsakeResult<()> {
        let snapshot: MemorySnapshot = serde_json::from_str(json)?;
        self.restore(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::BTreeMap;

    #[test]
    fn test_rejects_invalid_config() {
        let config = KeepsakeConfig {
            important_max: 0,
            ..Default::default()
        };
        assert!(matches!(
            TieredMemory::new(config),
            Err(KeepsakeError::Config(_))
        ));
    }

    #[test]
    fn test_every_event_lands_in_recent() {
        let mut memory = TieredMemory::with_defaults();
        memory.add_app_activity("Terminal", "dev", false, false);
        memory.add_chat("hello", "user");

        assert_eq!(memory.get_recent(10).len(), 2);
    }

    #[test]
    fn test_promotion_is_strictly_above_threshold() {
        let mut memory = TieredMemory::with_defaults();

        // inventory scores exactly 0.4 — at the threshold, not above it
        memory.add(EventPayload::other("inventory", BTreeMap::new()));
        assert!(memory.get_important(10).is_empty());

        // location scores 0.5 — promoted immediately
        memory.add(EventPayload::Location {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        });
        assert_eq!(memory.get_important(10).len(), 1);
    }

    #[test]
    fn test_layers_stay_bounded() {
        let config = KeepsakeConfig {
            recent_max: 5,
            important_max: 8,
            ..Default::default()
        };
        let mut memory = TieredMemory::new(config).unwrap();

        for i in 0..200 {
            memory.add_chat(format!("line {i}"), "user");
            let stats = memory.get_memory_stats();
            assert!(stats.recent_items <= 5);
            assert!(stats.important_items <= 8);
        }
    }

    #[test]
    fn test_counter_schedules_sweep() {
        let config = KeepsakeConfig {
            sweep_interval: 3,
            ..Default::default()
        };
        let mut memory = TieredMemory::new(config).unwrap();

        // A day-old promoted event, fully decayed: the scheduled sweep on
        // the third add must archive it.
        memory.add_event(Event::at(
            EventPayload::chat("remember the vet visit", "user"),
            Utc::now() - Duration::days(2),
        ));
        memory.add_app_activity("Mail", "productivity", false, false);
        assert_eq!(memory.get_important(10).len(), 1);

        memory.add_app_activity("Mail", "productivity", false, false);
        assert!(memory.get_important(10).is_empty());
        assert_eq!(memory.get_memory_stats().archive_days, 1);
    }

    #[test]
    fn test_archived_event_leaves_important_layer() {
        let mut memory = TieredMemory::with_defaults();
        let event = Event::at(
            EventPayload::chat("old favorite song", "user"),
            Utc::now() - Duration::days(3),
        );
        let id = event.id;
        let date = archive::local_date(&event);
        memory.add_event(event);

        memory.sweep();

        assert!(memory.get_important(100).iter().all(|s| s.event.id != id));
        let bucket = memory
            .get_archive_for_date(&date.format("%Y-%m-%d").to_string())
            .unwrap();
        assert_eq!(bucket.event_count, 1);
        assert_eq!(bucket.raw_events[0].id, id);
    }

    #[test]
    fn test_archive_lookup_tolerates_garbage_dates() {
        let memory = TieredMemory::with_defaults();
        assert!(memory.get_archive_for_date("not-a-date").is_none());
        assert!(memory.get_archive_for_date("2026-13-45").is_none());
        assert!(memory.get_archive_for_date("").is_none());
    }

    #[test]
    fn test_stats_and_ratio() {
        let mut memory = TieredMemory::with_defaults();
        memory.add_chat("remember this", "user");
        memory.add_app_activity("Terminal", "dev", false, false);

        let stats = memory.get_memory_stats();
        assert_eq!(stats.recent_items, 2);
        assert_eq!(stats.important_items, 1);
        assert_eq!(stats.total_events, 2);
        assert!((stats.memory_ratio - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut memory = TieredMemory::with_defaults();
        memory.add_chat("hello", "user");
        memory.clear();

        let stats = memory.get_memory_stats();
        assert_eq!(stats.recent_items, 0);
        assert_eq!(stats.important_items, 0);
        assert_eq!(stats.archive_days, 0);
        assert_eq!(stats.total_events, 0);
        assert_eq!(memory.get_context_summary(15), "");
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut memory = TieredMemory::with_defaults();
        memory.add_chat("remember my favorite color is blue?", "user");
        memory.add_vision("a new item on the desk", None);

        let json = memory.snapshot_json().unwrap();
        let mut restored = TieredMemory::with_defaults();
        restored.restore_json(&json).unwrap();

        assert_eq!(
            restored.get_context_summary(15),
            memory.get_context_summary(15)
        );
        assert_eq!(restored.get_memory_stats(), memory.get_memory_stats());
    }

    #[test]
    fn test_restore_clamps_to_own_capacity() {
        let mut big = TieredMemory::with_defaults();
        for i in 0..20 {
            big.add_chat(format!("line {i}"), "user");
        }

        let small_config = KeepsakeConfig {
            recent_max: 4,
            important_max: 6,
            ..Default::default()
        };
        let mut small = TieredMemory::new(small_config).unwrap();
        small.restore(big.snapshot());

        let stats = small.get_memory_stats();
        assert!(stats.recent_items <= 4);
        assert!(stats.important_items <= 6);
    }

    #[test]
    fn test_restore_garbage_json_is_an_error() {
        let mut memory = TieredMemory::with_defaults();
        assert!(matches!(
            memory.restore_json("{nope"),
            Err(KeepsakeError::Serialization(_))
        ));
    }
}
