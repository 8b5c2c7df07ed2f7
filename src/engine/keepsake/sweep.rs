// ── Keepsake: Decay & Archival Sweep ───────────────────────────────────────
//
// Maintenance pass over the important layer, run inline every N ingested
// events (and ad hoc from tests or callers):
//
//   1. Age each entry        – age = now − event timestamp, clamped to ≥ 0
//   2. Exponential decay     – importance halves every half-life of age
//   3. Retain or evict       – still above the residual floor: update the
//                              score in place and keep the entry
//   4. Archive or drop       – below the floor AND older than a day: file
//                              into the day bucket; below the floor but
//                              young: drop outright
//
// The drop-vs-archive asymmetry is deliberate: the archive preserves
// old-but-once-important context, not transient noise.
//
// After the sweep the important layer holds exactly the retained entries.

use crate::atoms::keepsake_types::KeepsakeConfig;
use crate::engine::keepsake::archive::ArchiveLayer;
use crate::engine::keepsake::important::ImportantLayer;
use chrono::{DateTime, Utc};

/// What one sweep did. Logged after every scheduled run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Important-layer entries examined.
    pub examined: usize,
    /// Entries kept with a decayed score.
    pub retained: usize,
    /// Entries moved into day buckets.
    pub archived: usize,
    /// Entries discarded outright (decayed but too young to archive).
    pub dropped: usize,
}

/// Apply time decay to every important entry, archiving or dropping the
/// ones that fall below the residual floor.
pub fn decay_and_archive(
    important: &mut ImportantLayer,
    archive: &mut ArchiveLayer,
    config: &KeepsakeConfig,
    now: DateTime<Utc>,
) -> SweepReport {
    let mut report = SweepReport::default();
    let mut retained = Vec::new();

    for mut entry in important.drain() {
        report.examined += 1;

        // Clock adjustments can put timestamps in the future; a negative
        // age would inflate the score past 1.0.
        let age_secs =
            ((now - entry.event.timestamp).num_milliseconds() as f32 / 1000.0).max(0.0);

        let decay_factor = 0.5_f32.powf(age_secs / config.decay_half_life_secs);
        let decayed = entry.importance * decay_factor;

        if decayed > config.residual_floor {
            entry.importance = decayed;
            retained.push(entry);
            report.retained += 1;
        } else if age_secs > config.archive_after_secs {
            archive.absorb(entry.event);
            report.archived += 1;
        } else {
            report.dropped += 1;
        }
    }

    important.replace(retained);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::keepsake_types::{Event, EventPayload, ScoredEvent};
    use chrono::Duration;

    fn scored_at(importance: f32, age_secs: i64, now: DateTime<Utc>) -> ScoredEvent {
        ScoredEvent {
            event: Event::at(
                EventPayload::chat("remember the window seat", "user"),
                now - Duration::seconds(age_secs),
            ),
            importance,
        }
    }

    fn run(entries: Vec<ScoredEvent>, now: DateTime<Utc>) -> (ImportantLayer, ArchiveLayer, SweepReport) {
        let mut important = ImportantLayer::new(100);
        let mut archive = ArchiveLayer::new();
        for e in entries {
            important.insert(e);
        }
        let report = decay_and_archive(&mut important, &mut archive, &KeepsakeConfig::default(), now);
        (important, archive, report)
    }

    #[test]
    fn test_fresh_entry_keeps_full_score() {
        let now = Utc::now();
        let (important, _, report) = run(vec![scored_at(0.9, 0, now)], now);
        assert_eq!(report.retained, 1);
        assert!((important.entries()[0].importance - 0.9).abs() < 1e-3);
    }

    #[test]
    fn test_score_halves_after_one_half_life() {
        let now = Utc::now();
        let (important, _, _) = run(vec![scored_at(0.9, 3600, now)], now);
        assert!((important.entries()[0].importance - 0.45).abs() < 1e-3);
    }

    #[test]
    fn test_decay_never_increases_score() {
        let now = Utc::now();
        let mut important = ImportantLayer::new(100);
        let mut archive = ArchiveLayer::new();
        important.insert(scored_at(0.9, 600, now));
        let config = KeepsakeConfig::default();

        let mut last = important.entries()[0].importance;
        for minutes in [10, 20, 40] {
            let later = now + Duration::minutes(minutes);
            decay_and_archive(&mut important, &mut archive, &config, later);
            let current = important.entries()[0].importance;
            assert!(current <= last);
            last = current;
        }
    }

    #[test]
    fn test_young_decayed_entry_is_dropped_not_archived() {
        let now = Utc::now();
        // Four hours old: decayed well below the floor, far short of a day.
        let (important, archive, report) = run(vec![scored_at(0.9, 4 * 3600, now)], now);
        assert!(important.is_empty());
        assert!(archive.is_empty());
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_old_decayed_entry_is_archived() {
        let now = Utc::now();
        let (important, archive, report) = run(vec![scored_at(0.9, 2 * 86_400, now)], now);
        assert!(important.is_empty());
        assert_eq!(archive.day_count(), 1);
        assert_eq!(report.archived, 1);
    }

    #[test]
    fn test_future_timestamp_clamps_to_zero_age() {
        let now = Utc::now();
        let (important, _, _) = run(vec![scored_at(0.9, -3600, now)], now);
        // No inflation past the ingestion-time score.
        assert!(important.entries()[0].importance <= 0.9 + 1e-6);
    }

    #[test]
    fn test_report_totals_add_up() {
        let now = Utc::now();
        let entries = vec![
            scored_at(0.9, 0, now),          // retained
            scored_at(0.9, 4 * 3600, now),   // dropped
            scored_at(0.9, 2 * 86_400, now), // archived
        ];
        let (_, _, report) = run(entries, now);
        assert_eq!(report.examined, 3);
        assert_eq!(report.retained + report.archived + report.dropped, 3);
        assert_eq!(report.retained, 1);
        assert_eq!(report.archived, 1);
        assert_eq!(report.dropped, 1);
    }
}
