// ── Keepsake: Archive Layer ────────────────────────────────────────────────
//
// Tier 2 of the three-tier memory:
//   Recent Buffer (minutes) → Important Layer (hours) → Archive (days+)
//
// Day buckets keyed by the event's local calendar date. Archival is the
// terminal state for an event: once a record lands here it never returns to
// the important layer, and the core never expires buckets — long-term
// retention (and any pruning) belongs to the caller.
//
// Chat events also contribute a truncated "{who}: {text}; " fragment to the
// day's rolling summary. Identical lines are appended once per day: the
// de-dup check is exact set membership over rendered fragments, not
// substring containment.

use crate::atoms::keepsake_types::{ArchiveMap, DayBucket, Event, EventPayload};
use chrono::{Local, NaiveDate};

/// Max chars of chat text carried into a day's rolling summary.
const SUMMARY_FRAGMENT_CHARS: usize = 50;

/// Date-keyed archive of decayed-out events.
#[derive(Debug, Clone, Default)]
pub struct ArchiveLayer {
    days: ArchiveMap,
}

impl ArchiveLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// File an event under its local calendar date.
    pub fn absorb(&mut self, event: Event) {
        let date = local_date(&event);
        let bucket = self.days.entry(date).or_default();

        if bucket.first_timestamp.is_none() {
            bucket.first_timestamp = Some(event.timestamp);
        }
        bucket.event_count += 1;

        if let EventPayload::Chat { who, text } = &event.payload {
            let snippet: String = text.chars().take(SUMMARY_FRAGMENT_CHARS).collect();
            let fragment = format!("{who}: {snippet}");
            if bucket.summary_fragments.insert(fragment.clone()) {
                bucket.rolling_summary.push_str(&fragment);
                bucket.rolling_summary.push_str("; ");
            }
        }

        bucket.raw_events.push(event);
    }

    /// The bucket for a given date, if any events were archived that day.
    pub fn for_date(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.get(&date)
    }

    /// The most recent `n` archived dates, newest first.
    pub fn recent_dates(&self, n: usize) -> Vec<NaiveDate> {
        self.days.keys().rev().take(n).copied().collect()
    }

    /// Number of days with archived events.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Snapshot access to the underlying map.
    pub fn days(&self) -> &ArchiveMap {
        &self.days
    }

    /// Replace the contents wholesale (snapshot restore).
    pub fn replace(&mut self, days: ArchiveMap) {
        self.days = days;
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }
}

/// The local calendar date an event occurred.
pub fn local_date(event: &Event) -> NaiveDate {
    event.timestamp.with_timezone(&Local).date_naive()
}
