// ── Keepsake: Recent Buffer ────────────────────────────────────────────────
//
// Tier 0 of the three-tier memory:
//   Recent Buffer (minutes) → Important Layer (hours) → Archive (days+)
//
// A bounded, in-memory ring buffer holding the newest raw events. It is the
// true tail of the stream: every ingested event lands here regardless of its
// importance score, and only capacity pushes anything out.
//
// Key properties:
//   - Pure in-memory, O(1) push
//   - Oldest entry evicted on overflow, returned to the caller
//   - No importance tracking — that's the important layer's job
//
// Thread-safety: NOT internally synchronized. The caller (usually behind an
// Arc<Mutex<_>> around the whole store) must handle locking.

use crate::atoms::keepsake_types::Event;
use std::collections::VecDeque;

/// Bounded FIFO of the most recent events.
#[derive(Debug, Clone)]
pub struct RecentBuffer {
    entries: VecDeque<Event>,
    capacity: usize,
}

impl RecentBuffer {
    /// Create a buffer holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new event. If the buffer is full, the oldest entry is evicted
    /// first and returned.
    pub fn push(&mut self, event: Event) -> Option<Event> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(event);
        evicted
    }

    /// All entries in chronological order (oldest first).
    pub fn entries(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter()
    }

    /// The most recent `n` entries, chronological, most-recent last.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Event> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the contents wholesale (snapshot restore). Anything beyond
    /// capacity is discarded from the front, oldest first.
    pub fn replace(&mut self, events: Vec<Event>) {
        self.entries = events.into();
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
