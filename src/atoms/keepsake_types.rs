// ── Keepsake Atoms: Tiered Memory Types ────────────────────────────────────
//
// Type definitions for Keepsake — the companion's tiered event memory.
// These are pure data types (no logic, no I/O).
//
// Follows the project pattern: structs in atoms/, impls in engine/.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════════
// SECTION 1: Events
// ═══════════════════════════════════════════════════════════════════════════

/// Kind-specific event payload.
///
/// Known shapes get a closed variant; anything else travels through `Other`
/// as an opaque string map. The kind tag is an open enumeration: unknown
/// kinds are accepted, scored with a default, and rendered with a fallback
/// formatter — never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// A chat line from the user or the companion.
    Chat { who: String, text: String },
    /// A vision-snapshot summary, optionally with the capture path.
    Vision { summary: String, path: Option<String> },
    /// A foreground-app switch observed by the activity tracker.
    AppActivity {
        app: String,
        category: String,
        surprised: bool,
        curious: bool,
    },
    /// A position update.
    Location { x: f64, y: f64, z: f64 },
    /// Any other kind (`inventory`, `skill`, `preference`, or something new).
    Other {
        kind: String,
        fields: BTreeMap<String, String>,
    },
}

impl EventPayload {
    /// The wire tag for this payload (`"chat"`, `"vision"`, …).
    /// `Other` payloads report their own tag verbatim.
    pub fn kind(&self) -> &str {
        match self {
            Self::Chat { .. } => "chat",
            Self::Vision { .. } => "vision",
            Self::AppActivity { .. } => "app_activity",
            Self::Location { .. } => "location",
            Self::Other { kind, .. } => kind,
        }
    }

    /// Shape a chat payload.
    pub fn chat(text: impl Into<String>, who: impl Into<String>) -> Self {
        Self::Chat {
            who: who.into(),
            text: text.into(),
        }
    }

    /// Shape a vision payload.
    pub fn vision(summary: impl Into<String>, path: Option<String>) -> Self {
        Self::Vision {
            summary: summary.into(),
            path,
        }
    }

    /// Shape an app-activity payload. The `surprised` / `curious` flags come
    /// from the external anomaly tracker.
    pub fn app_activity(
        app: impl Into<String>,
        category: impl Into<String>,
        surprised: bool,
        curious: bool,
    ) -> Self {
        Self::AppActivity {
            app: app.into(),
            category: category.into(),
            surprised,
            curious,
        }
    }

    /// Shape an opaque payload for an arbitrary kind.
    pub fn other(kind: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self::Other {
            kind: kind.into(),
            fields,
        }
    }
}

/// A single observation ingested into memory. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque id, stable across layers.
    pub id: Uuid,
    pub payload: EventPayload,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Create an event stamped with the current wall clock.
    pub fn now(payload: EventPayload) -> Self {
        Self::at(payload, Utc::now())
    }

    /// Create an event with an explicit timestamp (replayed history,
    /// simulated age in tests).
    pub fn at(payload: EventPayload, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            timestamp,
        }
    }

    /// The event's kind tag.
    pub fn kind(&self) -> &str {
        self.payload.kind()
    }
}

/// An event promoted into the important layer, plus its importance score.
/// The score starts at the ingestion-time value and decays on every sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvent {
    pub event: Event,
    /// Current importance in [0, 1]. Mutated in place by the sweeper.
    pub importance: f32,
}

// ═══════════════════════════════════════════════════════════════════════════
// SECTION 2: Archive
// ═══════════════════════════════════════════════════════════════════════════

/// One calendar day of archived events.
///
/// Buckets accumulate for the process lifetime — archival is the release
/// valve for important-layer pressure, and the core never expires them
/// (long-term retention belongs to the caller).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Number of events archived into this day.
    pub event_count: u64,
    /// Timestamp of the first event archived into this day.
    pub first_timestamp: Option<DateTime<Utc>>,
    /// The archived events, in archival order.
    pub raw_events: Vec<Event>,
    /// Rolling `"{who}: {text}; "` digest of archived chat lines.
    pub rolling_summary: String,
    /// Exact fragments already present in `rolling_summary`. Guards the
    /// summary against repeating an identical chat line within one day.
    pub summary_fragments: BTreeSet<String>,
}

/// The archive tier: day buckets keyed by local calendar date.
pub type ArchiveMap = BTreeMap<NaiveDate, DayBucket>;

// ═══════════════════════════════════════════════════════════════════════════
// SECTION 3: Stats & snapshots
// ═══════════════════════════════════════════════════════════════════════════

/// Memory usage and density info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub recent_items: usize,
    pub important_items: usize,
    pub archive_days: usize,
    /// Total events ever ingested (monotonic counter).
    pub total_events: u64,
    /// Compression ratio: `important_items / (recent_items + 1)`.
    pub memory_ratio: f32,
}

/// A serializable capture of the whole store.
///
/// The core keeps no persistence of its own; callers that want memory to
/// survive a restart snapshot here and restore later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub recent: Vec<Event>,
    pub important: Vec<ScoredEvent>,
    pub archive: ArchiveMap,
    pub event_counter: u64,
    pub saved_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════════
// SECTION 4: Configuration
// ═══════════════════════════════════════════════════════════════════════════

/// Tuning knobs for the tiered store. Fixed for the store's lifetime —
/// validated once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeepsakeConfig {
    /// Max events held in the recent layer.
    pub recent_max: usize,
    /// Max events held in the important layer.
    pub important_max: usize,
    /// Scores strictly above this promote an event into the important layer.
    pub importance_threshold: f32,
    /// Run the decay/archival sweep every N ingested events.
    pub sweep_interval: u64,
    /// Importance halves every this many seconds of age.
    pub decay_half_life_secs: f32,
    /// Decayed entries at or below this floor leave the important layer.
    pub residual_floor: f32,
    /// Entries older than this are archived when they fall below the floor;
    /// younger ones are dropped outright.
    pub archive_after_secs: f32,
}

impl Default for KeepsakeConfig {
    fn default() -> Self {
        Self {
            recent_max: 20,
            important_max: 100,
            importance_threshold: 0.4,
            sweep_interval: 100,
            decay_half_life_secs: 3600.0,
            residual_floor: 0.1,
            archive_after_secs: 86_400.0,
        }
    }
}

impl KeepsakeConfig {
    /// Validate the configuration. Construction is the only place the store
    /// can fail; after this, every operation is infallible.
    pub fn validate(&self) -> Result<(), String> {
        if self.recent_max == 0 {
            return Err("recent_max must be at least 1".into());
        }
        if self.important_max == 0 {
            return Err("important_max must be at least 1".into());
        }
        if self.sweep_interval == 0 {
            return Err("sweep_interval must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.importance_threshold) {
            return Err("importance_threshold must be within [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.residual_floor) {
            return Err("residual_floor must be within [0, 1]".into());
        }
        if self.decay_half_life_secs.is_nan() || self.decay_half_life_secs <= 0.0 {
            return Err("decay_half_life_secs must be positive".into());
        }
        if self.archive_after_secs.is_nan() || self.archive_after_secs <= 0.0 {
            return Err("archive_after_secs must be positive".into());
        }
        Ok(())
    }
}
