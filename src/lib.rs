// ── OpenPawz Keepsake ──────────────────────────────────────────────────────
//
// Tiered event memory for an AI desktop companion.
//
// The companion's shell (sprite GUI, window polling, speech, LLM client)
// produces a continuous stream of heterogeneous events — chat lines, vision
// summaries, app switches. Keepsake is the piece that decides what to keep
// at full fidelity, what to compress, and what to forget, under strict size
// bounds and without operator intervention:
//
//   Recent Buffer    bounded FIFO, the true tail of the stream
//   Important Layer  events promoted by importance score, decaying over time
//   Archive          day buckets of old-but-once-important context
//
// The single integration point for generation is
// `TieredMemory::get_context_summary`, a bounded digest spliced into the
// downstream LLM prompt.
//
// Layout follows the project pattern: pure data types in `atoms/`, logic in
// `engine/`.

pub mod atoms;
pub mod engine;

pub use atoms::error::{KeepsakeError, KeepsakeResult};
pub use atoms::keepsake_types::{
    ArchiveMap, DayBucket, Event, EventPayload, KeepsakeConfig, MemorySnapshot, MemoryStats,
    ScoredEvent,
};
pub use engine::keepsake::sweep::SweepReport;
pub use engine::keepsake::{SharedTieredMemory, TieredMemory, DEFAULT_SUMMARY_LINES};
