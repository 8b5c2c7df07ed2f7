// ── Keepsake Atoms ─────────────────────────────────────────────────────────
// Pure data types and errors. No logic, no I/O — impls live in engine/.

pub mod error;
pub mod keepsake_types;
