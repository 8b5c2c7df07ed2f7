// ── Keepsake Atoms: Error Types ────────────────────────────────────────────
// Single canonical error enum for the memory core, built with `thiserror`.
//
// Design rules:
//   • The store is designed to never fail during normal operation: malformed
//     payloads degrade to default-rendered output, unknown kinds get default
//     scores. The only hard failure is construction-time misconfiguration.
//   • No variant carries event content in its message.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum KeepsakeError {
    /// Store configuration is invalid (non-positive capacity, threshold out
    /// of range, …). Raised at construction time only.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization / deserialization failure (snapshot helpers).
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used across the engine.
pub type KeepsakeResult<T> = Result<T, KeepsakeError>;
