// ── Keepsake: Importance Scoring ───────────────────────────────────────────
//
// Pure scoring of an event's importance in [0, 1]: a per-kind base score
// plus kind-specific content boosts. Deterministic — no clock, no I/O, no
// randomness — so the same payload always scores the same.
//
// The ingestor promotes an event into the important layer when its score
// is strictly above the configured threshold.

use crate::atoms::keepsake_types::EventPayload;

// ═══════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════

/// Words that mark a chat line as emphatic (case-insensitive substring match).
const EMPHATIC_WORDS: [&str; 10] = [
    "remember",
    "important",
    "forever",
    "always",
    "never",
    "hate",
    "love",
    "favorite",
    "rule",
    "must",
];

/// Vision summaries mentioning these get a boost (case-insensitive).
const VISION_SIGNAL_WORDS: [&str; 5] = ["item", "change", "new", "danger", "threat"];

/// Base score for kinds not in the table.
const DEFAULT_BASE_SCORE: f32 = 0.4;

// ═══════════════════════════════════════════════════════════════════════════
// Scoring
// ═══════════════════════════════════════════════════════════════════════════

/// Score an event's importance, 0.0–1.0.
pub fn score(payload: &EventPayload) -> f32 {
    let mut score = base_score(payload.kind());

    match payload {
        EventPayload::Chat { text, .. } => score += chat_boost(text),
        EventPayload::Vision { summary, .. } => score += vision_boost(summary),
        _ => {}
    }

    score.min(1.0)
}

/// Per-kind base score. Unknown kinds fall back to the default.
fn base_score(kind: &str) -> f32 {
    match kind {
        "chat" => 0.9,
        "preference" => 0.9,
        "skill" => 0.8,
        "vision" => 0.6,
        "location" => 0.5,
        "inventory" => 0.4,
        "app_activity" => 0.3,
        _ => DEFAULT_BASE_SCORE,
    }
}

/// Content boosts for chat lines. Each trigger is independent and additive.
fn chat_boost(text: &str) -> f32 {
    let mut boost = 0.0;
    let lowered = text.to_lowercase();

    // Emphatic keywords ("remember", "always", "favorite", …)
    if EMPHATIC_WORDS.iter().any(|w| lowered.contains(w)) {
        boost += 0.2;
    }

    // Capitalized words longer than two chars are usually names
    if text
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .any(|w| w.chars().next().is_some_and(char::is_uppercase))
    {
        boost += 0.15;
    }

    // Numbers: coordinates, counts, dates
    if text.chars().any(|c| c.is_ascii_digit()) {
        boost += 0.1;
    }

    // Questions matter
    if text.contains('?') {
        boost += 0.15;
    }

    boost
}

/// Content boost for vision summaries that mention items or changes.
fn vision_boost(summary: &str) -> f32 {
    let lowered = summary.to_lowercase();
    if VISION_SIGNAL_WORDS.iter().any(|w| lowered.contains(w)) {
        0.2
    } else {
        0.0
    }
}
