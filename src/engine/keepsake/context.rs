// ── Keepsake: Context Summary ──────────────────────────────────────────────
//
// Renders the store into a bounded, line-based digest for prompt assembly:
//
//   === RECENT (last events) ===       last 5 events, chronological
//   === IMPORTANT (remembered facts) ===  top 5 by current importance
//   === ARCHIVE (past sessions) ===    last 3 archived dates, count only
//
// Sections with no data are omitted entirely. The whole digest is truncated
// to `max_lines` lines, blank separators included. Read-only and
// deterministic for a given store state; partial or odd payloads render with
// fallbacks rather than failing — this string goes straight into an LLM
// prompt and must always be available.

use crate::atoms::keepsake_types::{Event, EventPayload};
use crate::engine::keepsake::archive::ArchiveLayer;
use crate::engine::keepsake::important::ImportantLayer;
use crate::engine::keepsake::recent::RecentBuffer;

/// Default digest height, matching the prompt template's reserved block.
pub const DEFAULT_SUMMARY_LINES: usize = 15;

/// Recent events shown in the digest.
const RECENT_SHOWN: usize = 5;

/// Important entries shown in the digest.
const IMPORTANT_SHOWN: usize = 5;

/// Archived dates referenced in the digest.
const ARCHIVE_DATES_SHOWN: usize = 3;

/// Max chars of chat text / vision summary per line.
const TEXT_CHARS: usize = 80;

/// Max chars of stringified opaque payload per line.
const OPAQUE_CHARS: usize = 60;

/// Build the digest across all three tiers.
pub fn build_summary(
    recent: &RecentBuffer,
    important: &ImportantLayer,
    archive: &ArchiveLayer,
    max_lines: usize,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !recent.is_empty() {
        lines.push("=== RECENT (last events) ===".into());
        for event in recent.recent(RECENT_SHOWN) {
            lines.push(format_event(event));
        }
    }

    if !important.is_empty() {
        lines.push(String::new());
        lines.push("=== IMPORTANT (remembered facts) ===".into());
        for entry in important.ranked(IMPORTANT_SHOWN) {
            lines.push(format_event(&entry.event));
        }
    }

    if !archive.is_empty() {
        lines.push(String::new());
        lines.push("=== ARCHIVE (past sessions) ===".into());
        for date in archive.recent_dates(ARCHIVE_DATES_SHOWN) {
            let count = archive
                .for_date(date)
                .map(|bucket| bucket.event_count)
                .unwrap_or(0);
            lines.push(format!("[{date}] {count} events"));
        }
    }

    lines.truncate(max_lines);
    lines.join("\n")
}

/// Format a single event for display. One line, no score shown.
pub fn format_event(event: &Event) -> String {
    match &event.payload {
        EventPayload::Chat { who, text } => {
            format!("{}: {}", who, truncate_chars(text, TEXT_CHARS))
        }
        EventPayload::Vision { summary, .. } => {
            format!("[vision] {}", truncate_chars(summary, TEXT_CHARS))
        }
        EventPayload::AppActivity { app, category, .. } => {
            format!("[using] {app} ({category})")
        }
        EventPayload::Location { x, y, z } => format!("[at] {x}, {y}, {z}"),
        EventPayload::Other { kind, fields } => {
            let rendered = serde_json::to_string(fields).unwrap_or_default();
            format!("[{}] {}", kind, truncate_chars(&rendered, OPAQUE_CHARS))
        }
    }
}

/// Char-boundary-safe prefix truncation.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
