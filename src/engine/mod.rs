// ── Keepsake Engine ────────────────────────────────────────────────────────
// Business logic over the atoms. The memory system lives in keepsake/.

pub mod keepsake;
