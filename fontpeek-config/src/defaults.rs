//! Default value functions for configuration.
//!
//! Each function is used as a `#[serde(default = "crate::defaults::...")]`
//! attribute on a `Config` field and by `impl Default for Config`.

/// Smallest selectable preview size in points.
pub const MIN_FONT_SIZE: u32 = 6;

/// Largest selectable preview size in points.
pub const MAX_FONT_SIZE: u32 = 96;

// ── Preview ────────────────────────────────────────────────────────────────

pub fn sample_text() -> String {
    // Mixes a left-to-right and a right-to-left script
    "Hello مرحبا".to_string()
}

pub fn font_size() -> u32 {
    24
}

pub fn chunk_size() -> usize {
    10
}

pub fn chunk_pause_ms() -> u64 {
    15
}

pub fn spacer_height() -> f32 {
    20.0
}

pub fn name_label_size() -> f32 {
    12.0
}

pub fn render_cache_size() -> usize {
    512
}

// ── Window ─────────────────────────────────────────────────────────────────

pub fn window_title() -> String {
    "Font Previewer".to_string()
}

pub fn window_width() -> f32 {
    800.0
}

pub fn window_height() -> f32 {
    600.0
}

// ── Misc ───────────────────────────────────────────────────────────────────

pub fn log_file_name() -> &'static str {
    "fontpeek.log"
}

pub fn bool_true() -> bool {
    true
}

pub fn bool_false() -> bool {
    false
}
