//! Named constants for UI layout dimensions.
//!
//! Only UI layout constants (dimensions, sizes, spacing) belong here.
//! Preview defaults that users can change live in `fontpeek-config`.

// ---------------------------------------------------------------------------
// Toolbar  (src/app.rs)
// ---------------------------------------------------------------------------

/// Width of the sample text input.
pub const SAMPLE_TEXT_INPUT_WIDTH: f32 = 260.0;
/// Width of the search input.
pub const SEARCH_INPUT_WIDTH: f32 = 200.0;
/// Edge length of toolbar button icons.
pub const TOOLBAR_ICON_SIZE: f32 = 16.0;
/// Spacing between toolbar rows.
pub const TOOLBAR_ROW_SPACING: f32 = 4.0;

// ---------------------------------------------------------------------------
// Progress window  (src/app.rs)
// ---------------------------------------------------------------------------

/// Fixed width of the "Updating previews..." window.
pub const PROGRESS_WINDOW_WIDTH: f32 = 320.0;
/// Width of the progress bar inside the progress window.
pub const PROGRESS_BAR_WIDTH: f32 = 300.0;

// ---------------------------------------------------------------------------
// Preview list  (src/panel.rs)
// ---------------------------------------------------------------------------

/// Gap between the family label and the sample.
pub const PREVIEW_LABEL_GAP: f32 = 2.0;
