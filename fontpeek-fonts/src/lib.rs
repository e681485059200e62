//! Font discovery, registration and text rendering for fontpeek.
//!
//! This crate provides:
//! - Host font registry access with system font discovery (fontdb)
//! - Folder scanning with an extension allow-list and per-file registration
//! - A coarse right-to-left detector and direction run splitting
//! - HarfBuzz-based text shaping via rustybuzz
//! - Glyph rasterization via swash into a single preview image
//!
//! # Architecture
//!
//! The `FontRegistry` trait is the seam to the host font system. The
//! production `SystemFontRegistry` wraps a shared `fontdb::Database`; tests
//! substitute an in-memory registry. `PreviewRenderer` pulls face bytes from
//! a registry, shapes each direction run with `TextShaper` and composites the
//! rasterized glyphs into a `RenderedText`.

pub mod direction;
pub mod enumerator;
pub mod error;
pub mod rasterizer;
pub mod registry;
pub mod text_shaper;

// Re-export main types for convenience
pub use direction::{DirectionRun, TextDirection, detect_direction, is_arabic, split_direction_runs};
pub use enumerator::{FONT_EXTENSIONS, is_font_file, list_system_fonts, load_fonts_from_directory};
pub use error::FontError;
pub use rasterizer::{PreviewRenderer, RenderedText};
pub use registry::{FaceSource, FontRegistry, SystemFontRegistry};
pub use text_shaper::{ShapedGlyph, ShapedRun, ShapingOptions, TextShaper};
