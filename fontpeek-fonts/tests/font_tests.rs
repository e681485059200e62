//! Integration tests for fontpeek-fonts crate.

use std::path::Path;
use std::sync::OnceLock;

use fontpeek_fonts::{
    FontError, FontRegistry, PreviewRenderer, ShapingOptions, SystemFontRegistry, TextDirection,
    TextShaper, list_system_fonts, load_fonts_from_directory,
};
use parking_lot::Mutex;

/// Bundled DejaVu Sans (covers Latin and Arabic) for testing.
const TEST_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

/// Records every log line so tests can count warnings about specific files.
struct CaptureLogger {
    lines: Mutex<Vec<(log::Level, String)>>,
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.lines
            .lock()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn capture_logger() -> &'static CaptureLogger {
    static LOGGER: OnceLock<CaptureLogger> = OnceLock::new();
    let logger = LOGGER.get_or_init(|| CaptureLogger {
        lines: Mutex::new(Vec::new()),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
    logger
}

fn warnings_mentioning(needle: &str) -> usize {
    capture_logger()
        .lines
        .lock()
        .iter()
        .filter(|(level, msg)| *level == log::Level::Warn && msg.contains(needle))
        .count()
}

fn registry_with_test_font(dir: &Path) -> SystemFontRegistry {
    std::fs::write(dir.join("DejaVuSans.ttf"), TEST_FONT).unwrap();
    let registry = SystemFontRegistry::new();
    load_fonts_from_directory(&registry, dir).unwrap();
    registry
}

#[test]
fn test_valid_and_corrupt_file_mix() {
    capture_logger();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DejaVuSans.ttf"), TEST_FONT).unwrap();
    std::fs::write(dir.path().join("mix-corrupt.ttf"), b"definitely not a font").unwrap();

    let registry = SystemFontRegistry::new();
    let families = load_fonts_from_directory(&registry, dir.path()).unwrap();

    assert_eq!(families, vec!["DejaVu Sans".to_string()]);
    assert_eq!(warnings_mentioning("mix-corrupt.ttf"), 1);
}

#[test]
fn test_missing_directory_is_reported() {
    let registry = SystemFontRegistry::new();
    let err = load_fonts_from_directory(&registry, Path::new("/no/such/fontpeek/dir")).unwrap_err();
    assert!(matches!(err, FontError::DirectoryNotFound(_)));
    assert!(registry.families().is_empty());
}

#[test]
fn test_file_path_is_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("plain.ttf");
    std::fs::write(&file, TEST_FONT).unwrap();

    let registry = SystemFontRegistry::new();
    let err = load_fonts_from_directory(&registry, &file).unwrap_err();
    assert!(matches!(err, FontError::NotADirectory(_)));
}

#[test]
fn test_non_font_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), TEST_FONT).unwrap();
    std::fs::create_dir(dir.path().join("nested.ttf")).unwrap();

    let registry = SystemFontRegistry::new();
    let families = load_fonts_from_directory(&registry, dir.path()).unwrap();
    assert!(families.is_empty());
    assert_eq!(registry.face_count(), 0);
}

#[test]
fn test_uppercase_extension_is_scanned() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("UPPER.TTF"), TEST_FONT).unwrap();

    let registry = SystemFontRegistry::new();
    let families = load_fonts_from_directory(&registry, dir.path()).unwrap();
    assert_eq!(families, vec!["DejaVu Sans".to_string()]);
}

#[test]
fn test_duplicate_family_is_listed_once() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.ttf"), TEST_FONT).unwrap();
    std::fs::write(dir.path().join("b.ttf"), TEST_FONT).unwrap();

    let registry = SystemFontRegistry::new();
    let families = load_fonts_from_directory(&registry, dir.path()).unwrap();
    assert_eq!(families.len(), 1);
    assert_eq!(list_system_fonts(&registry), families);
}

#[test]
fn test_registered_family_has_face_source() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_test_font(dir.path());

    let face = registry.face_source("DejaVu Sans").expect("face data");
    assert_eq!(face.index, 0);
    assert_eq!(face.data.len(), TEST_FONT.len());
}

#[test]
fn test_shaping_arabic_produces_glyphs() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_test_font(dir.path());
    let face = registry.face_source("DejaVu Sans").unwrap();

    let mut shaper = TextShaper::new();
    let run = shaper.shape_text("مرحبا", &face, "DejaVu Sans", &ShapingOptions::arabic());
    assert!(!run.is_empty());
    assert_eq!(run.missing_glyphs, 0);
    assert!(run.total_advance > 0.0);
}

#[test]
fn test_renderer_draws_mixed_sample() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_test_font(dir.path());

    let mut renderer = PreviewRenderer::new(16);
    let rendered = renderer
        .render(&registry, "DejaVu Sans", "Hello مرحبا", 24.0)
        .expect("rendered preview");

    assert_eq!(rendered.direction, TextDirection::RightToLeft);
    assert_eq!(
        rendered.pixels.len(),
        (rendered.width * rendered.height * 4) as usize
    );
    assert!(rendered.pixels.chunks_exact(4).any(|px| px[3] > 0));

    // Second call is served from cache
    renderer.render(&registry, "DejaVu Sans", "Hello مرحبا", 24.0);
    assert_eq!(renderer.cached_entries(), 1);
}

#[test]
fn test_larger_size_renders_taller_image() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_test_font(dir.path());

    let mut renderer = PreviewRenderer::new(16);
    let small = renderer.render(&registry, "DejaVu Sans", "Hello", 12.0).unwrap();
    let large = renderer.render(&registry, "DejaVu Sans", "Hello", 48.0).unwrap();
    assert!(large.height > small.height);
    assert!(large.width > small.width);
}

/// Which columns of `rendered` contain any ink.
fn inked_columns(rendered: &fontpeek_fonts::RenderedText) -> Vec<bool> {
    let width = rendered.width as usize;
    let mut columns = vec![false; width];
    for (i, px) in rendered.pixels.chunks_exact(4).enumerate() {
        if px[3] > 0 {
            columns[i % width] = true;
        }
    }
    columns
}

#[test]
fn test_mixed_sample_keeps_word_space_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_test_font(dir.path());
    let size = 24.0;

    let mut renderer = PreviewRenderer::new(16);
    let rendered = renderer
        .render(&registry, "DejaVu Sans", "Hello مرحبا", size)
        .expect("rendered preview");
    let columns = inked_columns(&rendered);

    let first = columns.iter().position(|&ink| ink).expect("ink");
    let last = columns.iter().rposition(|&ink| ink).expect("ink");
    let right_margin = columns.len() - 1 - last;

    let mut widest_gap = 0;
    let mut gap = 0;
    for &ink in &columns[first..=last] {
        if ink {
            widest_gap = widest_gap.max(gap);
            gap = 0;
        } else {
            gap += 1;
        }
    }

    // DejaVu's space advance is about 0.32 em
    let space_px = (size * 0.3) as usize;
    assert!(
        widest_gap >= space_px,
        "words touch: widest gap {widest_gap}px, expected at least {space_px}px"
    );
    // Only the canvas padding plus a glyph side bearing remain on the right
    assert!(
        right_margin <= 6,
        "space was pushed to the right edge: margin {right_margin}px"
    );
}
