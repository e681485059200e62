//! Font enumeration: installed families and folder scans.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::FontError;
use crate::registry::FontRegistry;

/// File extensions (lowercase, without the dot) considered font files.
///
/// TrueType, OpenType, their collection variants and legacy Windows bitmap
/// fonts. Bitmap `.fon` files are accepted by the scan but most registries
/// cannot parse them; they are then logged and skipped like any other bad file.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "ttc", "otf", "otc", "fon"];

/// Whether `path` has an extension from [`FONT_EXTENSIONS`] (case-insensitive).
pub fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// List the installed font families known to `registry`.
///
/// Fails closed: an empty registry is reported as a warning and yields an
/// empty list.
pub fn list_system_fonts(registry: &dyn FontRegistry) -> Vec<String> {
    let families = registry.families();
    if families.is_empty() {
        log::warn!("Font registry returned no families");
    } else {
        log::info!("Enumerated {} font families", families.len());
    }
    families
}

/// Register every font file in `dir` and return the families they provide.
///
/// Only the top level of `dir` is scanned, in file-name order. A file that
/// cannot be read or parsed is logged and skipped; the scan never aborts for
/// a single bad file. Families already returned by an earlier file in the
/// same scan are not repeated.
pub fn load_fonts_from_directory(
    registry: &dyn FontRegistry,
    dir: &Path,
) -> Result<Vec<String>, FontError> {
    if !dir.exists() {
        return Err(FontError::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(FontError::NotADirectory(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|source| FontError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_font_file(path))
        .collect();
    files.sort();

    log::info!(
        "Scanning {} font file(s) in {}",
        files.len(),
        dir.display()
    );

    let mut seen = HashSet::new();
    let mut families = Vec::new();
    for path in &files {
        match registry.register_font_file(path) {
            Ok(names) => {
                if names.is_empty() {
                    log::debug!("{} registered without a family name", path.display());
                }
                for name in names {
                    if seen.insert(name.clone()) {
                        families.push(name);
                    }
                }
            }
            Err(e) => {
                log::warn!("Skipping font file: {}", e);
            }
        }
    }

    log::info!(
        "Loaded {} famil{} from {}",
        families.len(),
        if families.len() == 1 { "y" } else { "ies" },
        dir.display()
    );
    Ok(families)
}
