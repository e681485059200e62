//! Host font registry access.
//!
//! The registry is the only component that talks to fontdb. It is shared
//! between the UI thread (face lookups while rendering previews) and the
//! background load jobs (system discovery, folder registration), so the
//! database lives behind an `Arc<RwLock<..>>`.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family, ID, Query, Source};
use parking_lot::RwLock;

use crate::error::FontError;

/// Raw bytes of a single face plus its index inside the file.
///
/// The index matters for TrueType/OpenType collections where several faces
/// share one file.
#[derive(Clone)]
pub struct FaceSource {
    /// Raw font data bytes (TTF/OTF/TTC)
    pub data: Arc<Vec<u8>>,
    /// Face index within `data`
    pub index: u32,
}

impl std::fmt::Debug for FaceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceSource")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Seam to the host font system.
pub trait FontRegistry: Send + Sync {
    /// Every family name currently known, in enumeration order, without duplicates.
    fn families(&self) -> Vec<String>;

    /// Register one font file and return the family names it contributed.
    fn register_font_file(&self, path: &Path) -> Result<Vec<String>, FontError>;

    /// Bytes of the regular face of `family`, if the family is known.
    fn face_source(&self, family: &str) -> Option<FaceSource>;

    /// Scan the installed fonts again. Registries without a host system do nothing.
    fn load_system_fonts(&self) {}
}

/// `FontRegistry` backed by a shared `fontdb::Database`.
#[derive(Clone, Default)]
pub struct SystemFontRegistry {
    db: Arc<RwLock<Database>>,
}

impl SystemFontRegistry {
    /// Create an empty registry (no system fonts loaded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and populate it with the installed system fonts.
    pub fn with_system_fonts() -> Self {
        let registry = Self::new();
        registry.load_system_fonts();
        registry
    }

    /// Number of faces (not families) in the database.
    pub fn face_count(&self) -> usize {
        self.db.read().len()
    }

    fn family_names_for(db: &Database, ids: &[ID]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for id in ids {
            if let Some(face) = db.face(*id)
                && let Some((name, _)) = face.families.first()
                && seen.insert(name.clone())
            {
                names.push(name.clone());
            }
        }
        names
    }
}

impl FontRegistry for SystemFontRegistry {
    /// Rescan the platform font directories.
    ///
    /// Scanning happens outside the lock. Faces registered from folders are
    /// carried over into the new database.
    fn load_system_fonts(&self) {
        let mut fresh = Database::new();
        fresh.load_system_fonts();
        let system_faces = fresh.len();

        let mut db = self.db.write();
        for face in db.faces() {
            if matches!(face.source, Source::Binary(_)) {
                fresh.push_face_info(face.clone());
            }
        }
        *db = fresh;
        log::info!(
            "Loaded {} system font faces ({} total)",
            system_faces,
            db.len()
        );
    }

    fn families(&self) -> Vec<String> {
        let db = self.db.read();
        let mut seen = HashSet::new();
        db.faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    fn register_font_file(&self, path: &Path) -> Result<Vec<String>, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut db = self.db.write();
        let ids = db.load_font_source(Source::Binary(Arc::new(data)));
        if ids.is_empty() {
            return Err(FontError::InvalidFont(path.to_path_buf()));
        }

        let ids: Vec<ID> = ids.iter().copied().collect();
        let names = Self::family_names_for(&db, &ids);
        log::debug!(
            "Registered {} face(s) from {}: {:?}",
            ids.len(),
            path.display(),
            names
        );
        Ok(names)
    }

    fn face_source(&self, family: &str) -> Option<FaceSource> {
        let db = self.db.read();
        let id = db.query(&Query {
            families: &[Family::Name(family)],
            ..Query::default()
        })?;
        db.with_face_data(id, |data, index| FaceSource {
            data: Arc::new(data.to_vec()),
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_has_no_families() {
        let registry = SystemFontRegistry::new();
        assert_eq!(registry.face_count(), 0);
        assert!(registry.families().is_empty());
        assert!(registry.face_source("Anything").is_none());
    }

    #[test]
    fn test_register_missing_file_is_io_error() {
        let registry = SystemFontRegistry::new();
        let err = registry
            .register_font_file(Path::new("/definitely/not/here.ttf"))
            .unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }

    #[test]
    fn test_face_source_debug_hides_bytes() {
        let source = FaceSource {
            data: Arc::new(vec![0u8; 16]),
            index: 2,
        };
        let debug = format!("{:?}", source);
        assert!(debug.contains("data_len: 16"));
        assert!(debug.contains("index: 2"));
    }
}
