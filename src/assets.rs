//! Optional toolbar icons.
//!
//! Icons are plain PNG files in the icons directory (`<config dir>/icons` or
//! `icons_dir` from the config). A missing or unreadable icon is not an
//! error: the caller shows a text-only button instead.

use std::path::{Path, PathBuf};

/// Loads icon images from one directory.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    icons_dir: PathBuf,
}

impl AssetLoader {
    pub fn new(icons_dir: impl Into<PathBuf>) -> Self {
        Self {
            icons_dir: icons_dir.into(),
        }
    }

    pub fn icons_dir(&self) -> &Path {
        &self.icons_dir
    }

    /// Load `<icons_dir>/<name>.png` as an egui image.
    ///
    /// Returns `None` (and logs a warning) when the file is missing or cannot be decoded.
    pub fn load_icon(&self, name: &str) -> Option<egui::ColorImage> {
        let path = self.icons_dir.join(format!("{name}.png"));
        if !path.exists() {
            log::warn!("Icon not found: {}", path.display());
            return None;
        }

        match image::open(&path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                Some(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
            }
            Err(e) => {
                log::warn!("Failed to load icon {}: {}", path.display(), e);
                None
            }
        }
    }
}
