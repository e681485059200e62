//! Shared integration test helpers for fontpeek.
//!
//! ```ignore
//! mod common;
//! use common::{MemoryRegistry, pump_until};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers is used per file.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::{Duration, Instant};

use fontpeek::controller::PreviewController;
use fontpeek::preview::Notifier;
use fontpeek_config::Config;
use fontpeek_fonts::{FaceSource, FontError, FontRegistry};
use parking_lot::Mutex;

/// Prefix marking a fake font file; the rest of the file is its family name.
pub const FAKE_FONT_MAGIC: &str = "FAKEFONT:";

/// In-memory `FontRegistry`.
///
/// "Font files" are text files starting with [`FAKE_FONT_MAGIC`]; anything
/// else is rejected as an invalid font. No family has face data, so every
/// preview block uses the plain label fallback. Face lookups record the
/// thread they ran on.
pub struct MemoryRegistry {
    families: Mutex<Vec<String>>,
    face_lookups: Mutex<Vec<ThreadId>>,
}

impl MemoryRegistry {
    pub fn new(families: &[&str]) -> Self {
        Self {
            families: Mutex::new(families.iter().map(|s| s.to_string()).collect()),
            face_lookups: Mutex::new(Vec::new()),
        }
    }

    /// Registry with `count` families named `Family 000`, `Family 001`, ...
    pub fn numbered(count: usize) -> Self {
        Self {
            families: Mutex::new((0..count).map(|i| format!("Family {i:03}")).collect()),
            face_lookups: Mutex::new(Vec::new()),
        }
    }

    /// Threads that asked for face data, one entry per lookup.
    pub fn face_lookup_threads(&self) -> Vec<ThreadId> {
        self.face_lookups.lock().clone()
    }
}

impl FontRegistry for MemoryRegistry {
    fn families(&self) -> Vec<String> {
        self.families.lock().clone()
    }

    fn register_font_file(&self, path: &Path) -> Result<Vec<String>, FontError> {
        let contents = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let family = contents
            .strip_prefix(FAKE_FONT_MAGIC)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| FontError::InvalidFont(path.to_path_buf()))?
            .to_string();

        let mut families = self.families.lock();
        if !families.contains(&family) {
            families.push(family.clone());
        }
        Ok(vec![family])
    }

    fn face_source(&self, _family: &str) -> Option<FaceSource> {
        self.face_lookups.lock().push(std::thread::current().id());
        None
    }
}

/// Write a fake font file for [`MemoryRegistry`].
pub fn write_fake_font(dir: &Path, file_name: &str, family: &str) {
    std::fs::write(dir.join(file_name), format!("{FAKE_FONT_MAGIC}{family}")).unwrap();
}

/// Config with fast chunking so tests do not wait on pauses.
pub fn fast_config() -> Config {
    Config {
        chunk_size: 4,
        chunk_pause_ms: 1,
        ..Config::default()
    }
}

pub fn no_notify() -> Notifier {
    Arc::new(|| {})
}

pub fn controller_with(config: &Config, registry: MemoryRegistry) -> PreviewController {
    PreviewController::new(config, Arc::new(registry), no_notify())
}

/// Poll `controller` until `done` holds, failing after ten seconds.
pub fn pump_until(controller: &mut PreviewController, done: impl Fn(&PreviewController) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        controller.poll();
        if done(controller) {
            return;
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting; state {:?}, {} block(s)",
            controller.state(),
            controller.panel().len()
        );
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Poll until the controller has nothing left to do.
pub fn pump_until_idle(controller: &mut PreviewController) {
    pump_until(controller, |c| c.is_idle());
}

pub fn names(blocks: &[fontpeek::panel::PreviewBlock]) -> Vec<String> {
    blocks.iter().map(|b| b.font_name.clone()).collect()
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
