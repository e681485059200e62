//! Background font list loading.
//!
//! System discovery and folder registration can take seconds on machines
//! with large font collections, so both run on a worker thread. A job sends
//! a single [`LoadOutcome`] back over an mpsc channel; the UI polls for it
//! once per frame.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use fontpeek_fonts::{FontError, FontRegistry, list_system_fonts, load_fonts_from_directory};

use crate::preview::Notifier;

/// What a load job should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// Rescan installed fonts and list every family
    System,
    /// Register every font file in a directory
    Folder(PathBuf),
}

impl LoadRequest {
    pub fn describe(&self) -> String {
        match self {
            LoadRequest::System => "system fonts".to_string(),
            LoadRequest::Folder(path) => format!("fonts from {}", path.display()),
        }
    }
}

/// Result of one load job.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub request: LoadRequest,
    pub result: Result<Vec<String>, FontError>,
}

/// Runs one font load job at a time.
///
/// Starting a new job supersedes the running one: its receiver is dropped and
/// its result, if it ever arrives, is discarded.
#[derive(Default)]
pub struct FontLoader {
    receiver: Option<Receiver<LoadOutcome>>,
    generation: u64,
}

impl FontLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.receiver.is_some()
    }

    /// Generation of the most recently started job.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start `request` on a background thread using `load_fn`.
    ///
    /// Returns the generation assigned to the job.
    pub fn start_with<F>(&mut self, request: LoadRequest, notify: Notifier, load_fn: F) -> u64
    where
        F: FnOnce(&LoadRequest) -> Result<Vec<String>, FontError> + Send + 'static,
    {
        self.generation += 1;
        let generation = self.generation;

        if self.receiver.take().is_some() {
            log::debug!("Superseding running font load job");
        }
        let (tx, rx) = mpsc::channel();
        self.receiver = Some(rx);

        log::info!("Loading {} (job {})", request.describe(), generation);
        std::thread::spawn(move || {
            let result = load_fn(&request);
            let _ = tx.send(LoadOutcome {
                generation,
                request,
                result,
            });
            notify();
        });
        generation
    }

    /// Start `request` against `registry`.
    ///
    /// Folder loads return either the folder's families (`replace_list`) or
    /// the whole registry listing after registration.
    pub fn start(
        &mut self,
        request: LoadRequest,
        registry: Arc<dyn FontRegistry>,
        replace_list: bool,
        notify: Notifier,
    ) -> u64 {
        self.start_with(request, notify, move |request| {
            run_load(request, registry.as_ref(), replace_list)
        })
    }

    /// Poll for completion of the running job.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(outcome) => {
                self.receiver = None;
                if outcome.generation != self.generation {
                    log::debug!("Dropping stale font load result {}", outcome.generation);
                    return None;
                }
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Font load job {} exited without a result", self.generation);
                self.receiver = None;
                None
            }
        }
    }
}

/// Execute a load request synchronously.
pub fn run_load(
    request: &LoadRequest,
    registry: &dyn FontRegistry,
    replace_list: bool,
) -> Result<Vec<String>, FontError> {
    match request {
        LoadRequest::System => {
            registry.load_system_fonts();
            Ok(list_system_fonts(registry))
        }
        LoadRequest::Folder(path) => {
            let added = load_fonts_from_directory(registry, path)?;
            log::info!(
                "Registered {} font family(ies) from {}",
                added.len(),
                path.display()
            );
            if replace_list {
                Ok(added)
            } else {
                Ok(list_system_fonts(registry))
            }
        }
    }
}
