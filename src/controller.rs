//! Preview controller: owns the font lists, the background jobs and the
//! preview panel, and moves between `Idle`, `Loading` and `Populating`.
//!
//! Nothing here touches egui except through [`PreviewPanel::show`], so the
//! whole flow (load, filter, stream, cancel) is driven from tests by calling
//! [`PreviewController::poll`] in a loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fontpeek_config::Config;
use fontpeek_config::config::clamp_font_size;
use fontpeek_fonts::{FontError, FontRegistry};

use crate::filter::filter_fonts;
use crate::font_loader::{FontLoader, LoadOutcome, LoadRequest};
use crate::panel::PreviewPanel;
use crate::preview::{CancelToken, Notifier, PreviewEvent, PreviewProducer, PreviewWorker};

/// Preview events handled per frame; the rest wait for the next poll.
const PREVIEW_EVENTS_PER_POLL: usize = 64;

/// Coarse UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    /// A font load job is running
    Loading,
    /// Preview blocks are being streamed in
    Populating,
}

impl PanelState {
    pub fn display_name(&self) -> &'static str {
        match self {
            PanelState::Idle => "Ready",
            PanelState::Loading => "Loading fonts...",
            PanelState::Populating => "Updating previews...",
        }
    }
}

pub struct PreviewController {
    registry: Arc<dyn FontRegistry>,
    notify: Notifier,
    loader: FontLoader,
    /// Load requested while another load was running
    queued_load: Option<LoadRequest>,
    panel: PreviewPanel,

    all_fonts: Vec<String>,
    /// `None` while the search query is empty
    filtered_fonts: Option<Vec<String>>,
    query: String,

    sample_text: String,
    font_size: u32,
    chunk_size: usize,
    chunk_pause: Duration,
    replace_list_on_folder_load: bool,

    worker: Option<PreviewWorker>,
    preview_generation: u64,
    /// A new pass was requested while the old worker was still running
    pending_update: bool,
    /// Error waiting to be shown to the user
    error: Option<String>,
}

impl PreviewController {
    pub fn new(config: &Config, registry: Arc<dyn FontRegistry>, notify: Notifier) -> Self {
        Self {
            registry,
            notify,
            loader: FontLoader::new(),
            queued_load: None,
            panel: PreviewPanel::new(config),
            all_fonts: Vec::new(),
            filtered_fonts: None,
            query: String::new(),
            sample_text: config.sample_text.clone(),
            font_size: clamp_font_size(config.font_size),
            chunk_size: config.chunk_size,
            chunk_pause: config.chunk_pause(),
            replace_list_on_folder_load: config.replace_list_on_folder_load,
            worker: None,
            preview_generation: 0,
            pending_update: false,
            error: None,
        }
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn state(&self) -> PanelState {
        if self.loader.is_loading() {
            return PanelState::Loading;
        }
        match &self.worker {
            Some(worker) if !worker.is_cancelled() || self.pending_update => {
                PanelState::Populating
            }
            _ => PanelState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == PanelState::Idle && self.queued_load.is_none()
    }

    /// Every family from the most recent successful load.
    pub fn all_fonts(&self) -> &[String] {
        &self.all_fonts
    }

    /// Families currently shown: the filtered list, or all of them.
    pub fn visible_fonts(&self) -> &[String] {
        self.filtered_fonts.as_deref().unwrap_or(&self.all_fonts)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sample_text(&self) -> &str {
        &self.sample_text
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn preview_generation(&self) -> u64 {
        self.preview_generation
    }

    pub fn panel(&self) -> &PreviewPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PreviewPanel {
        &mut self.panel
    }

    /// One-line summary for the status bar.
    pub fn status_line(&self) -> String {
        let (done, total) = self.panel.progress();
        let mut line = format!(
            "{} of {} fonts | {}",
            self.visible_fonts().len(),
            self.all_fonts.len(),
            self.state().display_name()
        );
        if self.state() == PanelState::Populating {
            line.push_str(&format!(" {}/{}", done, total));
        }
        line
    }

    /// Take the error waiting to be shown, if any.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    // ========================================================================
    // User input
    // ========================================================================

    /// Set the sample text used by the next preview pass.
    pub fn set_sample_text(&mut self, text: impl Into<String>) {
        self.sample_text = text.into();
    }

    /// Set the preview size (clamped to the supported range) used by the next pass.
    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = clamp_font_size(size);
    }

    /// Change the search query and rebuild the previews if it changed.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.refilter();
        log::debug!(
            "Search '{}' matches {} of {} fonts",
            self.query,
            self.visible_fonts().len(),
            self.all_fonts.len()
        );
        self.request_update();
    }

    pub fn load_system_fonts(&mut self) {
        self.load(LoadRequest::System);
    }

    pub fn load_folder(&mut self, path: impl Into<PathBuf>) {
        self.load(LoadRequest::Folder(path.into()));
    }

    /// Start a load job, or queue it behind the running one.
    ///
    /// Only the latest queued request is kept.
    pub fn load(&mut self, request: LoadRequest) {
        if self.loader.is_loading() {
            log::debug!("Queueing load of {}", request.describe());
            self.queued_load = Some(request);
            return;
        }
        self.loader.start(
            request,
            Arc::clone(&self.registry),
            self.replace_list_on_folder_load,
            Arc::clone(&self.notify),
        );
    }

    /// Rebuild every preview block from the visible list.
    ///
    /// If a pass is running it is cancelled first; the new one starts once
    /// the old worker has reported `Finished`.
    pub fn request_update(&mut self) {
        if let Some(worker) = &self.worker {
            worker.cancel();
            self.pending_update = true;
            log::debug!(
                "Preview pass {} cancelled, restart pending",
                worker.generation()
            );
            return;
        }
        self.start_update();
    }

    /// Stop the running pass. Blocks already built stay visible.
    pub fn cancel(&mut self) {
        self.pending_update = false;
        if let Some(worker) = &self.worker {
            log::info!("Preview update cancelled by user");
            worker.cancel();
        }
    }

    // ========================================================================
    // Event processing
    // ========================================================================

    /// Handle finished load jobs and pending preview events.
    ///
    /// Returns true when anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        if let Some(outcome) = self.loader.poll() {
            self.handle_load_outcome(outcome);
            if let Some(request) = self.queued_load.take() {
                self.load(request);
            }
            changed = true;
        }

        let events = match &self.worker {
            Some(worker) => worker.drain(PREVIEW_EVENTS_PER_POLL),
            None => return changed,
        };
        for event in events {
            changed |= self.handle_preview_event(event);
        }
        changed
    }

    fn handle_load_outcome(&mut self, outcome: LoadOutcome) {
        match outcome.result {
            Ok(fonts) => {
                log::info!(
                    "Loaded {} font families ({})",
                    fonts.len(),
                    outcome.request.describe()
                );
                self.all_fonts = fonts;
                self.refilter();
                self.request_update();
            }
            Err(e) => {
                // The previous list stays in place
                log::error!("Failed to load {}: {}", outcome.request.describe(), e);
                self.error = Some(user_message(&e));
            }
        }
    }

    fn handle_preview_event(&mut self, event: PreviewEvent) -> bool {
        if event.generation() != self.preview_generation {
            log::trace!("Dropping preview event from pass {}", event.generation());
            return false;
        }

        match event {
            PreviewEvent::Item { item, image, .. } => {
                let cancelled = self.worker.as_ref().is_none_or(|w| w.is_cancelled());
                if cancelled {
                    return false;
                }
                self.panel.render(&item, image);
                true
            }
            PreviewEvent::Finished {
                produced,
                cancelled,
                ..
            } => {
                log::info!(
                    "Preview pass {} finished: {} block(s){}",
                    self.preview_generation,
                    produced,
                    if cancelled { " (cancelled)" } else { "" }
                );
                self.worker = None;
                if std::mem::take(&mut self.pending_update) {
                    self.start_update();
                }
                true
            }
        }
    }

    fn refilter(&mut self) {
        self.filtered_fonts = if self.query.is_empty() {
            None
        } else {
            Some(filter_fonts(&self.all_fonts, &self.query))
        };
    }

    fn start_update(&mut self) {
        let fonts: Arc<[String]> = self.visible_fonts().into();
        let sample_text = if self.sample_text.is_empty() {
            fontpeek_config::defaults::sample_text()
        } else {
            self.sample_text.clone()
        };

        self.preview_generation += 1;
        self.panel.clear(fonts.len());
        log::info!(
            "Starting preview pass {} for {} font(s)",
            self.preview_generation,
            fonts.len()
        );

        let producer = PreviewProducer::new(
            fonts,
            sample_text,
            self.chunk_size,
            self.chunk_pause,
            CancelToken::new(),
        );
        let renderer = self
            .panel
            .block_renderer(Arc::clone(&self.registry), self.font_size);
        match PreviewWorker::spawn(
            producer,
            renderer,
            self.preview_generation,
            Arc::clone(&self.notify),
        ) {
            Ok(worker) => self.worker = Some(worker),
            Err(e) => {
                log::error!("Failed to start preview worker: {}", e);
                self.error = Some(format!("Could not update previews: {}", e));
            }
        }
    }
}

/// Text for the error dialog.
fn user_message(error: &FontError) -> String {
    match error {
        FontError::DirectoryNotFound(path) => {
            format!("The folder {} does not exist.", path.display())
        }
        FontError::NotADirectory(path) => format!("{} is not a folder.", path.display()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display_names() {
        assert_eq!(PanelState::Idle.display_name(), "Ready");
        assert_eq!(PanelState::Loading.display_name(), "Loading fonts...");
        assert_eq!(PanelState::Populating.display_name(), "Updating previews...");
    }

    #[test]
    fn test_user_message_for_missing_folder() {
        let message = user_message(&FontError::DirectoryNotFound(PathBuf::from("/nope")));
        assert!(message.contains("/nope"));
        assert!(message.contains("does not exist"));
    }
}
