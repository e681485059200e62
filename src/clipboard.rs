use arboard::Clipboard;

/// System clipboard access for the "Copy font name" action.
///
/// The clipboard may be unavailable (headless session, no display server);
/// copies then fail with a logged warning and nothing is shown to the user.
pub struct ClipboardAccess {
    clipboard: Option<Clipboard>,
}

impl ClipboardAccess {
    pub fn new() -> Self {
        let clipboard = Clipboard::new().ok();
        if clipboard.is_none() {
            log::warn!("Failed to initialize clipboard support");
        }
        Self { clipboard }
    }

    /// Copy text to clipboard
    pub fn copy_to_clipboard(&mut self, text: &str) -> Result<(), String> {
        if let Some(ref mut clipboard) = self.clipboard {
            clipboard
                .set_text(text.to_string())
                .map_err(|e| format!("Failed to set clipboard text: {}", e))
        } else {
            Err("Clipboard not available".to_string())
        }
    }

    /// Copy a family name, logging the outcome.
    pub fn copy_font_name(&mut self, font_name: &str) {
        match self.copy_to_clipboard(font_name) {
            Ok(()) => log::info!("Copied font name to clipboard: {}", font_name),
            Err(e) => log::warn!("{}", e),
        }
    }
}

impl Default for ClipboardAccess {
    fn default() -> Self {
        Self::new()
    }
}
