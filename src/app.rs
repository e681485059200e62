//! Main window: toolbar, scrolling preview list, status line and the
//! progress window shown while previews are streamed in.

use std::path::PathBuf;
use std::sync::Arc;

use egui::load::SizedTexture;
use egui::{Response, TextureHandle, TextureOptions, Vec2};
use fontpeek_config::Config;
use fontpeek_config::defaults::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use fontpeek_fonts::{FontRegistry, SystemFontRegistry};

use crate::assets::AssetLoader;
use crate::clipboard::ClipboardAccess;
use crate::controller::{PanelState, PreviewController};
use crate::panel::PanelAction;
use crate::preview::Notifier;
use crate::ui_constants::{
    PROGRESS_BAR_WIDTH, PROGRESS_WINDOW_WIDTH, SAMPLE_TEXT_INPUT_WIDTH, SEARCH_INPUT_WIDTH,
    TOOLBAR_ICON_SIZE, TOOLBAR_ROW_SPACING,
};

/// Optional toolbar icons; any of them may be missing.
#[derive(Default)]
struct ToolbarIcons {
    system: Option<TextureHandle>,
    folder: Option<TextureHandle>,
    refresh: Option<TextureHandle>,
}

impl ToolbarIcons {
    fn load(ctx: &egui::Context, assets: &AssetLoader) -> Self {
        let load = |name: &str| {
            assets
                .load_icon(name)
                .map(|image| ctx.load_texture(format!("icon-{name}"), image, TextureOptions::LINEAR))
        };
        Self {
            system: load("system"),
            folder: load("folder"),
            refresh: load("refresh"),
        }
    }
}

pub struct FontPeekApp {
    config: Config,
    controller: PreviewController,
    clipboard: ClipboardAccess,
    icons: ToolbarIcons,
    /// Widget state mirrored into the controller on change
    sample_text_input: String,
    size_input: u32,
    search_input: String,
}

impl FontPeekApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, folder: Option<PathBuf>) -> Self {
        let ctx = cc.egui_ctx.clone();
        let notify: Notifier = Arc::new(move || ctx.request_repaint());
        let registry: Arc<dyn FontRegistry> = Arc::new(SystemFontRegistry::new());

        let mut controller = PreviewController::new(&config, registry, notify);
        controller.load_system_fonts();
        if let Some(folder) = folder {
            controller.load_folder(folder);
        }

        let assets = AssetLoader::new(config.icons_path());
        let icons = ToolbarIcons::load(&cc.egui_ctx, &assets);

        Self {
            sample_text_input: config.sample_text.clone(),
            size_input: controller.font_size(),
            search_input: String::new(),
            config,
            controller,
            clipboard: ClipboardAccess::new(),
            icons,
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(TOOLBAR_ROW_SPACING);
        ui.horizontal(|ui| {
            let text = ui.add(
                egui::TextEdit::singleline(&mut self.sample_text_input)
                    .hint_text("Enter text to preview...")
                    .desired_width(SAMPLE_TEXT_INPUT_WIDTH),
            );
            if text.changed() {
                self.controller.set_sample_text(self.sample_text_input.clone());
            }

            let size = ui.add(
                egui::DragValue::new(&mut self.size_input)
                    .range(MIN_FONT_SIZE..=MAX_FONT_SIZE)
                    .prefix("Size: ")
                    .suffix("pt"),
            );
            if size.changed() {
                self.controller.set_font_size(self.size_input);
            }
        });

        ui.add_space(TOOLBAR_ROW_SPACING);
        ui.horizontal(|ui| {
            if toolbar_button(ui, self.icons.system.as_ref(), "Load System Fonts").clicked() {
                self.controller.load_system_fonts();
            }
            if toolbar_button(ui, self.icons.folder.as_ref(), "Load Fonts from Folder").clicked()
                && let Some(path) = rfd::FileDialog::new().set_title("Select Folder").pick_folder()
            {
                self.controller.load_folder(path);
            }
            if toolbar_button(ui, self.icons.refresh.as_ref(), "Update Preview").clicked() {
                self.controller.request_update();
            }

            ui.separator();
            let search = ui.add(
                egui::TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search fonts...")
                    .desired_width(SEARCH_INPUT_WIDTH),
            );
            if search.changed() {
                self.controller.set_query(self.search_input.clone());
            }
        });
        ui.add_space(TOOLBAR_ROW_SPACING);
    }

    fn show_progress_window(&mut self, ctx: &egui::Context) {
        let (done, total) = self.controller.panel().progress();
        let fraction = self.controller.panel().progress_fraction();
        let mut cancel = false;

        egui::Window::new("Updating previews...")
            .id(egui::Id::new("preview_progress_window"))
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .order(egui::Order::Foreground)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.set_min_width(PROGRESS_WINDOW_WIDTH);
                ui.add(
                    egui::ProgressBar::new(fraction)
                        .text(format!("{} / {}", done, total))
                        .desired_width(PROGRESS_BAR_WIDTH)
                        .animate(false),
                );
                ui.add_space(4.0);
                ui.vertical_centered(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if cancel {
            self.controller.cancel();
        }
    }

    fn show_error(&self, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(self.config.window_title.as_str())
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

impl eframe::App for FontPeekApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller
            .panel_mut()
            .set_pixels_per_point(ctx.pixels_per_point());
        let changed = self.controller.poll();

        if let Some(message) = self.controller.take_error() {
            self.show_error(&message);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.show_toolbar(ui));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.controller.status_line());
        });

        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    action = self.controller.panel_mut().show(ui);
                });
        });
        if let Some(PanelAction::CopyFontName(name)) = action {
            self.clipboard.copy_font_name(&name);
        }

        if self.controller.state() == PanelState::Populating {
            self.show_progress_window(ctx);
        }

        // Events beyond the per-poll budget are handled next frame
        if changed {
            ctx.request_repaint();
        }
    }
}

/// Text button, with the icon in front when one was loaded.
fn toolbar_button(ui: &mut egui::Ui, icon: Option<&TextureHandle>, label: &str) -> Response {
    match icon {
        Some(texture) => ui.add(egui::Button::image_and_text(
            egui::Image::new(SizedTexture::new(
                texture.id(),
                Vec2::splat(TOOLBAR_ICON_SIZE),
            )),
            label,
        )),
        None => ui.button(label),
    }
}

/// Open the main window and run until it is closed.
pub fn run(config: Config, folder: Option<PathBuf>) -> anyhow::Result<()> {
    let size = [config.window_width, config.window_height];
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size(size)
            .with_min_inner_size(size),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(FontPeekApp::new(cc, config, folder)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to open the main window: {e}"))?;

    log::info!("Main window closed");
    Ok(())
}
