//! Preview list: one block per font, built as preview items arrive.
//!
//! Items arrive from the worker already shaped and rasterized, so building a
//! block (`render`) is cheap and independent of egui. Textures are only
//! created in [`PreviewPanel::show`] for blocks that are actually on screen.

use std::sync::Arc;

use egui::load::SizedTexture;
use egui::{
    Align, Color32, ColorImage, Layout, Response, RichText, Sense, TextureHandle, TextureOptions,
    Vec2,
};
use fontpeek_config::Config;
use fontpeek_fonts::{FontRegistry, PreviewRenderer, RenderedText, TextDirection, detect_direction};
use parking_lot::Mutex;

use crate::preview::{BlockImage, BlockRenderer, PreviewItem};
use crate::ui_constants::PREVIEW_LABEL_GAP;

/// Something the user asked for from inside the preview list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// "Copy font name" from a block's context menu
    CopyFontName(String),
}

/// One font's entry in the preview list.
pub struct PreviewBlock {
    pub font_name: String,
    pub sample_text: String,
    /// Preview size in points
    pub size: u32,
    pub direction: TextDirection,
    /// Shaped image; `None` means the block shows a plain label instead
    pub rendered: Option<Arc<RenderedText>>,
    /// Pixels per point the image was rendered at
    scale: f32,
    texture: Option<TextureHandle>,
}

impl PreviewBlock {
    pub fn is_rtl(&self) -> bool {
        self.direction.is_rtl()
    }

    pub fn has_shaped_preview(&self) -> bool {
        self.rendered.is_some()
    }
}

impl std::fmt::Debug for PreviewBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewBlock")
            .field("font_name", &self.font_name)
            .field("size", &self.size)
            .field("direction", &self.direction)
            .field("shaped", &self.rendered.is_some())
            .finish()
    }
}

/// The scrollable list of preview blocks plus its progress counter.
pub struct PreviewPanel {
    blocks: Vec<PreviewBlock>,
    /// Render cache shared with every pass's worker
    renderer: Arc<Mutex<PreviewRenderer>>,
    /// Items processed in the current pass
    done: usize,
    /// Items expected in the current pass
    total: usize,
    spacer_height: f32,
    name_label_size: f32,
    text_shaping: bool,
    pixels_per_point: f32,
}

impl PreviewPanel {
    pub fn new(config: &Config) -> Self {
        Self {
            blocks: Vec::new(),
            renderer: Arc::new(Mutex::new(PreviewRenderer::new(config.render_cache_size))),
            done: 0,
            total: 0,
            spacer_height: config.spacer_height,
            name_label_size: config.name_label_size,
            text_shaping: config.text_shaping,
            pixels_per_point: 1.0,
        }
    }

    /// Destroy every block and reset progress to `0 / total`.
    pub fn clear(&mut self, total: usize) {
        self.blocks.clear();
        self.done = 0;
        self.total = total;
    }

    /// Renderer for a new pass at `size` points and the current display scale.
    pub fn block_renderer(&self, registry: Arc<dyn FontRegistry>, size: u32) -> BlockRenderer {
        BlockRenderer::new(
            registry,
            Arc::clone(&self.renderer),
            size,
            self.pixels_per_point,
            self.text_shaping,
        )
    }

    /// Append the block for `item`, followed by the spacer. Progress advances
    /// to the item's position.
    pub fn render(&mut self, item: &PreviewItem, image: BlockImage) -> &PreviewBlock {
        let position = self.blocks.len();
        self.blocks.push(PreviewBlock {
            font_name: item.font_name.clone(),
            sample_text: item.sample_text.clone(),
            size: image.size,
            direction: detect_direction(&item.sample_text),
            rendered: image.rendered,
            scale: image.scale,
            texture: None,
        });

        self.done = self.done.max(item.index + 1);
        self.total = self.total.max(self.done);
        &self.blocks[position]
    }

    pub fn blocks(&self) -> &[PreviewBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// `(done, total)` for the current pass.
    pub fn progress(&self) -> (usize, usize) {
        (self.done, self.total)
    }

    pub fn progress_fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f32 / self.total as f32
        }
    }

    /// Vertical gap after every block, in points.
    pub fn spacer_height(&self) -> f32 {
        self.spacer_height
    }

    /// Scale used by passes started from now on.
    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
            self.pixels_per_point = pixels_per_point;
        }
    }

    pub fn cached_renders(&self) -> usize {
        self.renderer.lock().cached_entries()
    }

    /// Draw every block. Returns the action chosen from a context menu, if any.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<PanelAction> {
        let mut action = None;
        let text_color = ui.visuals().text_color();
        let name_label_size = self.name_label_size;
        let spacer_height = self.spacer_height;

        for (position, block) in self.blocks.iter_mut().enumerate() {
            let layout = if block.is_rtl() {
                Layout::top_down(Align::Max)
            } else {
                Layout::top_down(Align::Min)
            };

            ui.with_layout(layout, |ui| {
                let name = ui.add(
                    egui::Label::new(
                        RichText::new(&block.font_name)
                            .strong()
                            .size(name_label_size),
                    )
                    .sense(Sense::click()),
                );
                copy_name_menu(&name, &block.font_name, &mut action);
                ui.add_space(PREVIEW_LABEL_GAP);

                let sample = match &block.rendered {
                    Some(rendered) => {
                        let size = Vec2::new(rendered.width as f32, rendered.height as f32)
                            / block.scale;
                        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
                        if ui.is_rect_visible(rect) {
                            let texture = block.texture.get_or_insert_with(|| {
                                ui.ctx().load_texture(
                                    format!("fontpeek-preview-{position}"),
                                    ColorImage::from_rgba_unmultiplied(
                                        [rendered.width as usize, rendered.height as usize],
                                        &rendered.pixels,
                                    ),
                                    TextureOptions::LINEAR,
                                )
                            });
                            // Mask glyphs are white; color glyphs keep their colors
                            let tint = if rendered.has_color {
                                Color32::WHITE
                            } else {
                                text_color
                            };
                            egui::Image::new(SizedTexture::new(texture.id(), size))
                                .tint(tint)
                                .paint_at(ui, rect);
                        }
                        response
                    }
                    None => ui.add(
                        egui::Label::new(
                            RichText::new(&block.sample_text).size(block.size as f32),
                        )
                        .sense(Sense::click()),
                    ),
                };
                copy_name_menu(&sample, &block.font_name, &mut action);
            });
            ui.add_space(spacer_height);
        }

        action
    }
}

/// Attach the "Copy font name" context menu to `response`.
fn copy_name_menu(response: &Response, font_name: &str, action: &mut Option<PanelAction>) {
    response.context_menu(|ui| {
        if ui.button("Copy font name").clicked() {
            *action = Some(PanelAction::CopyFontName(font_name.to_string()));
            ui.close();
        }
    });
}
