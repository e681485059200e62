//! Shaped rendering done on the preview worker thread.
//!
//! Looking up face data reads the font file and shaping a large face can take
//! a while, so each item is turned into a [`BlockImage`] before it is sent to
//! the UI thread. The UI thread only uploads the finished pixels.

use std::sync::Arc;

use fontpeek_fonts::{FontRegistry, PreviewRenderer, RenderedText};
use parking_lot::Mutex;

use super::producer::PreviewItem;

/// Shaped image (or the lack of one) for one preview block.
#[derive(Clone)]
pub struct BlockImage {
    /// Preview size in points
    pub size: u32,
    /// Pixels per point the image was rendered at
    pub scale: f32,
    /// `None` means the block shows a plain label instead
    pub rendered: Option<Arc<RenderedText>>,
}

impl BlockImage {
    /// A block with no shaped image.
    pub fn label_only(size: u32) -> Self {
        Self {
            size,
            scale: 1.0,
            rendered: None,
        }
    }
}

impl std::fmt::Debug for BlockImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockImage")
            .field("size", &self.size)
            .field("scale", &self.scale)
            .field("shaped", &self.rendered.is_some())
            .finish()
    }
}

/// Renders preview items for one pass. Size and scale are fixed when the
/// pass starts.
#[derive(Clone)]
pub struct BlockRenderer {
    registry: Arc<dyn FontRegistry>,
    /// Shared with the panel so the cache outlives a single pass
    renderer: Arc<Mutex<PreviewRenderer>>,
    size: u32,
    scale: f32,
    text_shaping: bool,
}

impl BlockRenderer {
    pub fn new(
        registry: Arc<dyn FontRegistry>,
        renderer: Arc<Mutex<PreviewRenderer>>,
        size: u32,
        scale: f32,
        text_shaping: bool,
    ) -> Self {
        Self {
            registry,
            renderer,
            size,
            scale,
            text_shaping,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Shape and rasterize `item`, or return a label-only image when shaping
    /// is off or the family cannot be rendered.
    pub fn render(&self, item: &PreviewItem) -> BlockImage {
        let rendered = if self.text_shaping {
            self.renderer.lock().render(
                self.registry.as_ref(),
                &item.font_name,
                &item.sample_text,
                self.size as f32 * self.scale,
            )
        } else {
            None
        };
        BlockImage {
            size: self.size,
            scale: self.scale,
            rendered,
        }
    }
}

impl std::fmt::Debug for BlockRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockRenderer")
            .field("size", &self.size)
            .field("scale", &self.scale)
            .field("text_shaping", &self.text_shaping)
            .finish()
    }
}
