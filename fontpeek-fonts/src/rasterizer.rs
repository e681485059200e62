//! Shaped preview rendering.
//!
//! Turns (family, sample text, size) into one RGBA image: the text is split
//! into direction runs, each run is shaped with rustybuzz, and every glyph is
//! rasterized with swash and composited onto a canvas sized to the shaped
//! advance. Mask glyphs are written as white with coverage in alpha so the UI
//! can tint them with the current text color; color glyphs (emoji) keep their
//! own colors.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use swash::FontRef;
use swash::scale::image::{Content, Image};
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

use crate::direction::{TextDirection, detect_direction, split_direction_runs};
use crate::registry::FontRegistry;
use crate::text_shaper::{ShapedRun, ShapingOptions, TextShaper};

/// Transparent margin around the rendered text, in pixels.
const PADDING: u32 = 2;

/// Widest canvas ever allocated; longer samples are clipped.
const MAX_CANVAS_WIDTH: u32 = 4096;

/// A rendered preview, ready for upload as a texture.
#[derive(Clone)]
pub struct RenderedText {
    pub width: u32,
    pub height: u32,
    /// RGBA8, unpremultiplied, row-major
    pub pixels: Vec<u8>,
    /// Distance from the top edge to the baseline, in pixels
    pub baseline: f32,
    /// Paragraph direction used for run ordering
    pub direction: TextDirection,
    /// Whether any glyph came from a color source
    pub has_color: bool,
}

impl std::fmt::Debug for RenderedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedText")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("direction", &self.direction)
            .field("has_color", &self.has_color)
            .finish()
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct RenderKey {
    family: String,
    text: String,
    /// Size in 1/100 px so the key stays hashable
    size_centi_px: u32,
}

/// Shapes and rasterizes previews, caching the most recent results.
pub struct PreviewRenderer {
    shaper: TextShaper,
    scale_context: ScaleContext,
    /// `None` entries remember families that cannot be rendered
    cache: LruCache<RenderKey, Option<Arc<RenderedText>>>,
}

impl PreviewRenderer {
    pub fn new(cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            shaper: TextShaper::new(),
            scale_context: ScaleContext::new(),
            cache: LruCache::new(capacity),
        }
    }

    /// Render `text` in `family` at `size_px`.
    ///
    /// Returns `None` when the family is unknown to the registry, its data
    /// cannot be parsed, or it has no glyph for any character of the text.
    /// Callers fall back to a plain label in that case.
    pub fn render(
        &mut self,
        registry: &dyn FontRegistry,
        family: &str,
        text: &str,
        size_px: f32,
    ) -> Option<Arc<RenderedText>> {
        let key = RenderKey {
            family: family.to_string(),
            text: text.to_string(),
            size_centi_px: (size_px.max(0.0) * 100.0).round() as u32,
        };
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let rendered = self.render_uncached(registry, family, text, size_px).map(Arc::new);
        if rendered.is_none() {
            log::debug!("No shaped preview for '{}', using fallback label", family);
        }
        self.cache.put(key, rendered.clone());
        rendered
    }

    /// Number of cached render results (including cached failures).
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn render_uncached(
        &mut self,
        registry: &dyn FontRegistry,
        family: &str,
        text: &str,
        size_px: f32,
    ) -> Option<RenderedText> {
        if text.is_empty() || size_px <= 0.0 {
            return None;
        }

        let face = registry.face_source(family)?;
        let font = FontRef::from_index(face.data.as_slice(), face.index as usize)?;
        let metrics = font.metrics(&[]);
        if metrics.units_per_em == 0 {
            return None;
        }
        let scale = size_px / metrics.units_per_em as f32;
        let scaled = metrics.scale(size_px);
        let ascent = scaled.ascent.abs();
        let descent = scaled.descent.abs();

        let direction = detect_direction(text);
        let mut runs = split_direction_runs(text);
        if direction.is_rtl() {
            runs.reverse();
        }

        let shaped: Vec<Arc<ShapedRun>> = runs
            .iter()
            .map(|run| {
                let options = if run.direction.is_rtl() {
                    ShapingOptions::arabic()
                } else {
                    ShapingOptions::default()
                };
                self.shaper
                    .shape_text(&text[run.range.clone()], &face, family, &options)
            })
            .collect();

        let glyph_count: usize = shaped.iter().map(|run| run.glyphs.len()).sum();
        let missing: usize = shaped.iter().map(|run| run.missing_glyphs).sum();
        if glyph_count == 0 || missing == glyph_count {
            return None;
        }

        let total_advance: f32 = shaped.iter().map(|run| run.total_advance).sum::<f32>() * scale;
        let width = ((total_advance.ceil() as u32) + 2 * PADDING).min(MAX_CANVAS_WIDTH);
        let height = ((ascent + descent).ceil() as u32 + 2 * PADDING).max(1);
        let baseline = PADDING as f32 + ascent;

        let mut canvas = Canvas::new(width, height);
        let mut scaler = self
            .scale_context
            .builder(font)
            .size(size_px)
            .hint(true)
            .build();
        // Color sources first so emoji fonts keep their colors
        let sources = [
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::ColorOutline(0),
            Source::Outline,
        ];
        let mut render = Render::new(&sources);
        render.format(Format::Alpha);

        let mut pen_x = PADDING as f32;
        for run in &shaped {
            for glyph in &run.glyphs {
                if pen_x > width as f32 {
                    break;
                }
                let Ok(glyph_id) = u16::try_from(glyph.glyph_id) else {
                    pen_x += glyph.x_advance * scale;
                    continue;
                };
                if let Some(image) = render.render(&mut scaler, glyph_id) {
                    let origin_x = (pen_x + glyph.x_offset * scale).round() as i32;
                    let origin_y = (baseline - glyph.y_offset * scale).round() as i32;
                    canvas.blit(
                        &image,
                        origin_x + image.placement.left,
                        origin_y - image.placement.top,
                    );
                }
                pen_x += glyph.x_advance * scale;
            }
        }

        Some(RenderedText {
            width,
            height,
            pixels: canvas.pixels,
            baseline,
            direction,
            has_color: canvas.has_color,
        })
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new(512)
    }
}

/// RGBA compositing target.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    has_color: bool,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
            has_color: false,
        }
    }

    /// Composite a swash image with its top-left corner at (`x`, `y`), clipping at the edges.
    fn blit(&mut self, image: &Image, x: i32, y: i32) {
        let w = image.placement.width as i32;
        let h = image.placement.height as i32;
        let bytes_per_pixel = match image.content {
            Content::Mask => 1,
            Content::SubpixelMask | Content::Color => 4,
        };
        if matches!(image.content, Content::Color) {
            self.has_color = true;
        }

        for row in 0..h {
            let dy = y + row;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for col in 0..w {
                let dx = x + col;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let src = ((row * w + col) as usize) * bytes_per_pixel;
                let Some(src_px) = image.data.get(src..src + bytes_per_pixel) else {
                    continue;
                };
                let dst = ((dy as u32 * self.width + dx as u32) * 4) as usize;
                let rgba = match image.content {
                    Content::Mask => [255, 255, 255, src_px[0]],
                    Content::SubpixelMask => {
                        let (r, g, b) = (src_px[0] as u32, src_px[1] as u32, src_px[2] as u32);
                        [255, 255, 255, ((r * 299 + g * 587 + b * 114) / 1000) as u8]
                    }
                    Content::Color => [src_px[0], src_px[1], src_px[2], src_px[3]],
                };
                composite(&mut self.pixels[dst..dst + 4], rgba);
            }
        }
    }
}

/// Keep the stronger coverage; overlapping glyphs (marks over bases) must not erase each other.
fn composite(dst: &mut [u8], src: [u8; 4]) {
    if src[3] >= dst[3] {
        dst.copy_from_slice(&src);
    }
}
