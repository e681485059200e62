//! Text shaping using HarfBuzz via rustybuzz.
//!
//! Shaping turns a run of characters into positioned glyphs, applying the
//! OpenType features a plain character-to-glyph mapping cannot:
//! - Arabic joining forms (initial/medial/final/isolated)
//! - Ligatures (fi, fl, lam-alef)
//! - Kerning and contextual alternates
//! - Right-to-left glyph ordering
//!
//! Glyph positions are returned in font units; callers scale them by
//! `size / units_per_em`.

use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;

use lru::LruCache;
use rustybuzz::{Direction, Face, Feature, GlyphBuffer, Script, UnicodeBuffer};

use crate::registry::FaceSource;

/// A single shaped glyph with positioning information (font units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph ID from the font
    pub glyph_id: u32,

    /// Cluster index (byte offset of the source character in the run)
    pub cluster: u32,

    /// Horizontal advance
    pub x_advance: f32,

    /// Vertical advance (usually 0 for horizontal text)
    pub y_advance: f32,

    /// Horizontal offset from the pen position
    pub x_offset: f32,

    /// Vertical offset from the baseline
    pub y_offset: f32,
}

/// Options for text shaping
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapingOptions {
    /// Enable standard ligatures (fi, fl, etc.)
    pub enable_ligatures: bool,

    /// Enable kerning adjustments
    pub enable_kerning: bool,

    /// Script hint (e.g., "arab" for Arabic, "latn" for Latin)
    pub script: Option<String>,

    /// Text direction (true = RTL, false = LTR)
    pub rtl: bool,
}

impl Default for ShapingOptions {
    fn default() -> Self {
        Self {
            enable_ligatures: true,
            enable_kerning: true,
            script: None,
            rtl: false,
        }
    }
}

impl ShapingOptions {
    /// Options for a right-to-left Arabic run.
    pub fn arabic() -> Self {
        Self {
            script: Some("arab".to_string()),
            rtl: true,
            ..Self::default()
        }
    }
}

/// Result of shaping a text run
#[derive(Debug, Clone)]
pub struct ShapedRun {
    /// The shaped glyphs, in visual order
    pub glyphs: Vec<ShapedGlyph>,

    /// Total advance width in font units
    pub total_advance: f32,

    /// Number of glyphs that mapped to `.notdef`
    pub missing_glyphs: usize,
}

impl ShapedRun {
    fn empty() -> Self {
        Self {
            glyphs: Vec::new(),
            total_advance: 0.0,
            missing_glyphs: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Cache key for shaped text runs
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct ShapeCacheKey {
    text: String,
    face_key: String,
    options: ShapingOptions,
}

/// Text shaper using HarfBuzz via rustybuzz
pub struct TextShaper {
    /// Recently shaped runs
    shape_cache: LruCache<ShapeCacheKey, Arc<ShapedRun>>,
}

impl TextShaper {
    /// Create a new text shaper with default settings
    pub fn new() -> Self {
        Self::with_cache_size(1000)
    }

    /// Create a new text shaper with a specific cache size
    pub fn with_cache_size(max_cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            shape_cache: LruCache::new(capacity),
        }
    }

    /// Shape a text run using rustybuzz.
    ///
    /// `face_key` identifies the face in the cache (the family name is
    /// enough since one family maps to one regular face). A face that
    /// rustybuzz cannot parse yields an empty run.
    pub fn shape_text(
        &mut self,
        text: &str,
        face: &FaceSource,
        face_key: &str,
        options: &ShapingOptions,
    ) -> Arc<ShapedRun> {
        let cache_key = ShapeCacheKey {
            text: text.to_string(),
            face_key: face_key.to_string(),
            options: options.clone(),
        };

        if let Some(cached) = self.shape_cache.get(&cache_key) {
            return Arc::clone(cached);
        }

        let shaped_run = Arc::new(Self::shape_uncached(text, face, options));
        self.shape_cache.put(cache_key, Arc::clone(&shaped_run));
        shaped_run
    }

    fn shape_uncached(text: &str, face: &FaceSource, options: &ShapingOptions) -> ShapedRun {
        let Some(rb_face) = Face::from_slice(face.data.as_slice(), face.index) else {
            log::debug!("rustybuzz could not parse face (index {})", face.index);
            return ShapedRun::empty();
        };

        let mut unicode_buffer = UnicodeBuffer::new();
        unicode_buffer.push_str(text);

        unicode_buffer.set_direction(if options.rtl {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        });

        if let Some(ref script_str) = options.script
            && let Ok(script) = Script::from_str(script_str)
        {
            unicode_buffer.set_script(script);
        }

        let mut features = Vec::new();
        if options.enable_ligatures {
            for tag in ["liga", "clig"] {
                if let Ok(feat) = Feature::from_str(tag) {
                    features.push(feat);
                }
            }
        }
        if options.enable_kerning
            && let Ok(feat) = Feature::from_str("kern")
        {
            features.push(feat);
        }
        // Required for diacritics and Arabic mark placement
        for tag in ["ccmp", "locl", "calt"] {
            if let Ok(feat) = Feature::from_str(tag) {
                features.push(feat);
            }
        }

        let glyph_buffer = rustybuzz::shape(&rb_face, &features, unicode_buffer);
        let glyphs = Self::extract_shaped_glyphs(&glyph_buffer);
        let total_advance = glyphs.iter().map(|g| g.x_advance).sum();
        let missing_glyphs = glyphs.iter().filter(|g| g.glyph_id == 0).count();

        ShapedRun {
            glyphs,
            total_advance,
            missing_glyphs,
        }
    }

    /// Extract shaped glyphs from HarfBuzz glyph buffer
    fn extract_shaped_glyphs(buffer: &GlyphBuffer) -> Vec<ShapedGlyph> {
        buffer
            .glyph_infos()
            .iter()
            .zip(buffer.glyph_positions().iter())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                x_advance: pos.x_advance as f32,
                y_advance: pos.y_advance as f32,
                x_offset: pos.x_offset as f32,
                y_offset: pos.y_offset as f32,
            })
            .collect()
    }

    /// Clear the shape cache
    pub fn clear_cache(&mut self) {
        self.shape_cache.clear();
    }

    /// Get the current cache size
    pub fn cache_size(&self) -> usize {
        self.shape_cache.len()
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}
