//! Bitmap font
//!
//! Owns the spacing tables and glyph sprites built from one atlas, and
//! exposes measurement, layout and drawing of Latin-1 text.

use std::path::Path;

use image::RgbaImage;
use log::{info, warn};

use crate::config::FontConfig;
use crate::error::FontResult;
use crate::geometry::Point;
use crate::gpu::SpriteBackend;
use crate::text::{to_latin1, UnmappablePolicy};

use super::atlas::{load_atlas_image, slice_atlas, GlyphAtlas};
use super::kerning::KerningTable;
use super::layout::{Alignment, GlyphSpacing, Layout};
use super::metrics::{GlyphMetrics, MetricsTable};
use super::sprites::SpriteStore;

/// Grid bitmap font with ink-trimmed metrics and pairwise kerning
///
/// `H` is the sprite handle type of the backend the font was loaded with.
/// Sprites must be handed back with [`BitmapFont::release`]. Dropping a font
/// without releasing it leaks its sprites in the backend and logs a warning;
/// the font holds no backend reference to free them itself.
pub struct BitmapFont<H> {
    atlas: Option<GlyphAtlas>,
    spacing: GlyphSpacing,
    sprites: SpriteStore<H>,
    kerning_enabled: bool,
    min_position_precision: f64,
    unmappable: UnmappablePolicy,
    replacement: u8,
}

impl<H> BitmapFont<H> {
    /// Load an atlas file and build the font
    pub fn load<B>(path: &Path, config: &FontConfig, backend: &mut B) -> FontResult<Self>
    where
        B: SpriteBackend<Handle = H>,
    {
        let image = load_atlas_image(path)?;
        Self::from_image(&image, config, backend)
    }

    /// Like [`load`](Self::load), but a failed load yields an empty font
    /// whose operations all measure zero and draw nothing
    pub fn load_or_empty<B>(path: &Path, config: &FontConfig, backend: &mut B) -> Self
    where
        B: SpriteBackend<Handle = H>,
    {
        match Self::load(path, config, backend) {
            Ok(font) => font,
            Err(e) => {
                warn!("Font unavailable, continuing without glyphs: {}", e);
                Self::empty(config)
            }
        }
    }

    /// Font with no atlas behind it
    pub fn empty(config: &FontConfig) -> Self {
        Self {
            atlas: None,
            spacing: GlyphSpacing::empty(config),
            sprites: SpriteStore::default(),
            kerning_enabled: config.kerning,
            min_position_precision: config.min_position_precision,
            unmappable: config.unmappable,
            replacement: config.replacement_byte(),
        }
    }

    /// Build the font from an already decoded atlas image
    pub fn from_image<B>(image: &RgbaImage, config: &FontConfig, backend: &mut B) -> FontResult<Self>
    where
        B: SpriteBackend<Handle = H>,
    {
        let (atlas, cells) = slice_atlas(image)?;

        let mut spacing = GlyphSpacing::for_atlas(&atlas, config);

        let fixed_block = config.fixed_width.then_some(spacing.block_width);
        spacing.metrics = MetricsTable::extract(&atlas, &cells, fixed_block);
        if !config.fixed_width {
            spacing.kerning = KerningTable::build(&atlas, &cells, &spacing.metrics);
        }

        let sprites = SpriteStore::upload(backend, &cells);
        // Cell pixel buffers are dropped here; only the tables persist

        info!(
            "Font built: cell={}x{}, {} sprites, {} kerning rows, fixed_width={}",
            atlas.cell_width,
            atlas.cell_height,
            sprites.len(),
            spacing.kerning.row_count(),
            config.fixed_width
        );

        let mut font = Self::empty(config);
        font.atlas = Some(atlas);
        font.spacing = spacing;
        font.sprites = sprites;
        Ok(font)
    }

    /// Release all sprites through the backend that created them
    pub fn release<B>(mut self, backend: &mut B)
    where
        B: SpriteBackend<Handle = H>,
    {
        self.sprites.release(backend);
    }

    /// Adopt another font's metrics, kerning, scale and spacing.
    /// Sprites, kerning toggle and position precision stay this font's own.
    ///
    /// Layout then uses the other font's cell geometry; [`atlas`](Self::atlas)
    /// keeps describing this font's own sprite source.
    pub fn copy_spacing<O>(&mut self, other: &BitmapFont<O>) {
        self.spacing = other.spacing.clone();
    }

    fn layout_view(&self) -> Layout<'_> {
        Layout {
            spacing: &self.spacing,
            kerning_enabled: self.kerning_enabled,
            min_position_precision: self.min_position_precision,
        }
    }

    /// Convert text to this font's Latin-1 code points
    pub fn encode(&self, text: &str) -> Vec<u8> {
        to_latin1(text, self.unmappable, self.replacement)
    }

    // ------------------------------------------------------------------
    // Measurement and layout
    // ------------------------------------------------------------------

    /// Width of `text`, or of its first `limit` characters
    pub fn measure(&self, text: &str, limit: Option<usize>) -> f64 {
        self.measure_latin1(&self.encode(text), limit)
    }

    /// Width of Latin-1 encoded text
    pub fn measure_latin1(&self, text: &[u8], limit: Option<usize>) -> f64 {
        self.layout_view().measure(text, limit)
    }

    /// Append one draw position per character to `out`; returns the cursor x
    /// after the last character
    pub fn layout_positions(
        &self,
        out: &mut Vec<Point>,
        text: &str,
        origin: Point,
        align: Alignment,
    ) -> f64 {
        self.layout_positions_latin1(out, &self.encode(text), origin, align)
    }

    pub fn layout_positions_latin1(
        &self,
        out: &mut Vec<Point>,
        text: &[u8],
        origin: Point,
        align: Alignment,
    ) -> f64 {
        self.layout_view().layout(out, text, origin, align)
    }

    /// Advance width and draw position of one glyph placed at `target`
    pub fn position_character(&self, code: u8, target: Point) -> (f64, Point) {
        self.layout_view().position_character(code, target)
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Lay out and draw a string; returns the cursor x after it
    pub fn draw_string<B>(&self, backend: &mut B, text: &str, origin: Point, align: Alignment) -> f64
    where
        B: SpriteBackend<Handle = H>,
    {
        let codes = self.encode(text);
        let mut positions = Vec::with_capacity(codes.len());
        let end_x = self.layout_positions_latin1(&mut positions, &codes, origin, align);

        let scale = self.layout_view().scale();
        for (&code, &pos) in codes.iter().zip(&positions) {
            if let Some(handle) = self.sprites.get(code) {
                backend.draw_sprite(handle, pos, scale);
            }
        }

        end_x
    }

    /// Draw one glyph with its left-edge compensation; returns its advance
    pub fn draw_character<B>(&self, backend: &mut B, code: u8, position: Point) -> f64
    where
        B: SpriteBackend<Handle = H>,
    {
        let (advance, draw_pos) = self.position_character(code, position);
        if code == b' ' {
            return advance;
        }
        self.draw_character_sprite(backend, code, draw_pos);
        advance
    }

    /// Draw a glyph's sprite exactly at `position`
    pub fn draw_character_sprite<B>(&self, backend: &mut B, code: u8, position: Point)
    where
        B: SpriteBackend<Handle = H>,
    {
        if let Some(handle) = self.sprites.get(code) {
            backend.draw_sprite(handle, position, self.layout_view().scale());
        }
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Visual line height in world units
    pub fn height(&self) -> f64 {
        self.layout_view().height()
    }

    pub fn enable_kerning(&mut self, enabled: bool) {
        self.kerning_enabled = enabled;
    }

    pub fn kerning_enabled(&self) -> bool {
        self.kerning_enabled
    }

    pub fn set_minimum_position_precision(&mut self, precision: f64) {
        self.min_position_precision = precision;
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.spacing.scale_factor = scale_factor;
    }

    pub fn scale_factor(&self) -> f64 {
        self.spacing.scale_factor
    }

    /// Scaled spacing inserted between characters
    pub fn char_spacing(&self) -> f64 {
        self.layout_view().char_spacing()
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Geometry of the atlas this font's sprites were cut from
    /// (None if the atlas never loaded). Layout geometry lives in
    /// [`spacing`](Self::spacing) and follows `copy_spacing`.
    pub fn atlas(&self) -> Option<&GlyphAtlas> {
        self.atlas.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.atlas.is_some()
    }

    pub fn metrics(&self, code: u8) -> GlyphMetrics {
        self.spacing.metrics.get(code)
    }

    /// Kerning offset in atlas pixels for `second` following `first`
    pub fn kerning_offset(&self, first: u8, second: u8) -> i32 {
        self.spacing.kerning.offset(first, second)
    }

    pub fn has_kerning_row(&self, code: u8) -> bool {
        self.spacing.kerning.has_row(code)
    }

    pub fn kerning_rows(&self) -> usize {
        self.spacing.kerning.row_count()
    }

    pub fn has_sprite(&self, code: u8) -> bool {
        self.sprites.get(code).is_some()
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Tables and cell geometry used for measurement and layout
    pub fn spacing(&self) -> &GlyphSpacing {
        &self.spacing
    }
}
