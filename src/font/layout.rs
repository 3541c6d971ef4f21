//! String measurement and layout
//!
//! Works purely on Latin-1 code points and the spacing tables of a font;
//! sprite drawing happens elsewhere.

use std::str::FromStr;

use anyhow::anyhow;

use crate::config::FontConfig;
use crate::constants::ACCENT_HEIGHT_FACTOR;
use crate::geometry::{snap_down, Point};

use super::atlas::GlyphAtlas;
use super::kerning::KerningTable;
use super::metrics::MetricsTable;

/// Horizontal alignment relative to the layout origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Alignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(anyhow!("Unknown alignment: {}", other)),
        }
    }
}

/// Everything that determines glyph advances
///
/// This is the state `copy_spacing` transfers between fonts.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSpacing {
    pub metrics: MetricsTable,
    pub kerning: KerningTable,
    /// World units per atlas pixel at scale factor 1
    pub base_scale: f64,
    pub scale_factor: f64,
    /// Atlas pixels between characters
    pub char_spacing: i32,
    /// Atlas pixels advanced by a space
    pub space_width: i32,
    pub fixed_width: bool,
    /// Advance of every glyph in fixed-width mode
    pub block_width: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub accents_present: bool,
}

impl GlyphSpacing {
    /// Spacing of a font whose atlas never loaded
    pub fn empty(config: &FontConfig) -> Self {
        Self {
            metrics: MetricsTable::default(),
            kerning: KerningTable::default(),
            base_scale: config.base_scale,
            scale_factor: config.scale_factor,
            char_spacing: config.char_spacing,
            space_width: config.space_width,
            fixed_width: config.fixed_width,
            block_width: 0,
            cell_width: 0,
            cell_height: 0,
            accents_present: false,
        }
    }

    /// Geometry without tables, filled in by the builder
    pub fn for_atlas(atlas: &GlyphAtlas, config: &FontConfig) -> Self {
        let block_width = if config.fixed_char_width == 0 {
            atlas.cell_width
        } else {
            config.fixed_char_width
        };
        Self {
            block_width,
            cell_width: atlas.cell_width,
            cell_height: atlas.cell_height,
            accents_present: atlas.accents_present,
            ..Self::empty(config)
        }
    }

    /// World units per atlas pixel
    #[inline]
    pub fn scale(&self) -> f64 {
        self.base_scale * self.scale_factor
    }

    /// No atlas behind these tables
    pub fn is_empty(&self) -> bool {
        self.cell_width == 0
    }
}

/// Layout view over a font's spacing plus its runtime settings
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    pub spacing: &'a GlyphSpacing,
    pub kerning_enabled: bool,
    pub min_position_precision: f64,
}

impl Layout<'_> {
    /// World units per atlas pixel
    #[inline]
    pub fn scale(&self) -> f64 {
        self.spacing.scale()
    }

    /// Scaled inter-character spacing
    pub fn char_spacing(&self) -> f64 {
        self.spacing.char_spacing as f64 * self.scale()
    }

    /// Kerning applied after `code` when `next` follows (atlas pixels)
    fn kerning_after(&self, code: u8, next: Option<u8>) -> i32 {
        match next {
            Some(next) if self.kerning_enabled && !self.spacing.fixed_width && code != b' ' => {
                self.spacing.kerning.offset(code, next)
            }
            _ => 0,
        }
    }

    /// Advance width of one glyph, before spacing and kerning (world units)
    fn glyph_advance(&self, code: u8) -> f64 {
        let pixels = if code == b' ' {
            self.spacing.space_width
        } else if self.spacing.fixed_width {
            self.spacing.block_width as i32
        } else {
            self.spacing.metrics.get(code).width
        };
        pixels as f64 * self.scale()
    }

    /// Width of the first `limit` characters (all when `None`)
    pub fn measure(&self, text: &[u8], limit: Option<usize>) -> f64 {
        if self.spacing.is_empty() {
            return 0.0;
        }

        let count = limit.map_or(text.len(), |l| l.min(text.len()));
        let text = &text[..count];
        let scale = self.scale();

        let mut width = 0.0;
        for (i, &code) in text.iter().enumerate() {
            width += self.glyph_advance(code);
            width += self.kerning_after(code, text.get(i + 1).copied()) as f64 * scale;
            width += self.char_spacing();
        }

        // No spacing after the last character
        if count > 0 {
            width -= self.char_spacing();
        }

        width
    }

    /// Advance width and draw position for a glyph placed at `target`
    pub fn position_character(&self, code: u8, target: Point) -> (f64, Point) {
        if self.spacing.is_empty() {
            return (0.0, target);
        }

        let advance = self.glyph_advance(code);
        if code == b' ' || self.spacing.fixed_width {
            return (advance, target);
        }

        let left = self.spacing.metrics.get(code).left_edge_offset as f64 * self.scale();
        (advance, target.offset_x(-left))
    }

    /// Push one draw position per character into `out` and return the
    /// cursor x after the last character
    pub fn layout(&self, out: &mut Vec<Point>, text: &[u8], origin: Point, align: Alignment) -> f64 {
        if self.spacing.is_empty() {
            return origin.x;
        }

        let scale = self.scale();
        let mut x = origin.x;
        let mut y = origin.y;

        // Compensate for headroom in accent-equipped atlases
        if self.spacing.accents_present {
            y += scale * self.spacing.cell_height as f64 / 4.0;
        }

        match align {
            Alignment::Left => {}
            Alignment::Center => x -= self.measure(text, None) / 2.0,
            Alignment::Right => x -= self.measure(text, None),
        }

        // Sprites are drawn on their centers
        let half_cell = scale * self.spacing.cell_width as f64 / 2.0;
        x = snap_down(x + half_cell, self.min_position_precision);

        out.reserve(text.len());
        for (i, &code) in text.iter().enumerate() {
            let (advance, draw_pos) = self.position_character(code, Point::new(x, y));
            out.push(draw_pos);

            x += advance + self.char_spacing();
            x += self.kerning_after(code, text.get(i + 1).copied()) as f64 * scale;
        }

        if !text.is_empty() {
            x -= self.char_spacing();
        }

        x - half_cell
    }

    /// Visual line height
    pub fn height(&self) -> f64 {
        let accent_factor = if self.spacing.accents_present {
            ACCENT_HEIGHT_FACTOR
        } else {
            1.0
        };
        self.scale() * self.spacing.cell_height as f64 * accent_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::metrics::GlyphMetrics;

    fn config(char_spacing: i32, fixed_width: bool) -> FontConfig {
        FontConfig {
            base_scale: 1.0,
            char_spacing,
            space_width: 8,
            fixed_width,
            ..FontConfig::default()
        }
    }

    fn spacing(fixed: bool) -> GlyphSpacing {
        let atlas = GlyphAtlas::from_dimensions(256, 256).unwrap();
        let mut spacing = GlyphSpacing::for_atlas(&atlas, &config(2, fixed));
        spacing.metrics = MetricsTable::uniform(GlyphMetrics {
            left_edge_offset: 3,
            width: 10,
        });
        spacing
    }

    fn layout(spacing: &GlyphSpacing) -> Layout<'_> {
        Layout {
            spacing,
            kerning_enabled: true,
            min_position_precision: 0.0,
        }
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!("Center".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!("right".parse::<Alignment>().unwrap(), Alignment::Right);
        assert!("middle".parse::<Alignment>().is_err());
    }

    #[test]
    fn test_measure_sums_widths_and_spacing() {
        let s = spacing(false);
        let l = layout(&s);
        // 10 + 2 + 8 + 2 + 10
        assert!((l.measure(b"a b", None) - 32.0).abs() < 1e-9);
        assert!((l.measure(b"a b", Some(1)) - 10.0).abs() < 1e-9);
        assert!((l.measure(b"a b", Some(99)) - 32.0).abs() < 1e-9);
        assert_eq!(l.measure(b"", None), 0.0);
    }

    #[test]
    fn test_fixed_width_ignores_left_edge() {
        let s = spacing(true);
        let l = layout(&s);
        let (advance, pos) = l.position_character(b'a', Point::new(5.0, 1.0));
        assert!((advance - 16.0).abs() < 1e-9);
        assert_eq!(pos, Point::new(5.0, 1.0));

        let s = spacing(false);
        let l = layout(&s);
        let (advance, pos) = l.position_character(b'a', Point::new(5.0, 1.0));
        assert!((advance - 10.0).abs() < 1e-9);
        assert_eq!(pos, Point::new(2.0, 1.0));
    }

    #[test]
    fn test_layout_centers_sprites_and_returns_cursor() {
        let s = spacing(false);
        let l = layout(&s);
        let mut out = Vec::new();
        let end = l.layout(&mut out, b"ab", Point::new(100.0, 0.0), Alignment::Left);

        // Half cell (8) minus left edge (3)
        assert_eq!(out[0], Point::new(105.0, 0.0));
        assert_eq!(out[1], Point::new(117.0, 0.0));
        assert!((end - 100.0 - l.measure(b"ab", None)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_spacing_degrades_to_zero() {
        let s = GlyphSpacing::empty(&config(2, false));
        let l = layout(&s);
        let mut out = Vec::new();
        assert_eq!(l.measure(b"abc", None), 0.0);
        assert_eq!(l.layout(&mut out, b"abc", Point::new(4.0, 0.0), Alignment::Right), 4.0);
        assert!(out.is_empty());
        assert_eq!(l.height(), 0.0);
    }

    #[test]
    fn test_accent_height_and_shift() {
        let atlas = GlyphAtlas::from_dimensions(256, 512).unwrap();
        let s = GlyphSpacing::for_atlas(&atlas, &config(0, false));
        let l = layout(&s);
        assert!((l.height() - 16.0).abs() < 1e-9);

        let mut out = Vec::new();
        l.layout(&mut out, b" ", Point::new(0.0, 0.0), Alignment::Left);
        assert!((out[0].y - 8.0).abs() < 1e-9);
    }
}
