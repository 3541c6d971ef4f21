//! Per-glyph ink metrics ("pseudo-kerning")
//!
//! Each glyph is trimmed to the horizontal extent of its ink, so narrow
//! glyphs advance less than a full cell.

use crate::constants::{is_ink, GLYPH_COUNT};

use super::atlas::{GlyphAtlas, GlyphCell};

/// Horizontal metrics for one code point (atlas pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    /// Cell left edge to first ink column
    pub left_edge_offset: i32,
    /// Ink span (or full cell / fixed block width)
    pub width: i32,
}

/// Metrics for all 256 code points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsTable {
    entries: [GlyphMetrics; GLYPH_COUNT],
}

impl Default for MetricsTable {
    fn default() -> Self {
        Self {
            entries: [GlyphMetrics::default(); GLYPH_COUNT],
        }
    }
}

impl MetricsTable {
    /// Every code point gets the same metrics
    pub fn uniform(metrics: GlyphMetrics) -> Self {
        Self {
            entries: [metrics; GLYPH_COUNT],
        }
    }

    #[inline]
    pub fn get(&self, code: u8) -> GlyphMetrics {
        self.entries[code as usize]
    }

    /// Derive metrics from sliced cells.
    ///
    /// `fixed_block_width` bypasses shape analysis entirely.
    pub fn extract(atlas: &GlyphAtlas, cells: &[GlyphCell], fixed_block_width: Option<u32>) -> Self {
        if let Some(block) = fixed_block_width {
            return Self::uniform(GlyphMetrics {
                left_edge_offset: 0,
                width: block as i32,
            });
        }

        let mut table = Self::default();
        for (code, cell) in cells.iter().enumerate().take(GLYPH_COUNT) {
            table.entries[code] = measure_cell(atlas, cell);
        }
        table
    }
}

/// Ink bounding box of one cell
fn measure_cell(atlas: &GlyphAtlas, cell: &GlyphCell) -> GlyphMetrics {
    let full = GlyphMetrics {
        left_edge_offset: 0,
        width: atlas.cell_width as i32,
    };

    if cell.blank {
        return full;
    }

    let mut farthest_left: Option<u32> = None;
    let mut farthest_right = 0u32;

    for (x, _, pixel) in cell.image.enumerate_pixels() {
        if is_ink(pixel[3]) {
            farthest_left = Some(farthest_left.map_or(x, |left| left.min(x)));
            farthest_right = farthest_right.max(x);
        }
    }

    // Faint-only cell: visible but nothing above the ink threshold
    match farthest_left {
        Some(left) => GlyphMetrics {
            left_edge_offset: left as i32,
            width: (farthest_right - left + 1) as i32,
        },
        None => full,
    }
}
