//! True kerning
//!
//! Pseudo-kerning trims each glyph to its own ink. True kerning goes one
//! step further and looks at how two specific glyphs fit together row by
//! row, pulling the pair closer when every row leaves a gap.

use log::{debug, trace};

use crate::constants::{is_ink, GLYPH_COUNT};

use super::atlas::{GlyphAtlas, GlyphCell};
use super::metrics::MetricsTable;

/// Offsets applied when the second glyph follows the first (atlas pixels)
pub type KerningRow = [i32; GLYPH_COUNT];

/// Dense 256x256 kerning table with one optional row per leading glyph
///
/// A missing row means every pair starting with that glyph has offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KerningTable {
    rows: Vec<Option<Box<KerningRow>>>,
}

impl Default for KerningTable {
    fn default() -> Self {
        Self {
            rows: vec![None; GLYPH_COUNT],
        }
    }
}

impl KerningTable {
    /// Offset for `second` following `first`
    #[inline]
    pub fn offset(&self, first: u8, second: u8) -> i32 {
        self.rows[first as usize]
            .as_ref()
            .map_or(0, |row| row[second as usize])
    }

    pub fn has_row(&self, first: u8) -> bool {
        self.rows[first as usize].is_some()
    }

    /// Number of leading glyphs with a row
    pub fn row_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }

    /// True when no row exists at all
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Build the table for every ordered pair of non-blank glyphs
    pub fn build(atlas: &GlyphAtlas, cells: &[GlyphCell], metrics: &MetricsTable) -> Self {
        let extremes: Vec<Option<RowExtremes>> = cells
            .iter()
            .take(GLYPH_COUNT)
            .map(|cell| (!cell.blank).then(|| RowExtremes::scan(atlas, cell)))
            .collect();

        let cell_width = atlas.cell_width as i32;
        let mut table = Self::default();
        let mut kerned_pairs = 0usize;

        for (i, first) in extremes.iter().enumerate() {
            let Some(first) = first else { continue };
            let first_metrics = metrics.get(i as u8);
            let mut row = Box::new([0i32; GLYPH_COUNT]);

            for (j, second) in extremes.iter().enumerate() {
                let Some(second) = second else { continue };

                // Tightest row-wise gap with the cells placed edge to edge
                let mut min_distance = first
                    .right
                    .iter()
                    .zip(&second.left)
                    .map(|(&right, &left)| (cell_width - right - 1) + left)
                    .fold(2 * cell_width, i32::min);

                // Pseudo-kerning already removed the gap left of the second glyph
                min_distance -= metrics.get(j as u8).left_edge_offset;
                // ...and the gap right of the first glyph
                min_distance -=
                    cell_width - (first_metrics.left_edge_offset + first_metrics.width);

                // Glyphs that never overlap horizontally must not be pulled
                // past the first glyph's own width
                if min_distance > 0 && min_distance < first_metrics.width {
                    row[j] = -min_distance;
                    kerned_pairs += 1;
                    trace!("kern {:02X} {:02X}: {}", i, j, -min_distance);
                }
            }

            table.rows[i] = Some(row);
        }

        debug!(
            "Kerning table built: {} rows, {} adjusted pairs",
            table.row_count(),
            kerned_pairs
        );

        table
    }
}

/// Per-row ink extremes of one glyph
#[derive(Debug, Clone, PartialEq, Eq)]
struct RowExtremes {
    /// Rightmost ink column per row (0 when the row is empty)
    right: Vec<i32>,
    /// Leftmost ink column per row, widened by the rows above and below
    /// (cell width when empty)
    left: Vec<i32>,
}

impl RowExtremes {
    fn scan(atlas: &GlyphAtlas, cell: &GlyphCell) -> Self {
        let width = atlas.cell_width;
        let height = atlas.cell_height;
        let mut right = Vec::with_capacity(height as usize);
        let mut left = Vec::with_capacity(height as usize);

        for y in 0..height {
            let ink_at = |x: u32, y: u32| is_ink(cell.alpha(x, y));

            let row_right = (0..width).rev().find(|&x| ink_at(x, y)).unwrap_or(0);

            // Neighbouring rows also count: diagonal strokes touch the next
            // glyph without sharing a row with it
            let row_left = (0..width)
                .find(|&x| {
                    ink_at(x, y)
                        || (y > 0 && ink_at(x, y - 1))
                        || (y + 1 < height && ink_at(x, y + 1))
                })
                .unwrap_or(width);

            right.push(row_right as i32);
            left.push(row_left as i32);
        }

        Self { right, left }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const CELL: u32 = 8;

    fn atlas() -> GlyphAtlas {
        GlyphAtlas::from_dimensions(CELL * 16, CELL * 16).unwrap()
    }

    fn cell(ink: &[(u32, u32)]) -> GlyphCell {
        let mut image = RgbaImage::from_pixel(CELL, CELL, Rgba([255, 255, 255, 0]));
        for &(x, y) in ink {
            image.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
        let blank = ink.is_empty();
        GlyphCell { image, blank }
    }

    fn cells_with(glyphs: &[(u8, GlyphCell)]) -> Vec<GlyphCell> {
        let mut cells: Vec<GlyphCell> = (0..256).map(|_| cell(&[])).collect();
        for (code, glyph) in glyphs {
            cells[*code as usize] = glyph.clone();
        }
        cells
    }

    #[test]
    fn test_diagonal_neighbour_widens_left_extreme() {
        // Stroke going down-right: (1,0) (2,1) (3,2)
        let extremes = RowExtremes::scan(&atlas(), &cell(&[(1, 0), (2, 1), (3, 2)]));
        assert_eq!(extremes.left[0], 1);
        // Row 1 sees row 0's ink at x=1
        assert_eq!(extremes.left[1], 1);
        assert_eq!(extremes.left[2], 2);
        assert_eq!(extremes.left[3], 3);
        assert_eq!(extremes.left[5], CELL as i32);
        assert_eq!(extremes.right[2], 3);
        assert_eq!(extremes.right[5], 0);
    }

    #[test]
    fn test_blank_glyphs_have_no_row() {
        let cells = cells_with(&[(b'L', cell(&[(1, 0), (1, 7), (5, 7)]))]);
        let metrics = MetricsTable::extract(&atlas(), &cells, None);
        let table = KerningTable::build(&atlas(), &cells, &metrics);

        assert!(table.has_row(b'L'));
        assert!(!table.has_row(b' '));
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.offset(b' ', b'L'), 0);
    }

    #[test]
    fn test_step_shapes_are_pulled_together() {
        // 'L': stem at x=1 rows 0-7, foot to x=5 on row 7
        let mut l_ink: Vec<(u32, u32)> = (0..CELL).map(|y| (1, y)).collect();
        l_ink.extend((2..=5).map(|x| (x, 7)));
        // 'T'-like top bar only on rows 0-1 from x=0 to x=4
        let t_ink: Vec<(u32, u32)> = (0..=4).flat_map(|x| [(x, 0), (x, 1)]).collect();

        let cells = cells_with(&[(b'L', cell(&l_ink)), (b'T', cell(&t_ink))]);
        let metrics = MetricsTable::extract(&atlas(), &cells, None);
        let table = KerningTable::build(&atlas(), &cells, &metrics);

        // L: left 1, width 5. T: left 0, width 5.
        // Rows 0-1: right_L = 1, left_T = 0 (row 2 also sees row 1) -> 6
        // Row 7:    right_L = 5, left_T = 8 -> 10
        // min 6, minus left_T 0, minus trailing gap (8 - 6) = 4
        assert_eq!(table.offset(b'L', b'T'), -4);

        let offset = table.offset(b'T', b'L');
        assert!(offset <= 0);
        assert!(offset.abs() < metrics.get(b'T').width);
    }

    #[test]
    fn test_offsets_never_exceed_first_width() {
        let cells = cells_with(&[
            (b'.', cell(&[(3, 7)])),
            (b'\'', cell(&[(3, 0)])),
            (b'/', cell(&[(0, 7), (1, 6), (2, 5), (3, 4), (4, 3), (5, 2), (6, 1), (7, 0)])),
        ]);
        let metrics = MetricsTable::extract(&atlas(), &cells, None);
        let table = KerningTable::build(&atlas(), &cells, &metrics);

        for i in [b'.', b'\'', b'/'] {
            for j in [b'.', b'\'', b'/'] {
                let offset = table.offset(i, j);
                assert!(offset <= 0, "{} {} -> {}", i, j, offset);
                assert!(offset.abs() < metrics.get(i).width.max(1));
            }
        }
        // A period and an apostrophe never share a row: no overlap allowed
        assert_eq!(table.offset(b'.', b'\''), 0);
    }
}
