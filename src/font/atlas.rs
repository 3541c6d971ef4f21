//! Glyph atlas slicing
//!
//! Splits a 16x16 grid atlas image into one cell per code point.
//! The red channel is treated as ink coverage: every output pixel becomes
//! white with alpha copied from red, so single-channel mask art works as-is.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};
use log::{debug, info};

use crate::constants::{GLYPH_COUNT, GRID_CELLS};
use crate::error::{FontError, FontResult};

/// Atlas geometry, fixed once the image is sliced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphAtlas {
    /// Source image width (pixels)
    pub width: u32,
    /// Source image height (pixels)
    pub height: u32,
    /// Cell width (pixels)
    pub cell_width: u32,
    /// Cell height (pixels)
    pub cell_height: u32,
    /// Cells are taller than wide: upper half reserved for diacritics
    pub accents_present: bool,
}

impl GlyphAtlas {
    /// Validate image dimensions and derive the cell size
    pub fn from_dimensions(width: u32, height: u32) -> FontResult<Self> {
        if width == 0 || height == 0 || width % GRID_CELLS != 0 || height % GRID_CELLS != 0 {
            return Err(FontError::MalformedAtlas { width, height });
        }

        let cell_width = width / GRID_CELLS;
        let cell_height = height / GRID_CELLS;

        Ok(Self {
            width,
            height,
            cell_width,
            cell_height,
            accents_present: cell_height != cell_width,
        })
    }
}

/// One sliced grid cell
///
/// Pixel data is only kept while metrics and kerning are derived.
#[derive(Debug, Clone)]
pub struct GlyphCell {
    /// White RGB, alpha = source red channel
    pub image: RgbaImage,
    /// Every pixel has zero alpha
    pub blank: bool,
}

impl GlyphCell {
    /// Alpha at (x, y) within the cell
    #[inline]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel(x, y)[3]
    }
}

/// Decode an atlas image from disk
pub fn load_atlas_image(path: &Path) -> FontResult<RgbaImage> {
    let image = image::open(path).map_err(|source| FontError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = image.to_rgba8();
    info!(
        "Atlas image loaded: {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}

/// Convert red-channel coverage into a white alpha mask
pub fn red_to_alpha_mask(image: &RgbaImage) -> RgbaImage {
    let mut masked = image.clone();
    for pixel in masked.pixels_mut() {
        let coverage = pixel[0];
        *pixel = Rgba([255, 255, 255, coverage]);
    }
    masked
}

/// Slice an atlas into 256 cells, indexed by code point
pub fn slice_atlas(image: &RgbaImage) -> FontResult<(GlyphAtlas, Vec<GlyphCell>)> {
    let atlas = GlyphAtlas::from_dimensions(image.width(), image.height())?;
    let masked = red_to_alpha_mask(image);

    let mut cells = Vec::with_capacity(GLYPH_COUNT);
    for code in 0..GLYPH_COUNT {
        let (col, row) = crate::constants::cell_position(code as u8);
        let cell_image = imageops::crop_imm(
            &masked,
            col * atlas.cell_width,
            row * atlas.cell_height,
            atlas.cell_width,
            atlas.cell_height,
        )
        .to_image();

        // Don't bother consuming texture memory for blank cells
        let blank = cell_image.pixels().all(|p| p[3] == 0);

        cells.push(GlyphCell {
            image: cell_image,
            blank,
        });
    }

    debug!(
        "Atlas sliced: cell={}x{}, {} non-blank cells, accents={}",
        atlas.cell_width,
        atlas.cell_height,
        cells.iter().filter(|c| !c.blank).count(),
        atlas.accents_present
    );

    Ok((atlas, cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_grid_dimensions() {
        assert!(matches!(
            GlyphAtlas::from_dimensions(100, 128),
            Err(FontError::MalformedAtlas { width: 100, height: 128 })
        ));
        assert!(GlyphAtlas::from_dimensions(0, 0).is_err());
    }

    #[test]
    fn test_accent_detection() {
        let square = GlyphAtlas::from_dimensions(128, 128).unwrap();
        assert!(!square.accents_present);
        assert_eq!((square.cell_width, square.cell_height), (8, 8));

        let tall = GlyphAtlas::from_dimensions(128, 256).unwrap();
        assert!(tall.accents_present);
        assert_eq!(tall.cell_height, 16);
    }

    #[test]
    fn test_red_channel_becomes_alpha() {
        let mut image = RgbaImage::new(16, 16);
        image.put_pixel(3, 4, Rgba([200, 10, 20, 0]));
        let masked = red_to_alpha_mask(&image);
        assert_eq!(masked.get_pixel(3, 4), &Rgba([255, 255, 255, 200]));
        assert_eq!(masked.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
    }

    #[test]
    fn test_slice_places_cells_by_code() {
        // 4x4 cells; ink one pixel inside cell 'A' (0x41 = column 1, row 4)
        let mut image = RgbaImage::new(64, 64);
        image.put_pixel(4 + 2, 16 + 1, Rgba([255, 0, 0, 255]));

        let (atlas, cells) = slice_atlas(&image).unwrap();
        assert_eq!(atlas.cell_width, 4);
        assert_eq!(cells.len(), 256);
        assert!(!cells[b'A' as usize].blank);
        assert_eq!(cells[b'A' as usize].alpha(2, 1), 255);
        assert_eq!(cells.iter().filter(|c| !c.blank).count(), 1);
    }
}
