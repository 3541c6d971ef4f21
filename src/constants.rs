//! Global constants for bitfont
//!
//! Consolidates atlas geometry, ink detection and scale constants
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Atlas Geometry
// ============================================================================

/// Number of glyph cells across the atlas (and down)
pub const GRID_CELLS: u32 = 16;

/// Number of addressable code points (one per grid cell)
pub const GLYPH_COUNT: usize = 256;

// ============================================================================
// Ink Detection
// ============================================================================

/// Alpha level counted as ink when measuring width and kerning.
/// Values at or below this are background, so faint anti-aliased tips
/// of pointed glyphs do not widen the glyph.
pub const INK_ALPHA: u8 = 127;

// ============================================================================
// Scale
// ============================================================================

/// Default base scale applied on top of each font's scale factor
/// (one atlas pixel = 1/16 world unit)
pub const DEFAULT_BASE_SCALE: f64 = 1.0 / 16.0;

/// Visual height factor for atlases carrying an accent region
pub const ACCENT_HEIGHT_FACTOR: f64 = 0.5;

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if an alpha value counts as ink
#[inline]
pub const fn is_ink(alpha: u8) -> bool {
    alpha > INK_ALPHA
}

/// Grid position (column, row) of a code point's cell
#[inline]
pub const fn cell_position(code: u8) -> (u32, u32) {
    (code as u32 % GRID_CELLS, code as u32 / GRID_CELLS)
}
