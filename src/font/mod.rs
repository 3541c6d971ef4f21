//! Bitmap font loading, metrics and layout
//!
//! Handles:
//! - Slicing a 16x16 glyph atlas into cells
//! - Ink-based glyph metrics (pseudo-kerning)
//! - Pairwise true kerning
//! - Sprite ownership
//! - String measurement and layout

pub mod atlas;
pub mod bitmap;
pub mod kerning;
pub mod layout;
pub mod metrics;
pub mod sprites;

pub use atlas::{GlyphAtlas, GlyphCell};
pub use bitmap::BitmapFont;
pub use kerning::KerningTable;
pub use layout::{Alignment, GlyphSpacing, Layout};
pub use metrics::{GlyphMetrics, MetricsTable};
pub use sprites::SpriteStore;
