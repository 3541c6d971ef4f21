//! bitfont - grid bitmap font engine
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │   Atlas image (16x16 grid, red = ink)    │
//! ├──────────────────────────────────────────┤
//! │  Slicer  →  Glyph metrics  →  Kerning    │
//! │                          ↓               │
//! │   BitmapFont (tables + sprite handles)   │
//! │                          ↓               │
//! │   Layout / measure  →  SpriteBackend     │
//! └──────────────────────────────────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod font;
pub mod geometry;
pub mod gpu;
pub mod text;

pub use config::{Config, FontConfig};
pub use error::{FontError, FontResult};
pub use font::{Alignment, BitmapFont, GlyphMetrics};
pub use geometry::Point;
pub use gpu::{RecordingBackend, SpriteBackend};
pub use text::UnmappablePolicy;
