//! Sprite rendering backends
//!
//! Handles:
//! - The `SpriteBackend` interface fonts draw through
//! - OpenGL ES sprite upload and drawing (glow)
//! - A headless recording backend

pub mod backend;
pub mod shader;
pub mod sprite_renderer;

pub use backend::{DrawRecord, RecordedSprite, RecordingBackend, SpriteBackend};
pub use sprite_renderer::{GlSprite, GlSpriteRenderer};
