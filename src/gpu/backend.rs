//! Sprite backend interface
//!
//! Fonts upload one sprite per non-blank glyph and draw them through this
//! trait, so the same font works against OpenGL or a headless recorder.

use anyhow::Result;
use image::RgbaImage;
use log::debug;

use crate::geometry::Point;

/// Rendering backend that owns sprite resources
pub trait SpriteBackend {
    /// Opaque per-sprite handle
    type Handle;

    /// Upload an RGBA image as a drawable sprite
    fn upload_sprite(&mut self, image: &RgbaImage) -> Result<Self::Handle>;

    /// Free a sprite previously returned by `upload_sprite`
    fn release_sprite(&mut self, handle: Self::Handle);

    /// Draw a sprite centered on `position`, scaled by `scale` world units per pixel
    fn draw_sprite(&mut self, handle: &Self::Handle, position: Point, scale: f64);
}

/// Handle issued by [`RecordingBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordedSprite {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

/// One recorded draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    pub sprite: RecordedSprite,
    pub position: Point,
    pub scale: f64,
}

/// Headless backend that records uploads and draws
///
/// Used by the CLI (no display required) and by tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u32,
    /// Sprites currently alive
    live: Vec<RecordedSprite>,
    /// Draw calls since the last `clear_draws`
    pub draws: Vec<DrawRecord>,
    /// Total uploads over the backend's lifetime
    pub uploads: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sprites uploaded and not yet released
    pub fn live_sprites(&self) -> usize {
        self.live.len()
    }

    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }
}

impl SpriteBackend for RecordingBackend {
    type Handle = RecordedSprite;

    fn upload_sprite(&mut self, image: &RgbaImage) -> Result<RecordedSprite> {
        let sprite = RecordedSprite {
            id: self.next_id,
            width: image.width(),
            height: image.height(),
        };
        self.next_id += 1;
        self.uploads += 1;
        self.live.push(sprite);
        Ok(sprite)
    }

    fn release_sprite(&mut self, handle: RecordedSprite) {
        if let Some(pos) = self.live.iter().position(|s| s.id == handle.id) {
            self.live.remove(pos);
        } else {
            debug!("Release of unknown sprite id={}", handle.id);
        }
    }

    fn draw_sprite(&mut self, handle: &RecordedSprite, position: Point, scale: f64) {
        self.draws.push(DrawRecord {
            sprite: *handle,
            position,
            scale,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_release_cycle() {
        let mut backend = RecordingBackend::new();
        let a = backend.upload_sprite(&RgbaImage::new(4, 8)).unwrap();
        let b = backend.upload_sprite(&RgbaImage::new(4, 8)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!((a.width, a.height), (4, 8));
        assert_eq!(backend.live_sprites(), 2);

        backend.draw_sprite(&a, Point::new(1.0, 2.0), 0.5);
        assert_eq!(backend.draws.len(), 1);
        assert_eq!(backend.draws[0].sprite, a);

        backend.release_sprite(a);
        backend.release_sprite(a);
        assert_eq!(backend.live_sprites(), 1);
        assert_eq!(backend.uploads, 2);
    }
}
