//! Per-glyph sprite ownership

use log::{debug, warn};

use crate::constants::GLYPH_COUNT;
use crate::gpu::SpriteBackend;

use super::atlas::GlyphCell;

/// One optional sprite handle per code point
pub struct SpriteStore<H> {
    sprites: Vec<Option<H>>,
}

impl<H> Default for SpriteStore<H> {
    fn default() -> Self {
        Self {
            sprites: (0..GLYPH_COUNT).map(|_| None).collect(),
        }
    }
}

impl<H> SpriteStore<H> {
    /// Upload every non-blank cell. Failed uploads leave the glyph without
    /// a sprite; its metrics are unaffected.
    pub fn upload<B>(backend: &mut B, cells: &[GlyphCell]) -> Self
    where
        B: SpriteBackend<Handle = H>,
    {
        let mut store = Self::default();
        for (code, cell) in cells.iter().enumerate().take(GLYPH_COUNT) {
            if cell.blank {
                continue;
            }
            match backend.upload_sprite(&cell.image) {
                Ok(handle) => store.sprites[code] = Some(handle),
                Err(e) => warn!("Sprite upload failed for glyph {:02X}: {:#}", code, e),
            }
        }
        debug!("Uploaded {} glyph sprites", store.len());
        store
    }

    #[inline]
    pub fn get(&self, code: u8) -> Option<&H> {
        self.sprites[code as usize].as_ref()
    }

    /// Number of glyphs holding a sprite
    pub fn len(&self) -> usize {
        self.sprites.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand every sprite back to the backend
    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: SpriteBackend<Handle = H>,
    {
        for handle in self.sprites.iter_mut().filter_map(Option::take) {
            backend.release_sprite(handle);
        }
    }
}

impl<H> Drop for SpriteStore<H> {
    fn drop(&mut self) {
        let leaked = self.len();
        if leaked > 0 {
            warn!("{} glyph sprites dropped without release", leaked);
        }
    }
}
