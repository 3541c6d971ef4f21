//! Sprite renderer
//!
//! Uploads glyph sprites as RGBA textures and draws them as textured quads
//! centered on their positions. Draws are queued and flushed once per frame,
//! one quad per draw since every glyph is its own texture.

use anyhow::{anyhow, Result};
use glow::HasContext;
use image::RgbaImage;
use log::{debug, info};

use crate::geometry::Point;

use super::backend::SpriteBackend;
use super::shader::{ortho_projection, SpriteShader};

/// Per-vertex data: position(2) + UV(2) = 4 floats
const VERTEX_FLOATS: usize = 4;
/// 1 sprite = 4 vertices
const VERTICES_PER_SPRITE: usize = 4;
/// 1 sprite = 6 indices (2 triangles)
const INDICES_PER_SPRITE: usize = 6;
/// Floats in one quad's vertex data
const QUAD_FLOATS: usize = VERTEX_FLOATS * VERTICES_PER_SPRITE;
/// Index data for the single quad in the vertex buffer
const QUAD_INDICES: [u16; INDICES_PER_SPRITE] = [0, 1, 2, 0, 2, 3];

/// GPU sprite handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlSprite {
    texture: glow::Texture,
    /// Sprite width (pixels)
    pub width: u32,
    /// Sprite height (pixels)
    pub height: u32,
}

/// Queued sprite draw
struct DrawCall {
    texture: glow::Texture,
    vertices: [f32; QUAD_FLOATS],
}

/// Vertex data (position + UV per corner) of a `width`x`height` pixel sprite
/// scaled by `scale` and centered on `position`.
///
/// Corner order: top-left, top-right, bottom-right, bottom-left.
pub fn sprite_quad(width: u32, height: u32, position: Point, scale: f64) -> [f32; QUAD_FLOATS] {
    let w = (width as f64 * scale) as f32;
    let h = (height as f64 * scale) as f32;
    let x = position.x as f32 - w / 2.0;
    let y = position.y as f32 - h / 2.0;

    #[rustfmt::skip]
    let vertices = [
        x,     y,     0.0, 0.0,
        x + w, y,     1.0, 0.0,
        x + w, y + h, 1.0, 1.0,
        x,     y + h, 0.0, 1.0,
    ];
    vertices
}

/// OpenGL ES sprite backend
pub struct GlSpriteRenderer<'gl> {
    gl: &'gl glow::Context,
    shader: SpriteShader,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    /// Color multiplied into every sprite
    tint: [f32; 4],
    /// Live texture count
    textures: usize,
    /// Draw queue
    draw_queue: Vec<DrawCall>,
}

impl<'gl> GlSpriteRenderer<'gl> {
    /// Create GlSpriteRenderer
    pub fn new(gl: &'gl glow::Context) -> Result<Self> {
        let shader = SpriteShader::new(gl)?;

        unsafe {
            // VAO
            let vao = gl
                .create_vertex_array()
                .map_err(|e| anyhow!("Failed to create VAO (sprite): {}", e))?;
            gl.bind_vertex_array(Some(vao));

            // VBO
            let vbo = gl
                .create_buffer()
                .map_err(|e| anyhow!("Failed to create VBO (sprite): {}", e))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            let vbo_size = QUAD_FLOATS * 4;
            gl.buffer_data_size(glow::ARRAY_BUFFER, vbo_size as i32, glow::DYNAMIC_DRAW);

            // EBO
            let ebo = gl
                .create_buffer()
                .map_err(|e| anyhow!("Failed to create EBO (sprite): {}", e))?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));

            let index_bytes: Vec<u8> = QUAD_INDICES.iter().flat_map(|i| i.to_ne_bytes()).collect();
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, &index_bytes, glow::STATIC_DRAW);

            let stride = (VERTEX_FLOATS * 4) as i32;

            // a_pos: location=0, vec2
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);

            // a_uv: location=1, vec2
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, 8);

            gl.bind_vertex_array(None);

            info!("GlSpriteRenderer initialized");

            Ok(Self {
                gl,
                shader,
                vao,
                vbo,
                ebo,
                tint: [1.0, 1.0, 1.0, 1.0],
                textures: 0,
                draw_queue: Vec::new(),
            })
        }
    }

    /// Set the color applied to subsequently flushed sprites
    pub fn set_tint(&mut self, tint: [f32; 4]) {
        self.tint = tint;
    }

    /// Clear draw queue
    pub fn begin(&mut self) {
        self.draw_queue.clear();
    }

    /// Draw queued sprites into a view of the given size (same units as positions)
    pub fn flush(&mut self, view_width: f32, view_height: f32) {
        if self.draw_queue.is_empty() {
            return;
        }

        let gl = self.gl;
        unsafe {
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            self.shader.bind(gl);
            let projection = ortho_projection(view_width, view_height);
            self.shader.set_projection(gl, &projection);
            self.shader.set_sprite_unit(gl, 0);
            self.shader.set_tint(gl, self.tint);

            gl.bind_vertex_array(Some(self.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.active_texture(glow::TEXTURE0);

            // One draw per sprite (each glyph is its own texture)
            for call in &self.draw_queue {
                let vertex_bytes: Vec<u8> =
                    call.vertices.iter().flat_map(|v| v.to_ne_bytes()).collect();
                gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, &vertex_bytes);

                gl.bind_texture(glow::TEXTURE_2D, Some(call.texture));
                gl.draw_elements(glow::TRIANGLES, INDICES_PER_SPRITE as i32, glow::UNSIGNED_SHORT, 0);
            }

            gl.bind_vertex_array(None);
            gl.disable(glow::BLEND);
        }

        debug!("Flushed {} sprites", self.draw_queue.len());
        self.draw_queue.clear();
    }

    /// Release resources
    ///
    /// Sprites must already have been released by their fonts.
    pub fn destroy(self) {
        if self.textures > 0 {
            log::warn!("GlSpriteRenderer destroyed with {} live sprites", self.textures);
        }
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
        }
        self.shader.destroy(self.gl);
    }
}

impl SpriteBackend for GlSpriteRenderer<'_> {
    type Handle = GlSprite;

    fn upload_sprite(&mut self, image: &RgbaImage) -> Result<GlSprite> {
        let gl = self.gl;
        unsafe {
            let texture = gl
                .create_texture()
                .map_err(|e| anyhow!("Failed to create texture: {}", e))?;

            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                image.width() as i32,
                image.height() as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(image.as_raw()),
            );

            // Pixel art: no smoothing between texels
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );

            gl.bind_texture(glow::TEXTURE_2D, None);

            self.textures += 1;
            Ok(GlSprite {
                texture,
                width: image.width(),
                height: image.height(),
            })
        }
    }

    fn release_sprite(&mut self, handle: GlSprite) {
        unsafe {
            self.gl.delete_texture(handle.texture);
        }
        self.textures = self.textures.saturating_sub(1);
    }

    fn draw_sprite(&mut self, handle: &GlSprite, position: Point, scale: f64) {
        self.draw_queue.push(DrawCall {
            texture: handle.texture,
            vertices: sprite_quad(handle.width, handle.height, position, scale),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_centered_on_position() {
        // 16x16 sprite at 1/16 scale is one unit square around (3, 2)
        let quad = sprite_quad(16, 16, Point::new(3.0, 2.0), 1.0 / 16.0);
        assert_eq!(&quad[0..4], &[2.5, 1.5, 0.0, 0.0]);
        assert_eq!(&quad[4..8], &[3.5, 1.5, 1.0, 0.0]);
        assert_eq!(&quad[8..12], &[3.5, 2.5, 1.0, 1.0]);
        assert_eq!(&quad[12..16], &[2.5, 2.5, 0.0, 1.0]);
    }

    #[test]
    fn test_quad_scales_non_square_sprites() {
        // Accent cell: 8 wide, 16 tall
        let quad = sprite_quad(8, 16, Point::new(0.0, 0.0), 0.5);
        assert_eq!((quad[0], quad[1]), (-2.0, -4.0));
        assert_eq!((quad[8], quad[9]), (2.0, 4.0));
    }

    #[test]
    fn test_quad_indices_cover_two_triangles() {
        assert_eq!(QUAD_INDICES.len(), INDICES_PER_SPRITE);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < VERTICES_PER_SPRITE));
    }
}
