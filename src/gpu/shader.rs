//! Shader management
//!
//! GLSL ES 3.00 sprite shader compilation and linking

use anyhow::{anyhow, Result};
use glow::HasContext;
use log::info;

/// Sprite vertex shader (GLSL ES 3.00)
///
/// Input:
///   a_pos: Vertex position (view units)
///   a_uv:  Texture coordinates
/// Uniform:
///   u_projection: Orthographic projection matrix
const SPRITE_VERTEX_SHADER: &str = r#"#version 300 es
precision mediump float;

layout(location = 0) in vec2 a_pos;
layout(location = 1) in vec2 a_uv;

uniform mat4 u_projection;

out vec2 v_uv;

void main() {
    gl_Position = u_projection * vec4(a_pos, 0.0, 1.0);
    v_uv = a_uv;
}
"#;

/// Sprite fragment shader
///
/// Glyph sprites are white with coverage in alpha; tint multiplies both.
const SPRITE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

in vec2 v_uv;

uniform sampler2D u_sprite;
uniform vec4 u_tint;

out vec4 frag_color;

void main() {
    frag_color = texture(u_sprite, v_uv) * u_tint;
}
"#;

/// Sprite shader program and its uniforms
pub struct SpriteShader {
    program: glow::Program,
    u_projection: glow::UniformLocation,
    u_sprite: glow::UniformLocation,
    u_tint: glow::UniformLocation,
}

impl SpriteShader {
    pub fn new(gl: &glow::Context) -> Result<Self> {
        let program = compile_program(gl, SPRITE_VERTEX_SHADER, SPRITE_FRAGMENT_SHADER)?;

        let uniform = |name: &str| unsafe {
            gl.get_uniform_location(program, name)
                .ok_or_else(|| anyhow!("{} uniform not found (sprite)", name))
        };

        let shader = Self {
            program,
            u_projection: uniform("u_projection")?,
            u_sprite: uniform("u_sprite")?,
            u_tint: uniform("u_tint")?,
        };

        info!("Sprite shader compiled");
        Ok(shader)
    }

    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
        }
    }

    pub fn set_projection(&self, gl: &glow::Context, matrix: &[f32; 16]) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(&self.u_projection), false, matrix);
        }
    }

    pub fn set_sprite_unit(&self, gl: &glow::Context, unit: i32) {
        unsafe {
            gl.uniform_1_i32(Some(&self.u_sprite), unit);
        }
    }

    pub fn set_tint(&self, gl: &glow::Context, tint: [f32; 4]) {
        unsafe {
            gl.uniform_4_f32(Some(&self.u_tint), tint[0], tint[1], tint[2], tint[3]);
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
        }
    }
}

/// Orthographic projection with the origin at the top-left corner
pub fn ortho_projection(width: f32, height: f32) -> [f32; 16] {
    let l = 0.0_f32;
    let r = width;
    let t = 0.0_f32; // top
    let b = height; // bottom
    let n = -1.0_f32;
    let f = 1.0_f32;

    // Column-major (OpenGL convention)
    [
        2.0 / (r - l),
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 / (t - b),
        0.0,
        0.0,
        0.0,
        0.0,
        -2.0 / (f - n),
        0.0,
        -(r + l) / (r - l),
        -(t + b) / (t - b),
        -(f + n) / (f - n),
        1.0,
    ]
}

/// Compile shader and link program
fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program> {
    unsafe {
        let vs = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)?;
        let fs = compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src)?;

        let program = gl
            .create_program()
            .map_err(|e| anyhow!("Failed to create program (sprite): {}", e))?;

        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(anyhow!("Shader link failed (sprite): {}", log));
        }

        // Shader objects no longer needed after linking
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        Ok(program)
    }
}

/// Compile individual shader
fn compile_shader(gl: &glow::Context, shader_type: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl
            .create_shader(shader_type)
            .map_err(|e| anyhow!("Failed to create shader (sprite): {}", e))?;

        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            let type_name = match shader_type {
                glow::VERTEX_SHADER => "vertex",
                glow::FRAGMENT_SHADER => "fragment",
                _ => "unknown",
            };
            return Err(anyhow!(
                "{} shader compile failed (sprite): {}",
                type_name,
                log
            ));
        }

        Ok(shader)
    }
}
