//! `Shader`/`Uniform` records: one per `[section]` of the project file (spec §3 "Shader (core's
//! view)", §6 "Project file").

use glam::IVec2;
use shaq_sel::codegen::ExeExpr;
use shaq_sel::types::Type;

use crate::backend::{GlFormat, ProgramHandle, TextureFilter, TextureHandle, TextureWrap, GL_RGBA};

/// A compiled `uniform <type> <name> = <expr>` binding.
pub struct Uniform<'src> {
    pub name: String,
    pub declared_type: Type,
    pub exe: ExeExpr<'src>,
    pub gl_location: i32,
    pub filter: TextureFilter,
    pub wrap: TextureWrap,
}

impl<'src> Uniform<'src> {
    pub fn new(name: String, declared_type: Type, exe: ExeExpr<'src>) -> Self {
        Self { name, declared_type, exe, gl_location: -1, filter: TextureFilter::default(), wrap: TextureWrap::default() }
    }
}

/// The two GPU-owned textures a shader ping-pongs between. `current` is this frame's render
/// target; after the frame draws, the pointers swap so next frame's `last` is this frame's
/// `current` (spec §4.8).
pub struct PingPong {
    a: TextureHandle,
    b: TextureHandle,
    current_is_a: bool,
}

impl PingPong {
    pub fn new(a: TextureHandle, b: TextureHandle) -> Self {
        Self { a, b, current_is_a: true }
    }

    pub fn current(&self) -> TextureHandle {
        if self.current_is_a { self.a } else { self.b }
    }

    pub fn last(&self) -> TextureHandle {
        if self.current_is_a { self.b } else { self.a }
    }

    pub fn swap(&mut self) {
        self.current_is_a = !self.current_is_a;
    }
}

/// One `[section]` of the project file: a fragment shader, its uniforms, and the render-graph
/// bookkeeping the scheduler maintains.
pub struct Shader<'src> {
    pub name: String,
    pub source_path: String,
    pub output_format: GlFormat,
    pub output_resolution: IVec2,
    pub uniforms: Vec<Uniform<'src>>,
    pub render_after: Vec<String>,
    /// Recomputed every time [`crate::graph::recompute_render_order`] runs; indices into the
    /// owning `Vec<Shader>`.
    pub shader_depends: Vec<usize>,
    pub program: Option<ProgramHandle>,
    pub textures: Option<PingPong>,
}

impl<'src> Shader<'src> {
    pub fn new(name: String, source_path: String, output_resolution: IVec2) -> Self {
        Self {
            name,
            source_path,
            output_format: GL_RGBA,
            output_resolution,
            uniforms: Vec::new(),
            render_after: Vec::new(),
            shader_depends: Vec::new(),
            program: None,
            textures: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pong_swaps_current_and_last() {
        let mut pp = PingPong::new(TextureHandle(1), TextureHandle(2));
        assert_eq!(pp.current(), TextureHandle(1));
        assert_eq!(pp.last(), TextureHandle(2));
        pp.swap();
        assert_eq!(pp.current(), TextureHandle(2));
        assert_eq!(pp.last(), TextureHandle(1));
    }
}
