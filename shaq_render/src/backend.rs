//! The GL wire-format contract the (out-of-scope) GPU driver must satisfy, spec §6 "GLSL uniform
//! wire format". Modeling the driver as a trait rather than calling into a GL binding directly
//! keeps every other module in this crate (scheduling, uniform binding) free of an actual GPU
//! context, the same separation `shaq_sel::host::HostContext` draws between SEL and everything
//! host-side.

use glam::IVec2;
use shaq_sel::types::{SelValue, Type};

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("shader compile failed: {log}")]
    CompileFailed { log: String },
    #[error("program link failed: {log}")]
    LinkFailed { log: String },
    #[error("GPU call failed: {0}")]
    Other(String),
}

/// A GL internal-format enum value (e.g. `GL_RGBA`), carried opaquely since this crate never
/// calls into GL itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlFormat(pub u32);

/// `GL_RGBA`, the project file's documented default `output_format`.
pub const GL_RGBA: GlFormat = GlFormat(0x1908);

impl Default for GlFormat {
    fn default() -> Self {
        GL_RGBA
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureFilter {
    #[default]
    Linear,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureWrap {
    #[default]
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle(pub u32);

/// The driver seam. A real implementation wraps an actual GL (or GLES/ANGLE) context; tests in
/// this crate use a recording fake.
pub trait GpuBackend {
    fn compile_program(&mut self, fragment_source: &str) -> Result<ProgramHandle, GpuError>;
    fn delete_program(&mut self, program: ProgramHandle);

    fn create_texture(&mut self, format: GlFormat, resolution: IVec2) -> Result<TextureHandle, GpuError>;
    fn resize_texture(&mut self, texture: TextureHandle, resolution: IVec2) -> Result<(), GpuError>;
    fn delete_texture(&mut self, texture: TextureHandle);

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> i32;

    /// Writes a non-texture uniform's raw `SelValue` payload using the GL call family matching
    /// `ty` (scalar/`*v`/`Matrix*fv`, non-transposing, column-major).
    ///
    /// # Safety
    ///
    /// `value` must have been populated using `ty`.
    unsafe fn set_uniform(
        &mut self,
        program: ProgramHandle,
        location: i32,
        ty: Type,
        value: &SelValue,
    ) -> Result<(), GpuError>;

    /// Binds `texture` to `unit` with the given sampler parameters and writes `unit` as a signed
    /// int uniform at `location`.
    fn bind_sampler_uniform(
        &mut self,
        program: ProgramHandle,
        location: i32,
        unit: u32,
        texture: TextureHandle,
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> Result<(), GpuError>;

    fn bind_render_target(&mut self, texture: TextureHandle) -> Result<(), GpuError>;
    fn draw_fullscreen_triangle(&mut self, program: ProgramHandle) -> Result<(), GpuError>;

    /// Samples `texture` (scaled to `resolution`) into the default framebuffer, the built-in
    /// final pass (spec §6 "Fragment shader contract").
    fn blit_to_screen(&mut self, texture: TextureHandle, resolution: IVec2) -> Result<(), GpuError>;
}
