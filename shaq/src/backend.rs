//! A headless [`GpuBackend`] implementation: the real GL/GLES driver is an out-of-scope external
//! collaborator (spec §1), so this stands in for it, recording every call as a log line instead
//! of touching an actual GPU context. A concrete windowed backend would implement the same trait
//! and could be swapped in without changing anything in `shaq_render` or the main loop below.

use glam::IVec2;
use shaq_render::backend::{
    GlFormat, GpuBackend, GpuError, ProgramHandle, TextureFilter, TextureHandle, TextureWrap,
};
use shaq_sel::types::{SelValue, Type};
use tracing::{debug, info};

/// Hands out monotonically increasing handles; never actually allocates GPU resources.
#[derive(Default)]
pub struct HeadlessBackend {
    next_program: u32,
    next_texture: u32,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GpuBackend for HeadlessBackend {
    fn compile_program(&mut self, fragment_source: &str) -> Result<ProgramHandle, GpuError> {
        self.next_program += 1;
        let handle = ProgramHandle(self.next_program);
        info!("compiled program {} from {}", handle.0, fragment_source);
        Ok(handle)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        debug!("deleted program {}", program.0);
    }

    fn create_texture(&mut self, format: GlFormat, resolution: IVec2) -> Result<TextureHandle, GpuError> {
        self.next_texture += 1;
        let handle = TextureHandle(self.next_texture);
        debug!("created texture {} ({:?}, {}x{})", handle.0, format, resolution.x, resolution.y);
        Ok(handle)
    }

    fn resize_texture(&mut self, texture: TextureHandle, resolution: IVec2) -> Result<(), GpuError> {
        debug!("resized texture {} to {}x{}", texture.0, resolution.x, resolution.y);
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        debug!("deleted texture {}", texture.0);
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> i32 {
        debug!("resolved uniform {} on program {}", name, program.0);
        1
    }

    unsafe fn set_uniform(
        &mut self,
        program: ProgramHandle,
        location: i32,
        ty: Type,
        _value: &SelValue,
    ) -> Result<(), GpuError> {
        debug!("program {} uniform @{} <- {} value", program.0, location, ty);
        Ok(())
    }

    fn bind_sampler_uniform(
        &mut self,
        program: ProgramHandle,
        location: i32,
        unit: u32,
        texture: TextureHandle,
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> Result<(), GpuError> {
        debug!(
            "program {} sampler @{} <- unit {} (texture {}, {:?}/{:?})",
            program.0, location, unit, texture.0, filter, wrap
        );
        Ok(())
    }

    fn bind_render_target(&mut self, texture: TextureHandle) -> Result<(), GpuError> {
        debug!("bound render target {}", texture.0);
        Ok(())
    }

    fn draw_fullscreen_triangle(&mut self, program: ProgramHandle) -> Result<(), GpuError> {
        debug!("drew fullscreen triangle with program {}", program.0);
        Ok(())
    }

    fn blit_to_screen(&mut self, texture: TextureHandle, resolution: IVec2) -> Result<(), GpuError> {
        debug!("blit texture {} to screen at {}x{}", texture.0, resolution.x, resolution.y);
        Ok(())
    }
}
