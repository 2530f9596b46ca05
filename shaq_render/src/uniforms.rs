//! Per-frame uniform evaluation and GL upload (spec §4.7 "Uniform binding", second half: "Each
//! frame, `shader_update_uniforms` iterates uniforms in declaration order").

use shaq_host::{Session, ShaderLookup};
use shaq_sel::types::{TextureDescriptor, Type};
use shaq_sel::vm::{RuntimeError, Vm};
use tracing::warn;

use crate::backend::{GpuBackend, GpuError, ProgramHandle, TextureHandle};
use crate::shader::Shader;

#[derive(Debug, thiserror::Error)]
pub enum UniformUpdateError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Looks up a shader's resident texture by the render-graph indices the scheduler already
/// resolved `output_of`/`last_output_of` to.
pub trait TextureResolver {
    fn current_texture_of(&self, shader_index: usize) -> Option<TextureHandle>;
    fn last_texture_of(&self, shader_index: usize) -> Option<TextureHandle>;
    fn cached_image(&self, slot: u32) -> Option<TextureHandle>;
}

/// Evaluates `shader`'s uniforms in declaration order and uploads each result, binding
/// texture-typed uniforms to successive texture units starting at 0 (spec §4.7).
pub fn update_uniforms(
    shader: &mut Shader<'_>,
    resolver: &dyn TextureResolver,
    shaders: &mut dyn ShaderLookup,
    vm: &mut Vm,
    session: &mut Session,
    backend: &mut dyn GpuBackend,
) -> Result<(), UniformUpdateError> {
    let Some(program) = shader.program else { return Ok(()) };

    let mut texture_unit = 0u32;
    for uniform in shader.uniforms.iter_mut() {
        if uniform.gl_location < 0 {
            continue;
        }
        let mut host = session.for_frame(&mut *shaders);
        let value = vm.eval(&mut uniform.exe, &mut host, false)?;

        if uniform.declared_type == Type::Texture {
            bind_texture_uniform(program, uniform, value, texture_unit, resolver, backend)?;
            texture_unit += 1;
        } else {
            // Safety: `value` was produced by evaluating `uniform.exe`, whose result type is
            // `uniform.declared_type`.
            unsafe {
                backend.set_uniform(program, uniform.gl_location, uniform.declared_type, &value)?;
            }
        }
    }
    Ok(())
}

fn bind_texture_uniform(
    program: ProgramHandle,
    uniform: &crate::shader::Uniform<'_>,
    value: shaq_sel::types::SelValue,
    unit: u32,
    resolver: &dyn TextureResolver,
    backend: &mut dyn GpuBackend,
) -> Result<(), UniformUpdateError> {
    // Safety: `uniform.declared_type == Type::Texture`, matching how `value` was populated.
    let descriptor = unsafe { TextureDescriptor::from(value.texture) };
    let texture = match descriptor {
        TextureDescriptor::CurrentOutputOf { index } => resolver.current_texture_of(index as usize),
        TextureDescriptor::LastOutputOf { index } => resolver.last_texture_of(index as usize),
        TextureDescriptor::LoadedImage { index } => resolver.cached_image(index),
        TextureDescriptor::Error => None,
    };

    let Some(texture) = texture else {
        warn!("texture uniform {} resolved to no backing texture this frame", uniform.name);
        return Ok(());
    };

    backend.bind_sampler_uniform(program, uniform.gl_location, unit, texture, uniform.filter, uniform.wrap)?;
    Ok(())
}
