//! Wires `shaq_sel`/`shaq_host`/`shaq_render`/`shaq_project` into the main loop spec §5 describes:
//! poll for a project reload, evaluate every shader's uniforms in scheduler order, draw, swap
//! ping-pong textures, blit the selected shader to the screen.

use std::path::Path;

use glam::IVec2;
use shaq_host::{Session, SessionArena};
use shaq_render::backend::{GpuBackend, TextureHandle};
use shaq_render::shader::PingPong;
use shaq_render::uniforms::{update_uniforms, TextureResolver};
use shaq_render::{NameLookup, Shader};
use shaq_sel::vm::Vm;
use tracing::{info, warn};

use crate::fps_limiter::FrameLimiter;
use crate::reload::ReloadWatcher;

const TEXTURE_CACHE_SLOTS: usize = 64;
const TEXTURE_CACHE_BACKING_BYTES: usize = 64 * 1024 * 1024;
const DEFAULT_RESOLUTION: IVec2 = IVec2::new(1280, 720);
const TARGET_FPS: u32 = 60;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Project(#[from] shaq_project::ProjectError),
}

/// Snapshot of every shader's resident texture handles, taken once per frame before any shader's
/// uniforms are evaluated, so `output_of`/`last_output_of` resolution never needs to alias a
/// `&mut Shader` against the `&[Shader]` the resolver would otherwise borrow from.
struct FrameTextures {
    current: Vec<Option<TextureHandle>>,
    last: Vec<Option<TextureHandle>>,
}

impl TextureResolver for FrameTextures {
    fn current_texture_of(&self, shader_index: usize) -> Option<TextureHandle> {
        self.current.get(shader_index).copied().flatten()
    }

    fn last_texture_of(&self, shader_index: usize) -> Option<TextureHandle> {
        self.last.get(shader_index).copied().flatten()
    }

    fn cached_image(&self, slot: u32) -> Option<TextureHandle> {
        // The headless backend doesn't track real GPU-resident image uploads; any stand-in handle
        // derived from the slot index is enough for it to log a bind call against.
        Some(TextureHandle(slot))
    }
}

/// Runs the sandbox against `project_path` until the process is killed. `seed` drives the
/// session's `rand`/`randi` PRNG (spec §5).
pub fn run(project_path: &Path, seed: Option<u64>, backend: &mut dyn GpuBackend) -> Result<(), AppError> {
    let mut vm = Vm::new();
    let mut session = Session::new(seed, TEXTURE_CACHE_SLOTS, TEXTURE_CACHE_BACKING_BYTES);
    let mut limiter = FrameLimiter::new(TARGET_FPS);

    'reload: loop {
        let arena = SessionArena::new();
        let mut shaders = shaq_project::load_project(project_path, &arena, DEFAULT_RESOLUTION)?;
        prepare_gpu_resources(&mut shaders, backend);
        info!("loaded project {} with {} shader(s)", project_path.display(), shaders.len());

        let mut watcher = ReloadWatcher::new(project_path);

        loop {
            session.begin_frame();

            if watcher.poll_changed() {
                info!("project file changed; reloading");
                release_gpu_resources(&mut shaders, backend);
                continue 'reload;
            }

            let order = shaq_render::recompute_render_order(&mut shaders, &mut vm, &mut session);
            let names: Vec<String> = shaders.iter().map(|shader| shader.name.clone()).collect();

            let textures = FrameTextures {
                current: shaders.iter().map(|shader| shader.textures.as_ref().map(PingPong::current)).collect(),
                last: shaders.iter().map(|shader| shader.textures.as_ref().map(PingPong::last)).collect(),
            };

            for &index in &order {
                draw_shader(&mut shaders[index], &textures, &names, &mut vm, &mut session, backend);
            }

            for shader in shaders.iter_mut() {
                if let Some(textures) = &mut shader.textures {
                    textures.swap();
                }
            }

            if let Some(&selected) = order.last() {
                if let Some(pp) = &shaders[selected].textures {
                    if let Err(err) = backend.blit_to_screen(pp.last(), shaders[selected].output_resolution) {
                        warn!("failed to blit {} to screen: {}", shaders[selected].name, err);
                    }
                }
            }

            session.end_frame();
            limiter.block_until_ready();
        }
    }
}

fn draw_shader(
    shader: &mut Shader<'_>,
    textures: &FrameTextures,
    names: &[String],
    vm: &mut Vm,
    session: &mut Session,
    backend: &mut dyn GpuBackend,
) {
    let Some(program) = shader.program else { return };
    let Some(current) = shader.textures.as_ref().map(PingPong::current) else { return };

    if let Err(err) = backend.bind_render_target(current) {
        warn!("failed to bind render target for {}: {}", shader.name, err);
        return;
    }

    let mut lookup = NameLookup::new(names);
    match update_uniforms(shader, textures, &mut lookup, vm, session, backend) {
        Ok(()) => {}
        Err(shaq_render::uniforms::UniformUpdateError::Runtime(err)) => {
            panic!("runtime VM error updating uniforms for {}: {}", shader.name, err);
        }
        Err(err) => {
            warn!("failed to update uniforms for {}: {}", shader.name, err);
            return;
        }
    }

    if let Err(err) = backend.draw_fullscreen_triangle(program) {
        warn!("draw failed for {}: {}", shader.name, err);
    }
}

/// Compiles each shader's fragment program and allocates its ping-pong textures. A shader whose
/// source fails to read or compile keeps `program = None`; the draw loop skips it, and its
/// existing texture (if any) stays untouched (spec §4.9).
fn prepare_gpu_resources(shaders: &mut [Shader<'_>], backend: &mut dyn GpuBackend) {
    for shader in shaders.iter_mut() {
        let source = match std::fs::read_to_string(&shader.source_path) {
            Ok(source) => source,
            Err(err) => {
                warn!("failed to read shader source {}: {}", shader.source_path, err);
                continue;
            }
        };

        match backend.compile_program(&source) {
            Ok(program) => shader.program = Some(program),
            Err(err) => {
                warn!("failed to compile shader {}: {}", shader.name, err);
                continue;
            }
        }

        let resolution = shader.output_resolution;
        let format = shader.output_format;
        let textures = (|| {
            let a = backend.create_texture(format, resolution)?;
            let b = backend.create_texture(format, resolution)?;
            Ok::<_, shaq_render::backend::GpuError>(PingPong::new(a, b))
        })();
        match textures {
            Ok(pp) => shader.textures = Some(pp),
            Err(err) => warn!("failed to allocate render textures for {}: {}", shader.name, err),
        }

        if let Some(program) = shader.program {
            for uniform in shader.uniforms.iter_mut() {
                uniform.gl_location = backend.uniform_location(program, &uniform.name);
            }
        }
    }
}

fn release_gpu_resources(shaders: &mut [Shader<'_>], backend: &mut dyn GpuBackend) {
    for shader in shaders.iter_mut() {
        if let Some(program) = shader.program.take() {
            backend.delete_program(program);
        }
        if let Some(pp) = shader.textures.take() {
            backend.delete_texture(pp.current());
            backend.delete_texture(pp.last());
        }
    }
}
