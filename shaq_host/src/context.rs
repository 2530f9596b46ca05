//! The concrete [`shaq_sel::host::HostContext`] implementation: bundles the per-session state
//! pieces in this crate (clock, input, widgets, texture cache, rng) plus a caller-supplied view
//! onto the render graph being built this frame, and threads that bundle into every native SEL
//! built-in exactly the way the trait's doc comment describes (spec §4.6, §9 REDESIGN FLAGS: no
//! process-global host state inside `shaq_sel` itself).
//!
//! `output_of`/`last_output_of` need to resolve a shader *name* to a texture slot, which requires
//! knowing the render graph — something this crate doesn't own (`shaq_render` does, and depends on
//! `shaq_host`, not the other way around). [`ShaderLookup`] is the seam: `shaq_render` implements
//! it once per frame over whatever scheduler state it's already tracking, and hands a `&mut dyn
//! ShaderLookup` in here for the duration of that frame's evaluation.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{IVec2, Vec2, Vec3, Vec4};
use shaq_sel::host::HostContext;
use shaq_sel::types::TextureDescriptor;

use crate::frame::{Clock, InputState};
use crate::rng::Rng;
use crate::texture_cache::TextureCache;
use crate::widgets::WidgetRegistry;

/// Resolves `output_of`/`last_output_of` calls to the render graph's view of a named shader.
/// Implemented by `shaq_render`.
pub trait ShaderLookup {
    fn current_output_of(&mut self, shader_name: &str) -> TextureDescriptor;
    fn last_output_of(&mut self, shader_name: &str) -> TextureDescriptor;
}

/// `iota()` is the one piece of host state the spec requires to survive project reloads (it's a
/// running counter, not session state) so it lives in a process-wide static rather than on
/// [`HostState`].
static IOTA: AtomicU64 = AtomicU64::new(0);

/// Everything a session needs to drive one `shaq_sel` evaluation pass, minus the render-graph view
/// supplied per frame through [`HostState::for_frame`].
pub struct Session {
    pub clock: Clock,
    pub input: InputState,
    pub widgets: WidgetRegistry,
    pub textures: TextureCache,
    pub rng: Rng,
}

impl Session {
    pub fn new(seed: Option<u64>, texture_cache_capacity: usize, texture_backing_bytes: usize) -> Self {
        Self {
            clock: Clock::new(),
            input: InputState::new(),
            widgets: WidgetRegistry::new(),
            textures: TextureCache::new(texture_cache_capacity, texture_backing_bytes),
            rng: match seed {
                Some(seed) => Rng::from_seed(seed),
                None => Rng::from_entropy(),
            },
        }
    }

    pub fn begin_frame(&mut self) {
        self.clock.begin_frame();
        self.input.begin_frame();
        self.widgets.begin_frame();
    }

    pub fn end_frame(&mut self) {
        self.widgets.end_frame();
    }

    /// Binds this session's state to one frame's render-graph view, producing the
    /// [`HostContext`] every SEL program evaluated this frame is handed.
    pub fn for_frame<'a>(&'a mut self, shaders: &'a mut dyn ShaderLookup) -> HostState<'a> {
        HostState { session: self, shaders }
    }
}

pub struct HostState<'a> {
    session: &'a mut Session,
    shaders: &'a mut dyn ShaderLookup,
}

impl HostContext for HostState<'_> {
    fn time(&mut self) -> f32 {
        self.session.clock.time()
    }

    fn deltatime(&mut self) -> f32 {
        self.session.clock.deltatime()
    }

    fn frame_count(&mut self) -> u32 {
        self.session.clock.frame_count()
    }

    fn iota(&mut self) -> u32 {
        IOTA.fetch_add(1, Ordering::Relaxed) as u32
    }

    fn rand(&mut self, min: f32, max: f32) -> f32 {
        self.session.rng.rand(min, max)
    }

    fn randi(&mut self, min: i32, max: i32) -> i32 {
        self.session.rng.randi(min, max)
    }

    fn aspect_ratio(&mut self) -> f32 {
        self.session.input.aspect_ratio()
    }

    fn iresolution(&mut self) -> IVec2 {
        self.session.input.resolution()
    }

    fn mouse_position(&mut self) -> Vec2 {
        self.session.input.mouse_position()
    }

    fn mouse_drag_position(&mut self) -> Vec2 {
        self.session.input.mouse_drag_position()
    }

    fn left_mouse_button_is_down(&mut self) -> bool {
        self.session.input.left_is_down()
    }

    fn left_mouse_button_was_clicked(&mut self) -> bool {
        self.session.input.left_was_clicked()
    }

    fn right_mouse_button_is_down(&mut self) -> bool {
        self.session.input.right_is_down()
    }

    fn right_mouse_button_was_clicked(&mut self) -> bool {
        self.session.input.right_was_clicked()
    }

    fn key_is_down(&mut self, key: &str) -> bool {
        self.session.input.key_is_down(key)
    }

    fn key_was_pressed(&mut self, key: &str) -> bool {
        self.session.input.key_was_pressed(key)
    }

    fn load_image(&mut self, path: &str) -> TextureDescriptor {
        self.session.textures.load(path)
    }

    fn output_of(&mut self, shader_name: &str) -> TextureDescriptor {
        self.shaders.current_output_of(shader_name)
    }

    fn last_output_of(&mut self, shader_name: &str) -> TextureDescriptor {
        self.shaders.last_output_of(shader_name)
    }

    fn input_float(&mut self, label: &str, default: f32) -> f32 {
        self.session.widgets.float(label, default)
    }

    fn input_int(&mut self, label: &str, default: i32) -> i32 {
        self.session.widgets.int(label, default)
    }

    fn input_vec2(&mut self, label: &str, default: Vec2) -> Vec2 {
        self.session.widgets.vec2(label, default)
    }

    fn input_vec3(&mut self, label: &str, default: Vec3) -> Vec3 {
        self.session.widgets.vec3(label, default)
    }

    fn input_vec4(&mut self, label: &str, default: Vec4) -> Vec4 {
        self.session.widgets.vec4(label, default)
    }

    fn checkbox(&mut self, label: &str, default: bool) -> bool {
        self.session.widgets.bool(label, default)
    }

    fn drag_int(&mut self, label: &str, _min: i32, _max: i32, default: i32) -> i32 {
        self.session.widgets.int(label, default)
    }

    fn slider_float(&mut self, label: &str, _min: f32, _max: f32, default: f32) -> f32 {
        self.session.widgets.float(label, default)
    }

    fn slider_float_log(&mut self, label: &str, _min: f32, _max: f32, default: f32) -> f32 {
        self.session.widgets.float(label, default)
    }

    fn color_picker(&mut self, label: &str, default: Vec4) -> Vec4 {
        self.session.widgets.vec4(label, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullShaders;
    impl ShaderLookup for NullShaders {
        fn current_output_of(&mut self, _shader_name: &str) -> TextureDescriptor {
            TextureDescriptor::Error
        }
        fn last_output_of(&mut self, _shader_name: &str) -> TextureDescriptor {
            TextureDescriptor::Error
        }
    }

    #[test]
    fn iota_counts_up_monotonically_regardless_of_session() {
        let mut session_a = Session::new(Some(1), 4, 1 << 16);
        let mut shaders = NullShaders;
        let mut host_a = session_a.for_frame(&mut shaders);
        let first = host_a.iota();
        let second = host_a.iota();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn widget_default_is_honored_once_then_remembered() {
        let mut session = Session::new(Some(1), 4, 1 << 16);
        session.begin_frame();
        let mut shaders = NullShaders;
        let mut host = session.for_frame(&mut shaders);
        assert_eq!(host.input_float("gain", 0.5), 0.5);
        drop(host);
        session.end_frame();

        session.begin_frame();
        let mut host = session.for_frame(&mut shaders);
        assert_eq!(host.input_float("gain", 9.0), 0.5);
    }
}
