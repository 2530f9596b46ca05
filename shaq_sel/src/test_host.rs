//! A minimal [`HostContext`] stand-in for `shaq_sel`'s own unit tests. The real implementation
//! lives in `shaq_host`, which depends on this crate rather than the other way around, so the VM
//! and builtin tests need a local fake to drive host-state-dependent built-ins.

use glam::{IVec2, Vec2, Vec4};

use crate::host::HostContext;
use crate::types::TextureDescriptor;

#[derive(Default)]
pub struct FakeHost {
    pub clock: f32,
    pub frame: u32,
    pub counter: u32,
}

impl HostContext for FakeHost {
    fn time(&mut self) -> f32 {
        self.clock
    }

    fn deltatime(&mut self) -> f32 {
        1.0 / 60.0
    }

    fn frame_count(&mut self) -> u32 {
        self.frame
    }

    fn iota(&mut self) -> u32 {
        let v = self.counter;
        self.counter += 1;
        v
    }

    fn rand(&mut self, min: f32, _max: f32) -> f32 {
        min
    }

    fn randi(&mut self, min: i32, _max: i32) -> i32 {
        min
    }

    fn aspect_ratio(&mut self) -> f32 {
        16.0 / 9.0
    }

    fn iresolution(&mut self) -> IVec2 {
        IVec2::new(1920, 1080)
    }

    fn mouse_position(&mut self) -> Vec2 {
        Vec2::ZERO
    }

    fn mouse_drag_position(&mut self) -> Vec2 {
        Vec2::ZERO
    }

    fn left_mouse_button_is_down(&mut self) -> bool {
        false
    }

    fn left_mouse_button_was_clicked(&mut self) -> bool {
        false
    }

    fn right_mouse_button_is_down(&mut self) -> bool {
        false
    }

    fn right_mouse_button_was_clicked(&mut self) -> bool {
        false
    }

    fn key_is_down(&mut self, _key: &str) -> bool {
        false
    }

    fn key_was_pressed(&mut self, _key: &str) -> bool {
        false
    }

    fn load_image(&mut self, _path: &str) -> TextureDescriptor {
        TextureDescriptor::LoadedImage { index: 0 }
    }

    fn output_of(&mut self, _shader_name: &str) -> TextureDescriptor {
        TextureDescriptor::CurrentOutputOf { index: 0 }
    }

    fn last_output_of(&mut self, _shader_name: &str) -> TextureDescriptor {
        TextureDescriptor::LastOutputOf { index: 0 }
    }

    fn input_float(&mut self, _label: &str, default: f32) -> f32 {
        default
    }

    fn input_int(&mut self, _label: &str, default: i32) -> i32 {
        default
    }

    fn input_vec2(&mut self, _label: &str, default: Vec2) -> Vec2 {
        default
    }

    fn input_vec3(&mut self, _label: &str, default: glam::Vec3) -> glam::Vec3 {
        default
    }

    fn input_vec4(&mut self, _label: &str, default: Vec4) -> Vec4 {
        default
    }

    fn checkbox(&mut self, _label: &str, default: bool) -> bool {
        default
    }

    fn drag_int(&mut self, _label: &str, _min: i32, _max: i32, default: i32) -> i32 {
        default
    }

    fn slider_float(&mut self, _label: &str, _min: f32, _max: f32, default: f32) -> f32 {
        default
    }

    fn slider_float_log(&mut self, _label: &str, _min: f32, _max: f32, default: f32) -> f32 {
        default
    }

    fn color_picker(&mut self, _label: &str, default: Vec4) -> Vec4 {
        default
    }
}
