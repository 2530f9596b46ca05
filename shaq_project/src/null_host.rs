//! A [`HostContext`] that is never actually called: attribute right-hand-sides must be
//! `Const`-qualified (spec §6), and the checker guarantees a `Const` program never reaches a
//! native built-in that consults host state, so this only needs to satisfy the trait, not behave
//! usefully.

use glam::{IVec2, Vec2, Vec3, Vec4};
use shaq_sel::host::HostContext;
use shaq_sel::types::TextureDescriptor;

#[derive(Default)]
pub struct NullHost;

impl HostContext for NullHost {
    fn time(&mut self) -> f32 {
        unreachable!("const expressions never call host-dependent built-ins")
    }
    fn deltatime(&mut self) -> f32 {
        unreachable!()
    }
    fn frame_count(&mut self) -> u32 {
        unreachable!()
    }
    fn iota(&mut self) -> u32 {
        unreachable!()
    }
    fn rand(&mut self, _min: f32, _max: f32) -> f32 {
        unreachable!()
    }
    fn randi(&mut self, _min: i32, _max: i32) -> i32 {
        unreachable!()
    }
    fn aspect_ratio(&mut self) -> f32 {
        unreachable!()
    }
    fn iresolution(&mut self) -> IVec2 {
        unreachable!()
    }
    fn mouse_position(&mut self) -> Vec2 {
        unreachable!()
    }
    fn mouse_drag_position(&mut self) -> Vec2 {
        unreachable!()
    }
    fn left_mouse_button_is_down(&mut self) -> bool {
        unreachable!()
    }
    fn left_mouse_button_was_clicked(&mut self) -> bool {
        unreachable!()
    }
    fn right_mouse_button_is_down(&mut self) -> bool {
        unreachable!()
    }
    fn right_mouse_button_was_clicked(&mut self) -> bool {
        unreachable!()
    }
    fn key_is_down(&mut self, _key: &str) -> bool {
        unreachable!()
    }
    fn key_was_pressed(&mut self, _key: &str) -> bool {
        unreachable!()
    }
    fn load_image(&mut self, _path: &str) -> TextureDescriptor {
        unreachable!()
    }
    fn output_of(&mut self, _shader_name: &str) -> TextureDescriptor {
        unreachable!()
    }
    fn last_output_of(&mut self, _shader_name: &str) -> TextureDescriptor {
        unreachable!()
    }
    fn input_float(&mut self, _label: &str, _default: f32) -> f32 {
        unreachable!()
    }
    fn input_int(&mut self, _label: &str, _default: i32) -> i32 {
        unreachable!()
    }
    fn input_vec2(&mut self, _label: &str, _default: Vec2) -> Vec2 {
        unreachable!()
    }
    fn input_vec3(&mut self, _label: &str, _default: Vec3) -> Vec3 {
        unreachable!()
    }
    fn input_vec4(&mut self, _label: &str, _default: Vec4) -> Vec4 {
        unreachable!()
    }
    fn checkbox(&mut self, _label: &str, _default: bool) -> bool {
        unreachable!()
    }
    fn drag_int(&mut self, _label: &str, _min: i32, _max: i32, _default: i32) -> i32 {
        unreachable!()
    }
    fn slider_float(&mut self, _label: &str, _min: f32, _max: f32, _default: f32) -> f32 {
        unreachable!()
    }
    fn slider_float_log(&mut self, _label: &str, _min: f32, _max: f32, _default: f32) -> f32 {
        unreachable!()
    }
    fn color_picker(&mut self, _label: &str, _default: Vec4) -> Vec4 {
        unreachable!()
    }
}
