//! The single seam between SEL's native built-ins and everything host-side: time, input, widgets,
//! the texture cache, and the render graph under construction. Spec §3.1/§4.5 and REDESIGN FLAGS
//! call for exactly this: one handle threaded through every native call instead of process-global
//! state, so the VM and checker stay free of `shaq_host`/`shaq_render` as dependencies.

use glam::{Vec2, Vec4};

use crate::types::TextureDescriptor;

/// Implemented by the embedding application (`shaq_host`/`shaq_render`); consumed here only as a
/// trait object reference, never as a concrete type, to keep `shaq_sel` free of downstream crates.
pub trait HostContext {
    /// Seconds since the session started, latched at frame start.
    fn time(&mut self) -> f32;
    /// Seconds since the previous frame, latched at frame start.
    fn deltatime(&mut self) -> f32;
    fn frame_count(&mut self) -> u32;
    /// Advances and returns the process-global monotonic counter (not reset on reload).
    fn iota(&mut self) -> u32;

    fn rand(&mut self, min: f32, max: f32) -> f32;
    fn randi(&mut self, min: i32, max: i32) -> i32;

    fn aspect_ratio(&mut self) -> f32;
    fn iresolution(&mut self) -> glam::IVec2;

    fn mouse_position(&mut self) -> Vec2;
    fn mouse_drag_position(&mut self) -> Vec2;
    fn left_mouse_button_is_down(&mut self) -> bool;
    fn left_mouse_button_was_clicked(&mut self) -> bool;
    fn right_mouse_button_is_down(&mut self) -> bool;
    fn right_mouse_button_was_clicked(&mut self) -> bool;
    fn key_is_down(&mut self, key: &str) -> bool;
    fn key_was_pressed(&mut self, key: &str) -> bool;

    /// Resolves a decoded-image path through the texture cache.
    fn load_image(&mut self, path: &str) -> TextureDescriptor;
    /// The current frame's render target of the named shader; creates a scheduler dependency.
    fn output_of(&mut self, shader_name: &str) -> TextureDescriptor;
    /// Last frame's render target of the named shader; does not create a scheduler dependency.
    fn last_output_of(&mut self, shader_name: &str) -> TextureDescriptor;

    fn input_float(&mut self, label: &str, default: f32) -> f32;
    fn input_int(&mut self, label: &str, default: i32) -> i32;
    fn input_vec2(&mut self, label: &str, default: Vec2) -> Vec2;
    fn input_vec3(&mut self, label: &str, default: glam::Vec3) -> glam::Vec3;
    fn input_vec4(&mut self, label: &str, default: Vec4) -> Vec4;
    fn checkbox(&mut self, label: &str, default: bool) -> bool;
    fn drag_int(&mut self, label: &str, min: i32, max: i32, default: i32) -> i32;
    fn slider_float(&mut self, label: &str, min: f32, max: f32, default: f32) -> f32;
    fn slider_float_log(&mut self, label: &str, min: f32, max: f32, default: f32) -> f32;
    fn color_picker(&mut self, label: &str, default: Vec4) -> Vec4;
}
