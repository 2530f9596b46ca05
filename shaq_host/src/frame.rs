//! Per-frame clock and input snapshot. The windowing/input layer that actually polls the OS is a
//! Non-goal (spec §1); this just holds whatever that layer last reported, the way
//! `game_input`-style event buffers are fed from outside and read from inside the simulation.

use std::time::Instant;

use glam::{IVec2, Vec2};

pub struct Clock {
    started_at: Instant,
    frame_started_at: Instant,
    delta: f32,
    frame_count: u32,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { started_at: now, frame_started_at: now, delta: 0.0, frame_count: 0 }
    }

    /// Latches `time()`/`deltatime()` for the frame about to run.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.delta = (now - self.frame_started_at).as_secs_f32();
        self.frame_started_at = now;
        self.frame_count += 1;
    }

    pub fn time(&self) -> f32 {
        (self.frame_started_at - self.started_at).as_secs_f32()
    }

    pub fn deltatime(&self) -> f32 {
        self.delta
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default, Clone, Copy)]
struct MouseButton {
    is_down: bool,
    was_clicked: bool,
}

/// Mouse/keyboard state as last reported by the windowing layer, snapshotted once per frame so
/// every SEL program evaluated within the same frame observes the same input.
#[derive(Default)]
pub struct InputState {
    resolution: IVec2,
    mouse_position: Vec2,
    mouse_drag_position: Vec2,
    left: MouseButton,
    right: MouseButton,
    keys_down: std::collections::HashSet<String>,
    keys_pressed: std::collections::HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_resolution(&mut self, resolution: IVec2) {
        self.resolution = resolution;
    }

    pub fn set_mouse_position(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    pub fn set_mouse_drag_position(&mut self, position: Vec2) {
        self.mouse_drag_position = position;
    }

    pub fn set_left_mouse_button(&mut self, is_down: bool, was_clicked: bool) {
        self.left = MouseButton { is_down, was_clicked };
    }

    pub fn set_right_mouse_button(&mut self, is_down: bool, was_clicked: bool) {
        self.right = MouseButton { is_down, was_clicked };
    }

    pub fn set_key_down(&mut self, key: &str, is_down: bool) {
        if is_down {
            self.keys_down.insert(key.to_owned());
        } else {
            self.keys_down.remove(key);
        }
    }

    pub fn set_key_pressed(&mut self, key: &str) {
        self.keys_pressed.insert(key.to_owned());
    }

    /// Clears the one-shot "pressed"/"clicked" edges at the start of each frame, before the
    /// windowing layer reports this frame's events.
    pub fn begin_frame(&mut self) {
        self.left.was_clicked = false;
        self.right.was_clicked = false;
        self.keys_pressed.clear();
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.resolution.y == 0 {
            1.0
        } else {
            self.resolution.x as f32 / self.resolution.y as f32
        }
    }

    pub fn resolution(&self) -> IVec2 {
        self.resolution
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn mouse_drag_position(&self) -> Vec2 {
        self.mouse_drag_position
    }

    pub fn left_is_down(&self) -> bool {
        self.left.is_down
    }

    pub fn left_was_clicked(&self) -> bool {
        self.left.was_clicked
    }

    pub fn right_is_down(&self) -> bool {
        self.right.is_down
    }

    pub fn right_was_clicked(&self) -> bool {
        self.right.was_clicked
    }

    pub fn key_is_down(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }

    pub fn key_was_pressed(&self, key: &str) -> bool {
        self.keys_pressed.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_defaults_square_when_unset() {
        let input = InputState::new();
        assert_eq!(input.aspect_ratio(), 1.0);
    }

    #[test]
    fn begin_frame_clears_click_edges_but_not_is_down() {
        let mut input = InputState::new();
        input.set_left_mouse_button(true, true);
        assert!(input.left_was_clicked());
        input.begin_frame();
        assert!(!input.left_was_clicked());
        assert!(input.left_is_down());
    }
}
