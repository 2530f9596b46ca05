//! Label-keyed persistent storage for the GUI input built-ins (`input_float`, `checkbox`, ...),
//! spec §4.6/§8 "Widget identity": a widget's value survives across frames as long as its label
//! keeps getting called every frame, and is forgotten the first frame it stops being called.
//!
//! Rendering the actual widgets is out of scope here (the windowing/GUI layer is a Non-goal); this
//! registry only owns the values themselves, the way `game_ui`'s widget tree owns state that's
//! separate from its paint step.

use std::collections::HashMap;

use glam::{Vec2, Vec3, Vec4};

#[derive(Clone, Copy, Debug, PartialEq)]
enum WidgetValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Bool(bool),
}

struct Record {
    value: WidgetValue,
    touched_this_frame: bool,
}

/// Holds one value per widget label, garbage-collecting any label that goes a whole frame without
/// being asked for.
#[derive(Default)]
pub struct WidgetRegistry {
    records: HashMap<String, Record>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every widget's touched flag. Call once at the start of each frame, before any SEL
    /// program evaluates.
    pub fn begin_frame(&mut self) {
        for record in self.records.values_mut() {
            record.touched_this_frame = false;
        }
    }

    /// Drops every widget that wasn't asked for since the last [`WidgetRegistry::begin_frame`].
    /// Call once at the end of each frame, after every SEL program has evaluated.
    pub fn end_frame(&mut self) {
        self.records.retain(|_, record| record.touched_this_frame);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn get_or_insert(&mut self, label: &str, default: WidgetValue) -> WidgetValue {
        let record = self
            .records
            .entry(label.to_owned())
            .or_insert(Record { value: default, touched_this_frame: false });
        record.touched_this_frame = true;
        // A label reused with a different widget kind this session just resets to the new
        // default; there's no way to meaningfully carry a float slider's state into a checkbox.
        if std::mem::discriminant(&record.value) != std::mem::discriminant(&default) {
            record.value = default;
        }
        record.value
    }

    pub fn float(&mut self, label: &str, default: f32) -> f32 {
        match self.get_or_insert(label, WidgetValue::Float(default)) {
            WidgetValue::Float(v) => v,
            _ => default,
        }
    }

    pub fn int(&mut self, label: &str, default: i32) -> i32 {
        match self.get_or_insert(label, WidgetValue::Int(default)) {
            WidgetValue::Int(v) => v,
            _ => default,
        }
    }

    pub fn vec2(&mut self, label: &str, default: Vec2) -> Vec2 {
        match self.get_or_insert(label, WidgetValue::Vec2(default)) {
            WidgetValue::Vec2(v) => v,
            _ => default,
        }
    }

    pub fn vec3(&mut self, label: &str, default: Vec3) -> Vec3 {
        match self.get_or_insert(label, WidgetValue::Vec3(default)) {
            WidgetValue::Vec3(v) => v,
            _ => default,
        }
    }

    pub fn vec4(&mut self, label: &str, default: Vec4) -> Vec4 {
        match self.get_or_insert(label, WidgetValue::Vec4(default)) {
            WidgetValue::Vec4(v) => v,
            _ => default,
        }
    }

    pub fn bool(&mut self, label: &str, default: bool) -> bool {
        match self.get_or_insert(label, WidgetValue::Bool(default)) {
            WidgetValue::Bool(v) => v,
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_persists_while_touched_every_frame() {
        let mut widgets = WidgetRegistry::new();
        widgets.begin_frame();
        assert_eq!(widgets.float("brightness", 1.0), 1.0);
        widgets.end_frame();

        widgets.begin_frame();
        // Same label, different default: the stored value from last frame wins.
        assert_eq!(widgets.float("brightness", 2.0), 1.0);
        widgets.end_frame();

        assert_eq!(widgets.len(), 1);
    }

    #[test]
    fn untouched_widgets_are_collected() {
        let mut widgets = WidgetRegistry::new();
        widgets.begin_frame();
        widgets.float("brightness", 1.0);
        widgets.end_frame();
        assert_eq!(widgets.len(), 1);

        widgets.begin_frame();
        // `brightness` isn't called this frame.
        widgets.end_frame();
        assert!(widgets.is_empty());
    }

    #[test]
    fn relabeling_to_a_different_kind_resets_the_default() {
        let mut widgets = WidgetRegistry::new();
        widgets.begin_frame();
        widgets.float("x", 1.0);
        widgets.end_frame();

        widgets.begin_frame();
        assert!(widgets.bool("x", true));
        widgets.end_frame();
    }
}
