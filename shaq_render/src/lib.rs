//! Render-graph scheduling and GPU uniform binding: the layer between compiled SEL programs and
//! an actual GL context (spec §3 "Shader (core's view)", §4.7, §4.8).
//!
//! The GPU driver itself is out of scope (spec Non-goals); [`backend::GpuBackend`] is the wire
//! contract a real driver implements.

pub mod backend;
pub mod graph;
pub mod shader;
pub mod uniforms;

pub use backend::GpuBackend;
pub use graph::{recompute_render_order, NameLookup};
pub use shader::{PingPong, Shader, Uniform};
