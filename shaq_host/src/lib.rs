//! Everything Shaq needs to embed `shaq_sel` into a running application: the [`HostContext`]
//! implementation and the session-scoped state it's built from (arena, rng, widgets, texture
//! cache, image allocator, clock/input snapshot).
//!
//! [`HostContext`]: shaq_sel::host::HostContext

pub mod arena;
pub mod context;
pub mod frame;
pub mod image_alloc;
pub mod rng;
pub mod texture_cache;
pub mod widgets;

pub use arena::SessionArena;
pub use context::{HostState, Session, ShaderLookup};
