//! Loads a project file (spec §6) into a list of [`shaq_render::Shader`]s, compiling every
//! attribute/uniform expression through `shaq_sel`.

pub mod loader;
mod null_host;

pub use loader::{load_project, ProjectError};
