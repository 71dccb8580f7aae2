//! Small helpers shared by the stores and the renderer.

pub mod bind_merge;
pub mod error_scope;
pub mod typedefs;
pub mod uniforms;
