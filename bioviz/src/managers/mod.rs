//! Append-only stores mapping handles to GPU resources.
//!
//! Nothing is ever freed individually; a store releases everything it owns
//! when it is dropped.

mod mesh;
mod shader;
mod texture;

pub use mesh::*;
pub use shader::*;
pub use texture::*;
