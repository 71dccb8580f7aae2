//! Type declarations for the bioviz instanced model renderer.
//!
//! This is reexported in the bioviz crate proper and includes all the
//! "surface" api arguments: handles, vertex formats, draw instances,
//! drawlists and per-frame render parameters.

/// Reexport of the glam version bioviz is using.
pub use glam;

mod color;
mod drawlist;
mod handle;
mod instance;
mod mesh;
pub mod mesh_gen;
mod params;
mod texture;
mod vertex;

pub use color::*;
pub use drawlist::*;
pub use handle::*;
pub use instance::*;
pub use mesh::*;
pub use params::*;
pub use texture::*;
pub use vertex::*;

// WGPU REEXPORTS
#[doc(inline)]
pub use wgt::{Backend, Backends, Color, DeviceType, TextureFormat, TextureUsages};
