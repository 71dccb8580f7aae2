//! Instanced multi-target forward renderer for biomechanical model scenes.
//!
//! Every frame draws a [`Drawlist`](types::Drawlist) of instances into an
//! offscreen [`RenderTarget`] with two color outputs: the shaded scene, and a
//! passthrough output carrying two identifier bytes per instance. The
//! passthrough output drives selection rims and hit testing, which reports the
//! identifier under a cursor pixel either synchronously or one frame late
//! without stalling on the GPU.
//!
//! # Getting started
//!
//! ```no_run
//! use bioviz::types::{glam::{Mat4, UVec2}, mesh_gen, DrawInstance, Drawlist, Mesh, Passthrough, RenderParams, Rgba32, SampleCount};
//!
//! let iad = pollster::block_on(bioviz::create_iad(None, None)).unwrap();
//! let mut storage = bioviz::GpuStorage::new(&iad);
//! let mut renderer = bioviz::Renderer::new(&iad);
//! let mut target = bioviz::RenderTarget::new(&iad.device, UVec2::new(800, 600), SampleCount::Four);
//!
//! let sphere = storage.upload_mesh(&Mesh::new(mesh_gen::unit_sphere(12, 12)).unwrap());
//! let mut drawlist = Drawlist::new();
//! drawlist.push(DrawInstance::new(Mat4::IDENTITY, Rgba32::WHITE, sphere).with_passthrough(Passthrough::new(1, 0)));
//! drawlist.optimize();
//!
//! let hit = renderer.draw(&storage, &RenderParams::default(), &drawlist, &mut target);
//! ```

pub use bioviz_types as types;

pub mod batching;
mod error;
pub mod managers;
pub mod programs;
pub mod readback;
mod render_target;
mod renderer;
mod samplers;
mod setup;
pub mod shader;
mod storage;
pub mod util;

pub use error::*;
pub use render_target::*;
pub use renderer::*;
pub use samplers::*;
pub use setup::*;
pub use storage::*;
