use bioviz::types::{
    glam::{Mat4, Vec3, Vec4},
    mesh_gen, DrawInstance, InstanceFlags, Mesh, MeshHandle, Passthrough, RenderFlags, RenderParams, Rgba32,
    UntexturedVertex,
};

use crate::TestRunner;

impl TestRunner {
    /// Uploads an untextured quad covering `[-1, 1]` in x and y.
    pub fn untextured_quad(&mut self) -> MeshHandle {
        let vertices = mesh_gen::textured_quad().into_iter().map(UntexturedVertex::from).collect();
        self.storage
            .upload_mesh(&Mesh::new(vertices).expect("quad mesh is valid"))
    }

    /// Uploads a textured quad covering `[-1, 1]` in x and y.
    pub fn textured_quad(&mut self) -> MeshHandle {
        self.storage
            .upload_mesh(&Mesh::new(mesh_gen::textured_quad().to_vec()).expect("quad mesh is valid"))
    }
}

/// An unlit instance of `mesh`, scaled by `scale` in x and y and placed at
/// depth `z`. With identity matrices a unit scale fills the target.
pub fn flat_instance(mesh: MeshHandle, scale: f32, z: f32, color: Rgba32, passthrough: Passthrough) -> DrawInstance {
    let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, z)) * Mat4::from_scale(Vec3::new(scale, scale, 1.0));
    DrawInstance::new(transform, color, mesh)
        .with_passthrough(passthrough)
        .with_flags(InstanceFlags::SKIP_SHADING)
}

/// Identity camera, opaque black background and only the given stages.
pub fn params_with(flags: RenderFlags) -> RenderParams {
    RenderParams {
        background_rgba: Vec4::new(0.0, 0.0, 0.0, 1.0),
        flags,
        ..RenderParams::default()
    }
}
