//! Planning of the scene pass draw calls.

use std::ops::Range;

use crate::types::{DrawInstance, MeshHandle, TextureHandle};

/// One draw call of the scene pass: a contiguous range of the frame's
/// instance buffer sharing a mesh and a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRun {
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
    pub instances: Range<u32>,
}

/// Splits `instances` into draw calls.
///
/// Instanced mode emits one run per maximal stretch of consecutive instances
/// with equal mesh and texture, so an optimized drawlist needs one call per
/// distinct pair. Naive mode emits one run per instance.
pub fn scene_runs(instances: &[DrawInstance], instanced: bool) -> Vec<DrawRun> {
    profiling::scope!("scene_runs");

    let mut runs: Vec<DrawRun> = Vec::new();
    for (idx, instance) in instances.iter().enumerate() {
        let idx = idx as u32;
        if instanced {
            if let Some(last) = runs.last_mut() {
                if last.mesh == instance.mesh && last.texture == instance.texture {
                    last.instances.end = idx + 1;
                    continue;
                }
            }
        }
        runs.push(DrawRun {
            mesh: instance.mesh,
            texture: instance.texture,
            instances: idx..idx + 1,
        });
    }
    runs
}
