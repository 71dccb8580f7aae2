use std::{cmp::Ordering, ops::Index, slice};

use crate::DrawInstance;

/// Total order that groups instances sharing GPU state next to each other.
///
/// Opaque instances come first so that blended ones are drawn over them.
/// Within an alpha level, instances are grouped by mesh, then texture, then
/// passthrough value. Instance flags break any remaining tie.
pub fn optimal_ordering(a: &DrawInstance, b: &DrawInstance) -> Ordering {
    b.color
        .a
        .cmp(&a.color.a)
        .then_with(|| a.mesh.cmp(&b.mesh))
        .then_with(|| a.texture.cmp(&b.texture))
        .then_with(|| a.passthrough.to_u16().cmp(&b.passthrough.to_u16()))
        .then_with(|| a.flags().cmp(&b.flags()))
}

/// An ordered list of instances to draw in a single frame.
#[derive(Debug, Default, Clone)]
pub struct Drawlist {
    instances: Vec<DrawInstance>,
}

impl Drawlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, instance: DrawInstance) {
        self.instances.push(instance);
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[DrawInstance] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut [DrawInstance] {
        &mut self.instances
    }

    pub fn iter(&self) -> slice::Iter<'_, DrawInstance> {
        self.instances.iter()
    }

    /// Sorts the list by [`optimal_ordering`].
    ///
    /// The sort is stable, so optimizing an already optimized list does not
    /// move anything.
    pub fn optimize(&mut self) {
        self.instances.sort_by(optimal_ordering);
    }

    pub fn is_optimized(&self) -> bool {
        self.instances
            .windows(2)
            .all(|pair| optimal_ordering(&pair[0], &pair[1]) != Ordering::Greater)
    }
}

impl Index<usize> for Drawlist {
    type Output = DrawInstance;

    fn index(&self, index: usize) -> &Self::Output {
        &self.instances[index]
    }
}

impl Extend<DrawInstance> for Drawlist {
    fn extend<T: IntoIterator<Item = DrawInstance>>(&mut self, iter: T) {
        self.instances.extend(iter);
    }
}

impl FromIterator<DrawInstance> for Drawlist {
    fn from_iter<T: IntoIterator<Item = DrawInstance>>(iter: T) -> Self {
        Self {
            instances: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Drawlist {
    type Item = &'a DrawInstance;
    type IntoIter = slice::Iter<'a, DrawInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;
    use crate::{InstanceFlags, MeshHandle, Passthrough, Rgba32, TextureHandle};

    fn instance(alpha: u8, mesh: usize, texture: TextureHandle, passthrough: u16) -> DrawInstance {
        DrawInstance::new(Mat4::IDENTITY, Rgba32::new(255, 255, 255, alpha), MeshHandle::from_index(mesh))
            .with_texture(texture)
            .with_passthrough(Passthrough::from_u16(passthrough))
    }

    #[test]
    fn opaque_before_blended() {
        let mut list: Drawlist = [instance(10, 0, TextureHandle::INVALID, 0), instance(255, 5, TextureHandle::INVALID, 0)]
            .into_iter()
            .collect();
        list.optimize();
        assert_eq!(list[0].color.a, 255);
        assert_eq!(list[1].color.a, 10);
    }

    #[test]
    fn groups_by_mesh_then_texture_then_passthrough() {
        let t0 = TextureHandle::from_index(0);
        let t1 = TextureHandle::from_index(1);
        let mut list: Drawlist = [
            instance(255, 1, t0, 3),
            instance(255, 0, t1, 0),
            instance(255, 1, t0, 1),
            instance(255, 0, TextureHandle::INVALID, 9),
            instance(255, 1, t1, 0),
        ]
        .into_iter()
        .collect();
        list.optimize();

        let keys: Vec<_> = list
            .iter()
            .map(|i| (i.mesh.raw(), i.texture.raw(), i.passthrough.to_u16()))
            .collect();
        assert_eq!(keys, vec![(0, -1, 9), (0, 1, 0), (1, 0, 1), (1, 0, 3), (1, 1, 0)]);
        assert!(list.is_optimized());
    }

    #[test]
    fn flags_break_remaining_ties() {
        let plain = instance(255, 0, TextureHandle::INVALID, 0);
        let unlit = plain.with_flags(InstanceFlags::SKIP_SHADING);
        let mut list: Drawlist = [unlit, plain].into_iter().collect();
        list.optimize();
        assert_eq!(list[0].flags(), InstanceFlags::empty());
        assert_eq!(list[1].flags(), InstanceFlags::SKIP_SHADING);
    }

    #[test]
    fn optimize_is_idempotent() {
        let mut list: Drawlist = (0..64)
            .map(|i| {
                let mut inst = instance((i * 37 % 256) as u8, i % 3, TextureHandle::INVALID, (i % 5) as u16);
                inst.set_transform(&Mat4::from_translation(glam::Vec3::splat(i as f32)));
                inst
            })
            .collect();
        list.optimize();
        let once = list.clone();
        list.optimize();
        assert_eq!(once.instances(), list.instances());
    }

    #[test]
    fn empty_list_is_optimized() {
        let mut list = Drawlist::new();
        list.optimize();
        assert!(list.is_empty());
        assert!(list.is_optimized());
    }

    #[test]
    fn optimized_order_properties() {
        // Small LCG so the list is arbitrary but reproducible.
        let mut state = 0x2545_f491_u32;
        let mut next = move |modulus: u32| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) % modulus
        };
        let mut list: Drawlist = (0..2000)
            .map(|_| {
                let texture = match next(3) {
                    0 => TextureHandle::INVALID,
                    t => TextureHandle::from_index(t as usize),
                };
                instance([255, 128, 40][next(3) as usize], next(5) as usize, texture, next(4) as u16)
            })
            .collect();
        list.optimize();

        for pair in list.instances().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.color.a >= b.color.a);
            if a.color.a == b.color.a {
                assert!(a.mesh <= b.mesh);
                if a.mesh == b.mesh {
                    assert!(a.texture <= b.texture);
                }
            }
        }
    }
}
