//! Generators for the primitive meshes and textures used by scenes.
//!
//! All generated triangles wind counter-clockwise when viewed from the side
//! their normal points to.

use std::f32::consts::{PI, TAU};

use glam::{UVec2, Vec2, Vec3};

use crate::{Texture, TextureFilter, TextureWrap, TexturedVertex, UntexturedVertex};

/// A textured quad spanning `[-1, 1]` in x and y at z = 0, facing +Z.
pub fn textured_quad() -> [TexturedVertex; 6] {
    let v = |x: f32, y: f32| TexturedVertex::new(Vec3::new(x, y, 0.0), Vec3::Z, Vec2::new((x + 1.0) / 2.0, (y + 1.0) / 2.0));
    [
        v(-1.0, -1.0),
        v(1.0, -1.0),
        v(1.0, 1.0),
        v(1.0, 1.0),
        v(-1.0, 1.0),
        v(-1.0, -1.0),
    ]
}

/// A UV sphere of radius 1 centered on the origin.
///
/// The pole stacks degenerate into fans, so they emit one triangle per sector.
pub fn unit_sphere(sectors: u32, stacks: u32) -> Vec<UntexturedVertex> {
    assert!(sectors >= 3 && stacks >= 2, "sphere needs at least 3 sectors and 2 stacks");

    let theta_step = TAU / sectors as f32;
    let phi_step = PI / stacks as f32;
    let ring = sectors as usize + 1;

    let mut points = Vec::with_capacity(ring * (stacks as usize + 1));
    for stack in 0..=stacks {
        let phi = PI / 2.0 - stack as f32 * phi_step;
        for sector in 0..=sectors {
            let theta = sector as f32 * theta_step;
            let p = Vec3::new(theta.sin() * phi.cos(), phi.sin(), -theta.cos() * phi.cos());
            points.push(UntexturedVertex::new(p, p));
        }
    }

    let mut out = Vec::with_capacity(6 * sectors as usize * stacks as usize);
    for stack in 0..stacks as usize {
        let k1 = stack * ring;
        let k2 = k1 + ring;
        for sector in 0..sectors as usize {
            let (a, b) = (k1 + sector, k2 + sector);
            if stack != 0 {
                out.extend([points[a], points[a + 1], points[b]]);
            }
            if stack != stacks as usize - 1 {
                out.extend([points[a + 1], points[b + 1], points[b]]);
            }
        }
    }
    out
}

/// A cylinder of radius 1 around the y axis, spanning y in `[-1, 1]`, with
/// flat-shaded sides.
pub fn unit_cylinder(sides: u32) -> Vec<UntexturedVertex> {
    assert!(sides >= 3, "cylinder needs at least 3 sides");

    let step = TAU / sides as f32;
    let rim = |theta: f32, y: f32| Vec3::new(theta.cos(), y, theta.sin());
    let mut out = Vec::with_capacity(12 * sides as usize);

    for i in 0..sides {
        let start = i as f32 * step;
        let end = start + step;

        out.extend([Vec3::Y, rim(end, 1.0), rim(start, 1.0)].map(|p| UntexturedVertex::new(p, Vec3::Y)));
        out.extend([-Vec3::Y, rim(start, -1.0), rim(end, -1.0)].map(|p| UntexturedVertex::new(p, -Vec3::Y)));

        let normal = rim(start + step / 2.0, 0.0);
        let (top1, top2) = (rim(start, 1.0), rim(end, 1.0));
        let (bottom1, bottom2) = (rim(start, -1.0), rim(end, -1.0));
        out.extend([top1, top2, bottom1, bottom2, bottom1, top2].map(|p| UntexturedVertex::new(p, normal)));
    }
    out
}

/// A textured cube spanning `[-1, 1]` on every axis. Each face maps the full
/// `[0, 1]` texture range.
pub fn textured_cube() -> Vec<TexturedVertex> {
    let faces = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
    let mut out = Vec::with_capacity(36);
    for normal in faces {
        // Pick two in-plane axes so that u x v == normal.
        let u = if normal.y.abs() > 0.5 { Vec3::X } else { Vec3::Y.cross(normal) };
        let v = normal.cross(u);
        out.extend(textured_quad().map(|q| {
            let position = normal + u * q.position.x + v * q.position.y;
            TexturedVertex::new(position, normal, q.texcoord)
        }));
    }
    out
}

/// [`textured_cube`] without texture coordinates.
pub fn unit_cube() -> Vec<UntexturedVertex> {
    textured_cube().into_iter().map(UntexturedVertex::from).collect()
}

/// The default floor texture: 64x64 texels of alternating 32x32 squares in
/// two light greys, repeating and sampled without filtering.
pub fn chequered_floor_texture() -> Texture {
    const SIZE: u32 = 64;
    const SQUARE: u32 = 32;
    const ON: [u8; 3] = [0xe5; 3];
    const OFF: [u8; 3] = [0xde; 3];

    let mut data = Vec::with_capacity((SIZE * SIZE * 3) as usize);
    for row in 0..SIZE {
        for col in 0..SIZE {
            let on = (row / SQUARE + col / SQUARE) % 2 == 0;
            data.extend_from_slice(if on { &ON } else { &OFF });
        }
    }

    Texture::from_rgb8(UVec2::splat(SIZE), &data)
        .expect("chequer texture data matches its dimensions")
        .with_label("chequered floor")
        .with_wrap(TextureWrap::Repeat)
        .with_filter(TextureFilter::Nearest)
}
