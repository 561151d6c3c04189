use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use super::{CatmullRomCurve3, Geometry, GeometryError};

/// Tangent, normal and binormal along the curve
struct Frames {
    tangents: Vec<Vec3>,
    normals: Vec<Vec3>,
    binormals: Vec<Vec3>,
}

/// Parallel-transport frames, so the tube does not twist where the curve's
/// curvature flips
fn frenet_frames(curve: &CatmullRomCurve3, segments: usize, closed: bool) -> Frames {
    let tangents: Vec<Vec3> = (0..=segments)
        .map(|i| curve.tangent_at(i as f32 / segments as f32))
        .collect();

    let mut normals = Vec::with_capacity(segments + 1);
    let mut binormals = Vec::with_capacity(segments + 1);

    // Initial normal: perpendicular to the tangent, seeded from its smallest axis
    let t0 = tangents[0];
    let abs = t0.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let seed = t0.cross(axis).normalize_or_zero();
    normals.push(t0.cross(seed));
    binormals.push(t0.cross(normals[0]));

    for i in 1..=segments {
        let mut normal = normals[i - 1];
        let turn = tangents[i - 1].cross(tangents[i]);

        if turn.length() > f32::EPSILON {
            let angle = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            normal = Quat::from_axis_angle(turn.normalize(), angle) * normal;
        }

        normals.push(normal);
        binormals.push(tangents[i].cross(normal));
    }

    // Spread the accumulated twist so the first and last frames line up
    if closed {
        let mut theta = normals[0].dot(normals[segments]).clamp(-1.0, 1.0).acos() / segments as f32;
        if tangents[0].dot(normals[0].cross(normals[segments])) > 0.0 {
            theta = -theta;
        }

        for i in 1..=segments {
            normals[i] = Quat::from_axis_angle(tangents[i], theta * i as f32) * normals[i];
            binormals[i] = tangents[i].cross(normals[i]);
        }
    }

    Frames {
        tangents,
        normals,
        binormals,
    }
}

/// Sweep a circle of `radius` along the curve
///
/// Produces `(tubular_segments + 1) * (radial_segments + 1)` vertices; the
/// last ring repeats the first when `closed`.
pub fn tube_geometry(
    curve: &CatmullRomCurve3,
    tubular_segments: usize,
    radius: f32,
    radial_segments: usize,
    closed: bool,
) -> Result<Geometry, GeometryError> {
    if tubular_segments == 0 {
        return Err(GeometryError::ZeroSegments("tubular_segments"));
    }
    if radial_segments == 0 {
        return Err(GeometryError::ZeroSegments("radial_segments"));
    }

    let frames = frenet_frames(curve, tubular_segments, closed);
    debug_assert_eq!(frames.tangents.len(), tubular_segments + 1);

    let ring = |i: usize| {
        let center = curve.point_at(i as f32 / tubular_segments as f32);
        let normal = frames.normals[i];
        let binormal = frames.binormals[i];

        (0..=radial_segments).map(move |j| {
            let v = j as f32 / radial_segments as f32 * TAU;
            let direction = (-v.cos() * normal + v.sin() * binormal).normalize_or_zero();
            center + direction * radius
        })
    };

    let mut positions = Vec::with_capacity((tubular_segments + 1) * (radial_segments + 1));
    for i in 0..tubular_segments {
        positions.extend(ring(i));
    }
    positions.extend(ring(if closed { 0 } else { tubular_segments }));

    let stride = radial_segments as u32 + 1;
    let mut indices = Vec::with_capacity(tubular_segments * radial_segments * 2);
    for j in 1..=tubular_segments as u32 {
        for i in 1..=radial_segments as u32 {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;

            indices.push([a, b, d]);
            indices.push([b, c, d]);
        }
    }

    Ok(Geometry::new(positions, indices))
}
