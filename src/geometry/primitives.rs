use glam::Vec3;

use super::Geometry;

/// Axis-aligned box centered on the origin
/// Each face gets its own four vertices so flat shading stays crisp
pub fn box_geometry(width: f32, height: f32, depth: f32) -> Geometry {
    let half = Vec3::new(width, height, depth) * 0.5;

    // (normal, u, v) with u x v == normal so corners wind counter-clockwise
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(12);

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        let center = normal * half;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push(center + u * half * su + v * half * sv);
        }
        indices.push([base, base + 1, base + 2]);
        indices.push([base, base + 2, base + 3]);
    }

    Geometry::new(positions, indices)
}

const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = {
    const T: f32 = 1.618_034; // golden ratio
    [
        [-1.0, T, 0.0],
        [1.0, T, 0.0],
        [-1.0, -T, 0.0],
        [1.0, -T, 0.0],
        [0.0, -1.0, T],
        [0.0, 1.0, T],
        [0.0, -1.0, -T],
        [0.0, 1.0, -T],
        [T, 0.0, -1.0],
        [T, 0.0, 1.0],
        [-T, 0.0, -1.0],
        [-T, 0.0, 1.0],
    ]
};

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Icosahedron projected onto a sphere of `radius`
/// `detail` subdivides every face into (detail + 1)^2 triangles; high detail
/// approximates a sphere
pub fn icosahedron_geometry(radius: f32, detail: u32) -> Geometry {
    let cols = detail as usize + 1;
    let mut positions = Vec::with_capacity(20 * cols * cols * 3);

    for face in ICOSAHEDRON_FACES {
        let [a, b, c] = face.map(|i| Vec3::from_array(ICOSAHEDRON_VERTICES[i]));

        // Rows of vertices from the a-b edge towards c
        let grid: Vec<Vec<Vec3>> = (0..=cols)
            .map(|i| {
                let t = i as f32 / cols as f32;
                let left = a.lerp(c, t);
                let right = b.lerp(c, t);
                let rows = cols - i;
                (0..=rows)
                    .map(|j| {
                        if j == 0 && i == cols {
                            left
                        } else {
                            left.lerp(right, j as f32 / rows as f32)
                        }
                    })
                    .collect()
            })
            .collect();

        for i in 0..cols {
            for j in 0..2 * (cols - i) - 1 {
                let k = j / 2;
                let triangle = if j % 2 == 0 {
                    [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
                } else {
                    [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
                };
                positions.extend(triangle.map(|p| p.normalize() * radius));
            }
        }
    }

    let indices = (0..positions.len() as u32 / 3)
        .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
        .collect();

    Geometry::new(positions, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(geometry: &Geometry) {
        for [a, b, c] in geometry.triangles() {
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward face at {centroid:?}");
        }
    }

    #[test]
    fn test_box_counts() {
        let geometry = box_geometry(1.0, 1.0, 1.0);
        assert_eq!(geometry.positions.len(), 24);
        assert_eq!(geometry.triangle_count(), 12);
    }

    #[test]
    fn test_box_extent() {
        let geometry = box_geometry(2.0, 4.0, 6.0);
        let max = geometry
            .positions
            .iter()
            .fold(Vec3::splat(f32::MIN), |acc, p| acc.max(*p));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_box_faces_wind_outward() {
        assert_outward(&box_geometry(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_icosahedron_triangle_count() {
        for detail in 0..4 {
            let expected = 20 * (detail as usize + 1).pow(2);
            assert_eq!(icosahedron_geometry(1.0, detail).triangle_count(), expected);
        }
    }

    #[test]
    fn test_icosahedron_vertices_on_sphere() {
        let geometry = icosahedron_geometry(2.5, 2);
        for p in &geometry.positions {
            assert!((p.length() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_icosahedron_faces_wind_outward() {
        assert_outward(&icosahedron_geometry(1.0, 0));
        assert_outward(&icosahedron_geometry(1.0, 3));
    }
}
