//! Write-once geometry generators used to build demo scenes.

mod curve;
mod edges;
mod points;
mod primitives;
mod tube;

use std::collections::HashMap;

use glam::Vec3;
use thiserror::Error;

pub use curve::CatmullRomCurve3;
pub use edges::edges;
pub use points::star_field;
pub use primitives::{box_geometry, icosahedron_geometry};
pub use tube::tube_geometry;

/// A line segment in local space
pub type Segment = [Vec3; 2];

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("a curve needs at least 2 control points, got {0}")]
    TooFewControlPoints(usize),
    #[error("{0} must be at least 1")]
    ZeroSegments(&'static str),
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    /// Per-vertex normals; empty until computed
    pub normals: Vec<Vec3>,
    /// Counter-clockwise triangles when viewed from the front
    pub indices: Vec<[u32; 3]>,
}

impl Geometry {
    pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Corner positions of every triangle
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.iter().map(move |&[a, b, c]| {
            [
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            ]
        })
    }

    /// Average face normals into vertex normals, merging vertices that share a
    /// position so seams stay smooth
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated: HashMap<PositionKey, Vec3> = HashMap::new();

        for [a, b, c] in self.triangles() {
            // Area weighted
            let normal = (b - a).cross(c - a);
            for corner in [a, b, c] {
                *accumulated.entry(PositionKey::new(corner)).or_insert(Vec3::ZERO) += normal;
            }
        }

        self.normals = self
            .positions
            .iter()
            .map(|&p| {
                accumulated
                    .get(&PositionKey::new(p))
                    .map(|n| n.normalize_or_zero())
                    .unwrap_or(Vec3::ZERO)
            })
            .collect();
    }

    /// Builder form of [`Geometry::compute_vertex_normals`]
    pub fn with_vertex_normals(mut self) -> Self {
        self.compute_vertex_normals();
        self
    }

    pub fn has_normals(&self) -> bool {
        self.normals.len() == self.positions.len() && !self.normals.is_empty()
    }
}

/// Quantized position used to weld vertices that coincide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PositionKey(i64, i64, i64);

impl PositionKey {
    const PRECISION: f32 = 1e4;

    pub(crate) fn new(p: Vec3) -> Self {
        let q = |v: f32| (v * Self::PRECISION).round() as i64;
        Self(q(p.x), q(p.y), q(p.z))
    }
}
