use std::collections::HashMap;

use super::{Geometry, PositionKey, Segment};

struct OpenEdge {
    normal: glam::Vec3,
    segment: Segment,
}

/// Extract feature edges: edges whose two faces meet at more than
/// `threshold_deg` degrees, plus every edge used by a single face
pub fn edges(geometry: &Geometry, threshold_deg: f32) -> Vec<Segment> {
    let threshold_dot = threshold_deg.to_radians().cos();

    let mut segments = Vec::new();
    // Insertion ordered so the output is deterministic
    let mut open: Vec<Option<OpenEdge>> = Vec::new();
    let mut lookup: HashMap<(PositionKey, PositionKey), usize> = HashMap::new();

    for [a, b, c] in geometry.triangles() {
        let normal = (b - a).cross(c - a);
        if normal.length_squared() < f32::EPSILON * f32::EPSILON {
            continue;
        }
        let normal = normal.normalize();

        for (start, end) in [(a, b), (b, c), (c, a)] {
            let (ka, kb) = (PositionKey::new(start), PositionKey::new(end));
            if ka == kb {
                continue;
            }
            let key = if ka < kb { (ka, kb) } else { (kb, ka) };

            match lookup.remove(&key) {
                Some(slot) => {
                    if let Some(edge) = open[slot].take() {
                        if normal.dot(edge.normal) <= threshold_dot {
                            segments.push(edge.segment);
                        }
                    }
                }
                None => {
                    let _ = lookup.insert(key, open.len());
                    open.push(Some(OpenEdge {
                        normal,
                        segment: [start, end],
                    }));
                }
            }
        }
    }

    // Edges with a single face are always drawn
    segments.extend(open.into_iter().flatten().map(|edge| edge.segment));
    segments
}
