use glam::Vec3;

use super::GeometryError;

/// Samples used to build the arc-length table
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Centripetal Catmull-Rom spline through a list of control points
///
/// `point(t)` walks the curve in its natural parameter, which speeds up and
/// slows down with control point spacing. `point_at(u)` walks it by arc
/// length, so equal steps of `u` cover equal distances.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve3 {
    points: Vec<Vec3>,
    closed: bool,
    /// Cumulative length at each of the ARC_LENGTH_DIVISIONS + 1 samples
    arc_lengths: Vec<f32>,
}

impl CatmullRomCurve3 {
    pub fn new(points: Vec<Vec3>, closed: bool) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewControlPoints(points.len()));
        }

        let mut curve = Self {
            points,
            closed,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.compute_arc_lengths();
        Ok(curve)
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Total arc length (approximated by the sample polyline)
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at curve parameter `t` in [0, 1]
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let spans = if self.closed { n } else { n - 1 };

        let p = spans as f32 * t.clamp(0.0, 1.0);
        let mut index = p.floor() as usize;
        let mut weight = p - index as f32;

        if !self.closed && index >= n - 1 {
            index = n - 2;
            weight = 1.0;
        }

        let at = |i: usize| self.points[i % n];
        let p1 = at(index);
        let p2 = at(index + 1);

        let p0 = if self.closed || index > 0 {
            at(index + n - 1)
        } else {
            // Reflect to fabricate the missing neighbour
            2.0 * self.points[0] - self.points[1]
        };
        let p3 = if self.closed || index + 2 < n {
            at(index + 2)
        } else {
            2.0 * self.points[n - 1] - self.points[n - 2]
        };

        centripetal(p0, p1, p2, p3, weight)
    }

    /// Point at arc-length fraction `u` in [0, 1]
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at arc-length fraction `u`
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let t = self.u_to_t(u);
        let delta = 1e-4;
        let before = self.point((t - delta).max(0.0));
        let after = self.point((t + delta).min(1.0));
        (after - before).normalize_or_zero()
    }

    /// `divisions + 1` points evenly spaced in the curve parameter
    pub fn points(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point(d as f32 / divisions as f32))
            .collect()
    }

    /// `divisions + 1` points evenly spaced by arc length
    pub fn spaced_points(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point_at(d as f32 / divisions as f32))
            .collect()
    }

    fn compute_arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut total = 0.0;
        let mut last = self.point(0.0);
        lengths.push(0.0);

        for d in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point(d as f32 / ARC_LENGTH_DIVISIONS as f32);
            total += current.distance(last);
            lengths.push(total);
            last = current;
        }

        lengths
    }

    /// Map an arc-length fraction to the curve parameter
    fn u_to_t(&self, u: f32) -> f32 {
        let lengths = &self.arc_lengths;
        let total = self.length();
        if total <= 0.0 {
            return u.clamp(0.0, 1.0);
        }

        let target = u.clamp(0.0, 1.0) * total;

        // Last sample whose length does not exceed the target
        let i = lengths
            .partition_point(|&l| l <= target)
            .saturating_sub(1)
            .min(lengths.len() - 2);

        let before = lengths[i];
        let segment = lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            ((target - before) / segment).clamp(0.0, 1.0)
        } else {
            0.0
        };

        (i as f32 + fraction) / (lengths.len() - 1) as f32
    }
}

/// Evaluate one centripetal Catmull-Rom span between p1 and p2
fn centripetal(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, weight: f32) -> Vec3 {
    let mut dt0 = p0.distance_squared(p1).powf(0.25);
    let mut dt1 = p1.distance_squared(p2).powf(0.25);
    let mut dt2 = p2.distance_squared(p3).powf(0.25);

    // Coincident control points
    if dt1 < 1e-4 {
        dt1 = 1.0;
    }
    if dt0 < 1e-4 {
        dt0 = dt1;
    }
    if dt2 < 1e-4 {
        dt2 = dt1;
    }

    let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    // Hermite form
    let c0 = p1;
    let c1 = t1;
    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * t1 - t2;
    let c3 = 2.0 * p1 - 2.0 * p2 + t1 + t2;

    let w2 = weight * weight;
    c0 + c1 * weight + c2 * w2 + c3 * w2 * weight
}
