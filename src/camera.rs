use glam::{Mat4, Quat, Vec3};

/// Perspective camera: position, orientation and projection parameters
///
/// With an identity orientation the camera looks down -Z with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub orientation: Quat,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov,
            aspect,
            near,
            far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Turn to face `target`, keeping +Y up where possible
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() <= f32::EPSILON {
            return;
        }
        let forward = forward.normalize();

        // Straight up or down has no usable horizon; borrow Z as up
        let up = if forward.dot(Vec3::Y).abs() > 0.9999 {
            Vec3::Z
        } else {
            Vec3::Y
        };

        let right = forward.cross(up).normalize();
        let up = right.cross(forward);
        self.orientation =
            Quat::from_mat3(&glam::Mat3::from_cols(right, up, -forward)).normalize();
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    /// View-to-clip matrix, depth mapped to [0, 1]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        assert!(camera.forward().distance(Vec3::NEG_Z) < 1e-6);
        assert!(camera.up().distance(Vec3::Y) < 1e-6);
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut camera =
            PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(Vec3::new(3.0, 2.0, 5.0));
        let target = Vec3::new(-1.0, 0.0, 0.0);
        camera.look_at(target);

        let expected = (target - camera.position).normalize();
        assert!(camera.forward().distance(expected) < 1e-5);
        assert!(camera.up().y > 0.0);
    }

    #[test]
    fn test_look_at_straight_down() {
        let mut camera =
            PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(Vec3::new(0.0, 5.0, 0.0));
        camera.look_at(Vec3::ZERO);

        assert!(camera.forward().distance(Vec3::NEG_Y) < 1e-5);
        assert!(!camera.orientation.is_nan());
    }

    #[test]
    fn test_look_at_own_position_is_ignored() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        camera.look_at(Vec3::ZERO);
        assert_eq!(camera.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut camera =
            PerspectiveCamera::new(60.0, 16.0 / 9.0, 0.1, 100.0).with_position(Vec3::new(4.0, 4.0, 4.0));
        camera.look_at(Vec3::ZERO);

        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_set_aspect() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        camera.set_aspect(1280.0 / 720.0);
        assert_eq!(camera.aspect, 1280.0 / 720.0);
    }
}
