use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::core::controller::{Button, Controller};

const EPS: f32 = 1e-6;

/// Radius, polar angle from +Y and azimuth around Y measured from +Z
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit the camera around a target with left drag, pan with right drag,
/// zoom with the wheel
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    delta: Spherical,
    pan_offset: Vec3,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta: Spherical::default(),
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = factor;
        self
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    /// Positive steps move towards the target
    pub fn dolly(&mut self, steps: f32) {
        self.scale *= self.zoom_scale().powf(steps);
    }

    /// Pan by a pointer offset in pixels
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport_height: f32) {
        let distance = (camera.position - self.target).length();
        let visible = 2.0 * distance * (camera.fov.to_radians() / 2.0).tan();
        let per_pixel = visible / viewport_height * self.pan_speed;

        self.pan_offset += -camera.right() * dx * per_pixel + camera.up() * dy * per_pixel;
    }

    /// Accumulate pointer drag and wheel motion since the last frame
    pub fn handle_input(
        &mut self,
        input: &dyn Controller,
        camera: &PerspectiveCamera,
        viewport_height: f32,
    ) {
        if viewport_height <= 0.0 {
            return;
        }
        let (dx, dy) = input.pointer_delta();

        if input.is_down(Button::MouseLeft) {
            self.rotate_left(TAU * dx / viewport_height * self.rotate_speed);
            self.rotate_up(TAU * dy / viewport_height * self.rotate_speed);
        } else if input.is_down(Button::MouseRight) {
            self.pan(dx, dy, camera, viewport_height);
        } else if input.is_down(Button::MouseMiddle) {
            self.dolly(-dy / 10.0);
        }

        let wheel = input.wheel_delta();
        if wheel != 0.0 {
            self.dolly(wheel);
        }
    }

    /// Apply pending motion to the camera and face the target
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.delta.theta * step;
        spherical.phi += self.delta.phi * step;

        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * step;

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
    }
}
