use std::sync::Arc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{orbit, perspective, Demo, ORBIT_DAMPING};
use crate::controls::OrbitControls;
use crate::core::display_context::DisplayContext;
use crate::core::frame::Frame;
use crate::driver::Stage;
use crate::geometry::{icosahedron_geometry, star_field};
use crate::math::hex_to_rgb;
use crate::scene::{DirectionalLight, Material, Node, NodeId, Scene};

/// Axial tilt of the globe in degrees
const TILT: f32 = 23.4;
/// Radians per second around the tilted axis
const SPIN: f32 = 0.12;
const STAR_SPREAD: f32 = 2000.0;

/// Tilted spinning globe lit by a distant sun, inside a star field
pub struct EarthDemo {
    detail: u32,
    stars: usize,
    seed: u64,
    controls: OrbitControls,
    globe: Option<NodeId>,
}

impl EarthDemo {
    pub fn new(detail: u32, stars: usize, seed: u64) -> Self {
        Self {
            detail,
            stars,
            seed,
            controls: OrbitControls::new(Vec3::ZERO).with_damping(ORBIT_DAMPING),
            globe: None,
        }
    }
}

impl Demo for EarthDemo {
    fn name(&self) -> &str {
        "earth"
    }

    fn build(&mut self, display: DisplayContext) -> anyhow::Result<Stage> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut scene = Scene::new();

        let sphere = Arc::new(icosahedron_geometry(1.0, self.detail).with_vertex_normals());
        let earth = Node::mesh(sphere, Material::standard(hex_to_rgb(0x2f6fd6)));
        let group = Node::group()
            .with_rotation(Vec3::new(0.0, 0.0, -TILT.to_radians()))
            .with_child(earth);
        self.globe = Some(scene.add(group));

        let stars = star_field(&mut rng, self.stars, STAR_SPREAD);
        let _ = scene.add(Node::points(Arc::new(stars), [1.0; 3], 1));

        scene.add_light(DirectionalLight::new(Vec3::new(-2.0, 0.5, 1.5)));

        log::debug!("earth: detail {} with {} stars", self.detail, self.stars);

        let camera = perspective(display, 1000.0).with_position(Vec3::new(0.0, 0.0, 5.0));
        Ok(Stage::new(scene, camera, display))
    }

    fn update(&mut self, stage: &mut Stage, frame: &Frame) {
        let earth = self
            .globe
            .and_then(|id| stage.scene.get_mut(id))
            .and_then(|group| group.children.first_mut());
        if let Some(earth) = earth {
            earth.transform.rotation.y += SPIN * frame.delta;
        }

        orbit(&mut self.controls, stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::scene::Payload;

    #[test]
    fn test_build_adds_globe_and_stars() {
        let mut demo = EarthDemo::new(2, 100, 1);
        let stage = demo.build(DisplayContext::new(800, 600)).unwrap();
        assert_eq!(stage.scene.len(), 2);
        assert_eq!(stage.scene.lights.len(), 1);

        let star_count = stage
            .scene
            .iter()
            .find_map(|(_, node)| match &node.payload {
                Payload::Points { positions, .. } => Some(positions.len()),
                _ => None,
            });
        assert_eq!(star_count, Some(100));
    }

    #[test]
    fn test_globe_spins_but_group_keeps_tilt() {
        let mut demo = EarthDemo::new(1, 0, 1);
        let mut stage = demo.build(DisplayContext::new(800, 600)).unwrap();
        demo.update(&mut stage, &Frame::new(1, Duration::from_secs(1), 1.0));

        let group = stage.scene.get(demo.globe.unwrap()).unwrap();
        assert!((group.transform.rotation.z + TILT.to_radians()).abs() < 1e-6);
        assert!((group.children[0].transform.rotation.y - SPIN).abs() < 1e-6);
    }
}
