use std::sync::Arc;

use glam::Vec3;

use super::{orbit, perspective, Demo, ORBIT_DAMPING};
use crate::controls::OrbitControls;
use crate::core::display_context::DisplayContext;
use crate::core::frame::Frame;
use crate::driver::Stage;
use crate::geometry::icosahedron_geometry;
use crate::math::{hex_to_rgb, rgb8};
use crate::scene::{AmbientLight, DirectionalLight, Material, Node, Scene};

/// Flat-shaded icosahedron with a slightly larger wireframe shell
pub struct IcosahedronDemo {
    controls: OrbitControls,
}

impl IcosahedronDemo {
    pub fn new() -> Self {
        Self {
            controls: OrbitControls::new(Vec3::ZERO).with_damping(ORBIT_DAMPING),
        }
    }
}

impl Default for IcosahedronDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for IcosahedronDemo {
    fn name(&self) -> &str {
        "icosahedron"
    }

    fn build(&mut self, display: DisplayContext) -> anyhow::Result<Stage> {
        let geometry = Arc::new(icosahedron_geometry(1.0, 2));

        let shell = Node::mesh(geometry.clone(), Material::wireframe(rgb8(92, 74, 255))).with_scale(1.001);
        let solid = Node::mesh(geometry, Material::flat(hex_to_rgb(0xffffdf))).with_child(shell);

        let mut scene = Scene::new();
        let _ = scene.add(solid);
        scene.ambient = Some(AmbientLight {
            color: hex_to_rgb(0x99ffff),
            intensity: 0.35,
        });
        scene.add_light(DirectionalLight::new(Vec3::new(1.0, 1.0, 1.0)));

        let camera = perspective(display, 10.0).with_position(Vec3::new(0.0, 0.0, 2.0));
        Ok(Stage::new(scene, camera, display))
    }

    fn update(&mut self, stage: &mut Stage, _frame: &Frame) {
        orbit(&mut self.controls, stage);
    }
}
