use std::sync::Arc;

use glam::Vec3;

use super::{perspective, Demo};
use crate::core::display_context::DisplayContext;
use crate::core::frame::Frame;
use crate::driver::Stage;
use crate::geometry::box_geometry;
use crate::scene::{Material, Node, NodeId, Scene};

/// Radians per second around Y
const SPIN: f32 = 0.6;

/// A single red box spinning in front of the camera
pub struct CubeDemo {
    cube: Option<NodeId>,
}

impl CubeDemo {
    pub fn new() -> Self {
        Self { cube: None }
    }
}

impl Default for CubeDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for CubeDemo {
    fn name(&self) -> &str {
        "cube"
    }

    fn build(&mut self, display: DisplayContext) -> anyhow::Result<Stage> {
        let mut scene = Scene::new();
        let geometry = Arc::new(box_geometry(1.0, 1.0, 1.0));
        self.cube = Some(scene.add(Node::mesh(geometry, Material::basic([1.0, 0.0, 0.0]))));

        let camera = perspective(display, 1000.0).with_position(Vec3::new(0.0, 0.0, 5.0));
        Ok(Stage::new(scene, camera, display))
    }

    fn update(&mut self, stage: &mut Stage, frame: &Frame) {
        if let Some(cube) = self.cube.and_then(|id| stage.scene.get_mut(id)) {
            cube.transform.rotation.y += SPIN * frame.delta;
        }
    }
}
