use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use anyhow::Context;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{perspective, Demo};
use crate::core::display_context::DisplayContext;
use crate::core::frame::Frame;
use crate::driver::Stage;
use crate::geometry::{box_geometry, edges, tube_geometry, CatmullRomCurve3};
use crate::math::hsl_to_rgb;
use crate::post::{Bloom, ToneMapping};
use crate::scene::{FogExp2, Node, Scene};

const TUBULAR_SEGMENTS: usize = 222;
const RADIAL_SEGMENTS: usize = 16;
const TUBE_RADIUS: f32 = 0.65;
const EDGE_THRESHOLD: f32 = 0.2;
const BOX_COUNT: usize = 55;
const BOX_SIZE: f32 = 0.075;
const BLOOM_THRESHOLD: f32 = 0.002;
const BLOOM_STRENGTH: f32 = 3.5;
/// Milliseconds of scaled time for one full lap
const LOOP_TIME: f64 = 10.0 * 1000.0;
/// How far ahead along the path the camera looks
const LOOK_AHEAD: f32 = 0.03;

/// Closed loop the tunnel follows, wobbling in height and radius
fn path_points() -> Vec<Vec3> {
    (0..16)
        .map(|i| {
            let angle = i as f32 / 16.0 * TAU;
            let radius = 10.0 + (angle * 3.0).sin() * 2.0;
            Vec3::new(
                angle.cos() * radius,
                (angle * 2.0).sin() * 2.5,
                angle.sin() * radius + (angle * 2.0).cos() * 1.5,
            )
        })
        .collect()
}

/// Position along the loop, in [0, 1), for `millis` of elapsed time
fn progress(millis: f64) -> f32 {
    let time = millis * 0.1;
    ((time % LOOP_TIME) / LOOP_TIME) as f32
}

/// Fly the camera through a fogged tube of edge lines past scattered boxes
pub struct WormholeDemo {
    seed: u64,
    path: Option<CatmullRomCurve3>,
}

impl WormholeDemo {
    pub fn new(seed: u64) -> Self {
        Self { seed, path: None }
    }

    fn place_camera(&self, stage: &mut Stage, millis: f64) {
        let Some(path) = &self.path else {
            return;
        };
        let p = progress(millis);
        stage.camera.position = path.point_at(p);
        stage.camera.look_at(path.point_at((p + LOOK_AHEAD) % 1.0));
    }
}

impl Demo for WormholeDemo {
    fn name(&self) -> &str {
        "wormhole"
    }

    fn build(&mut self, display: DisplayContext) -> anyhow::Result<Stage> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let path = CatmullRomCurve3::new(path_points(), true).context("wormhole path")?;

        let mut scene = Scene::new();
        scene.fog = Some(FogExp2::new([0.0; 3], 0.3));
        scene.bloom = Some(Bloom::new(BLOOM_THRESHOLD, BLOOM_STRENGTH, 0.0));
        scene.tone_mapping = ToneMapping::AcesFilmic;

        let tube = tube_geometry(&path, TUBULAR_SEGMENTS, TUBE_RADIUS, RADIAL_SEGMENTS, true)
            .context("wormhole tube")?;
        let tube_lines = edges(&tube, EDGE_THRESHOLD);
        log::debug!("wormhole: {} tube edges", tube_lines.len());
        let _ = scene.add(Node::lines(Arc::new(tube_lines), [1.0, 0.0, 0.0]));

        let box_lines = Arc::new(edges(&box_geometry(BOX_SIZE, BOX_SIZE, BOX_SIZE), EDGE_THRESHOLD));
        for i in 0..BOX_COUNT {
            let p = (i as f32 / BOX_COUNT as f32 + rng.random::<f32>() * 0.1) % 1.0;
            let mut position = path.point_at(p);
            position.x += rng.random::<f32>() - 0.4;
            position.z += rng.random::<f32>() - 0.4;

            let rotation = Vec3::new(
                rng.random::<f32>() * PI,
                rng.random::<f32>() * PI,
                rng.random::<f32>() * PI,
            );
            let color = hsl_to_rgb(0.7 - p, 1.0, 0.5);

            let _ = scene.add(
                Node::lines(box_lines.clone(), color)
                    .with_position(position)
                    .with_rotation(rotation),
            );
        }

        let camera = perspective(display, 1000.0);
        self.path = Some(path);

        let mut stage = Stage::new(scene, camera, display);
        self.place_camera(&mut stage, 0.0);
        Ok(stage)
    }

    fn update(&mut self, stage: &mut Stage, frame: &Frame) {
        self.place_camera(stage, frame.millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_progress_wraps() {
        assert_eq!(progress(0.0), 0.0);
        assert!((progress(50_000.0) - 0.5).abs() < 1e-6);
        assert!(progress(100_000.0) < 1e-6);
    }

    #[test]
    fn test_progress_stays_smooth_after_hours() {
        let start = 10.0 * 3600.0 * 1000.0 + 1234.0;
        let step = progress(start + 16.0) - progress(start);
        assert!((step - 16.0 * 0.1 / LOOP_TIME as f32).abs() < 1e-6);
    }

    #[test]
    fn test_build_adds_tube_and_boxes() {
        let mut demo = WormholeDemo::new(3);
        let stage = demo.build(DisplayContext::new(800, 600)).unwrap();
        assert_eq!(stage.scene.len(), 1 + BOX_COUNT);
        assert!(stage.scene.fog.is_some());

        let bloom = stage.scene.bloom.unwrap();
        assert_eq!(bloom.threshold, BLOOM_THRESHOLD);
        assert_eq!(bloom.strength, BLOOM_STRENGTH);
        assert_eq!(bloom.radius, 0.0);
        assert_eq!(stage.scene.tone_mapping, ToneMapping::AcesFilmic);
    }

    #[test]
    fn test_camera_follows_path() {
        let mut demo = WormholeDemo::new(3);
        let mut stage = demo.build(DisplayContext::new(800, 600)).unwrap();
        demo.update(&mut stage, &Frame::new(10, Duration::from_secs(25), 0.016));

        let path = demo.path.as_ref().unwrap();
        let p = progress(25_000.0);
        assert!(stage.camera.position.distance(path.point_at(p)) < 1e-4);

        let ahead = (path.point_at(p + LOOK_AHEAD) - stage.camera.position).normalize();
        assert!(stage.camera.forward().distance(ahead) < 1e-3);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = WormholeDemo::new(11).build(DisplayContext::new(64, 64)).unwrap();
        let b = WormholeDemo::new(11).build(DisplayContext::new(64, 64)).unwrap();
        let positions = |stage: &Stage| {
            stage
                .scene
                .iter()
                .map(|(_, node)| node.transform.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(&a), positions(&b));
    }
}
