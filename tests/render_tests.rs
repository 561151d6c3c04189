use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use scene_demos::config::{DemoConfig, DemoKind};
use scene_demos::core::display_context::DisplayContext;
use scene_demos::core::frame::Frame;
use scene_demos::geometry::{box_geometry, edges};
use scene_demos::post::{Bloom, ToneMapping};
use scene_demos::scene::{AmbientLight, DirectionalLight, FogExp2};
use scene_demos::scenes::create_demo;
use scene_demos::{Material, Node, PerspectiveCamera, Rasterizer, Renderer, Scene};

const BLACK: [u8; 4] = [0, 0, 0, 255];

fn camera_at(z: f32) -> PerspectiveCamera {
    PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).with_position(Vec3::new(0.0, 0.0, z))
}

fn render(scene: &Scene, camera: &PerspectiveCamera, size: u32) -> Rasterizer {
    let mut rasterizer = Rasterizer::new(size, size);
    rasterizer.render(scene, camera).unwrap();
    rasterizer
}

// ============================================================================
// Meshes
// ============================================================================

#[test]
fn test_unlit_box_fills_center() {
    let mut scene = Scene::new();
    let _ = scene.add(Node::mesh(Arc::new(box_geometry(1.0, 1.0, 1.0)), Material::basic([1.0, 0.0, 0.0])));

    let rasterizer = render(&scene, &camera_at(5.0), 64);
    let canvas = rasterizer.canvas();

    assert_eq!(canvas.pixel(32, 32), Some([255, 0, 0, 255]));
    assert_eq!(canvas.pixel(0, 0), Some(BLACK));
    assert!(canvas.depth_at(32, 32).unwrap() < 1.0);
}

#[test]
fn test_background_color_used_for_clear() {
    let mut scene = Scene::new();
    scene.background = [0.0, 0.0, 1.0];
    let rasterizer = render(&scene, &camera_at(5.0), 8);
    assert!(rasterizer.canvas().pixels().iter().all(|p| *p == [0, 0, 255, 255]));
}

#[test]
fn test_nearer_mesh_wins_regardless_of_order() {
    let geometry = Arc::new(box_geometry(1.0, 1.0, 1.0));
    let mut scene = Scene::new();
    let _ = scene.add(Node::mesh(geometry.clone(), Material::basic([0.0, 1.0, 0.0])).with_position(Vec3::new(0.0, 0.0, 1.0)));
    let _ = scene.add(Node::mesh(geometry, Material::basic([1.0, 0.0, 0.0])).with_position(Vec3::new(0.0, 0.0, -1.0)));

    let rasterizer = render(&scene, &camera_at(5.0), 32);
    assert_eq!(rasterizer.canvas().pixel(16, 16), Some([0, 255, 0, 255]));
}

#[test]
fn test_camera_inside_box_sees_nothing_filled() {
    let mut scene = Scene::new();
    let _ = scene.add(Node::mesh(Arc::new(box_geometry(4.0, 4.0, 4.0)), Material::basic([1.0, 1.0, 1.0])));

    // All faces point away from a camera at the center and are culled
    let rasterizer = render(&scene, &camera_at(0.0), 16);
    assert!(rasterizer.canvas().pixels().iter().all(|p| *p == BLACK));
}

#[test]
fn test_mesh_crossing_near_plane_is_clipped() {
    let mut scene = Scene::new();
    let _ = scene.add(
        Node::mesh(Arc::new(box_geometry(1.0, 1.0, 1.0)), Material::basic([1.0, 1.0, 0.0]))
            .with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0)),
    );

    // The front corner sits closer than the near plane
    let rasterizer = render(&scene, &camera_at(0.75), 32);
    let canvas = rasterizer.canvas();
    let yellow = canvas.pixels().iter().filter(|p| **p == [255, 255, 0, 255]).count();

    assert!(yellow > 0);
    assert!(canvas.pixels().iter().all(|p| *p == [255, 255, 0, 255] || *p == BLACK));
}

#[test]
fn test_lit_face_brighter_than_shadowed_face() {
    let mut scene = Scene::new();
    let geometry = Arc::new(box_geometry(1.0, 1.0, 1.0));
    let _ = scene.add(
        Node::mesh(geometry, Material::flat([1.0, 1.0, 1.0]))
            .with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0)),
    );
    scene.ambient = Some(AmbientLight {
        color: [1.0; 3],
        intensity: 0.1,
    });
    scene.add_light(DirectionalLight::new(Vec3::new(1.0, 0.0, 0.0)));

    let rasterizer = render(&scene, &camera_at(3.0), 64);
    let canvas = rasterizer.canvas();
    let left = canvas.pixel(28, 32).unwrap();
    let right = canvas.pixel(36, 32).unwrap();

    assert!(right[0] > left[0]);
    assert!(left[0] > 0);
}

#[test]
fn test_hidden_node_not_drawn() {
    let mut scene = Scene::new();
    let mut node = Node::mesh(Arc::new(box_geometry(1.0, 1.0, 1.0)), Material::basic([1.0; 3]));
    node.visible = false;
    let _ = scene.add(node);

    let rasterizer = render(&scene, &camera_at(5.0), 16);
    assert!(rasterizer.canvas().pixels().iter().all(|p| *p == BLACK));
}

// ============================================================================
// Lines, Points, Fog
// ============================================================================

#[test]
fn test_box_edges_leave_interior_empty() {
    let mut scene = Scene::new();
    let lines = Arc::new(edges(&box_geometry(1.0, 1.0, 1.0), 1.0));
    let _ = scene.add(Node::lines(lines, [0.0, 1.0, 0.0]));

    let rasterizer = render(&scene, &camera_at(3.0), 64);
    let canvas = rasterizer.canvas();
    let green = canvas.pixels().iter().filter(|p| **p == [0, 255, 0, 255]).count();

    assert!(green > 0);
    assert_eq!(canvas.pixel(32, 32), Some(BLACK));
}

#[test]
fn test_wireframe_material_draws_triangle_edges() {
    let mut scene = Scene::new();
    let _ = scene.add(Node::mesh(Arc::new(box_geometry(1.0, 1.0, 1.0)), Material::wireframe([1.0; 3])));

    let rasterizer = render(&scene, &camera_at(3.0), 64);
    let lit = rasterizer.canvas().pixels().iter().filter(|p| **p != BLACK).count();
    assert!(lit > 0);
    assert!(lit < 64 * 64 / 2);
}

#[test]
fn test_points_behind_camera_skipped() {
    let mut scene = Scene::new();
    let positions = Arc::new(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0)]);
    let _ = scene.add(Node::points(positions, [1.0; 3], 3));

    let rasterizer = render(&scene, &camera_at(5.0), 33);
    let lit = rasterizer.canvas().pixels().iter().filter(|p| **p != BLACK).count();
    assert_eq!(lit, 9);
    assert_eq!(rasterizer.canvas().pixel(16, 16), Some([255, 255, 255, 255]));
}

#[test]
fn test_fog_fades_distant_geometry() {
    let geometry = Arc::new(box_geometry(1.0, 1.0, 1.0));
    let mut scene = Scene::new();
    let _ = scene.add(Node::mesh(geometry, Material::basic([1.0; 3])));

    scene.fog = Some(FogExp2::new([0.0; 3], 0.3));
    let near = render(&scene, &camera_at(2.0), 32).canvas().pixel(16, 16).unwrap();
    let far = render(&scene, &camera_at(8.0), 32).canvas().pixel(16, 16).unwrap();

    assert!(near[0] > far[0]);
    assert!(far[0] < 40);
}

// ============================================================================
// Post Passes
// ============================================================================

fn vertical_line() -> Scene {
    let mut scene = Scene::new();
    let segment = [Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
    let _ = scene.add(Node::lines(Arc::new(vec![segment]), [1.0; 3]));
    scene
}

#[test]
fn test_bloom_spreads_lit_line_into_neighbours() {
    let mut scene = vertical_line();
    let plain = render(&scene, &camera_at(3.0), 64);
    assert_eq!(plain.canvas().pixel(36, 32), Some(BLACK));

    scene.bloom = Some(Bloom::new(0.002, 3.5, 0.0));
    let bloomed = render(&scene, &camera_at(3.0), 64);
    let canvas = bloomed.canvas();

    assert!(canvas.pixel(36, 32).unwrap()[0] > 0);
    assert!(canvas.pixel(36, 32).unwrap()[0] > canvas.pixel(48, 32).unwrap()[0]);
}

#[test]
fn test_tone_mapping_dims_full_white() {
    let mut scene = vertical_line();
    scene.tone_mapping = ToneMapping::AcesFilmic;

    let rasterizer = render(&scene, &camera_at(3.0), 64);
    let line = rasterizer
        .canvas()
        .pixels()
        .iter()
        .find(|p| **p != BLACK)
        .copied()
        .unwrap();

    assert!(line[0] < 255 && line[0] > 150);
    assert_eq!(rasterizer.canvas().pixel(0, 0), Some(BLACK));
}

// ============================================================================
// Demos
// ============================================================================

#[test]
fn test_every_demo_builds_and_renders() {
    for demo in [DemoKind::Cube, DemoKind::Icosahedron, DemoKind::Earth, DemoKind::Wormhole] {
        let config = DemoConfig {
            demo,
            detail: 2,
            stars: 50,
            ..DemoConfig::default()
        };
        let mut demo = create_demo(&config);
        let display = DisplayContext::new(48, 32);
        let mut stage = demo.build(display).unwrap();
        assert_eq!(stage.camera.aspect, 1.5);

        let mut rasterizer = Rasterizer::new(48, 32);
        for i in 0..3 {
            demo.update(&mut stage, &Frame::new(i, Duration::from_secs_f32(i as f32 / 60.0), 1.0 / 60.0));
            rasterizer.render(&stage.scene, &stage.camera).unwrap();
        }

        let drawn = rasterizer.canvas().pixels().iter().any(|p| *p != BLACK);
        assert!(drawn, "{} rendered nothing", demo.name());
    }
}

#[test]
fn test_earth_center_is_lit_blue() {
    let config = DemoConfig {
        demo: DemoKind::Earth,
        detail: 3,
        stars: 0,
        ..DemoConfig::default()
    };
    let mut demo = create_demo(&config);
    let stage = demo.build(DisplayContext::new(64, 64)).unwrap();

    let rasterizer = render(&stage.scene, &stage.camera, 64);
    let center = rasterizer.canvas().pixel(32, 32).unwrap();
    assert!(center[2] > center[0]);
    assert!(center[2] > 60);
}
