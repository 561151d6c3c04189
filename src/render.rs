use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::camera::PerspectiveCamera;
use crate::core::canvas::{screen_area, Canvas, RasterPoint};
use crate::driver::Renderer;
use crate::geometry::{Geometry, Segment};
use crate::math::{modulate, Rgb};
use crate::post;
use crate::scene::{FogExp2, Material, Payload, Scene};

/// Ambient term plus (direction, radiance) for each directional light
struct Lighting {
    ambient: Vec3,
    lights: Vec<(Vec3, Vec3)>,
}

impl Lighting {
    fn from_scene(scene: &Scene) -> Self {
        let ambient = scene
            .ambient
            .map(|a| Vec3::from(a.color) * a.intensity)
            .unwrap_or(Vec3::ZERO);
        let lights = scene
            .lights
            .iter()
            .map(|l| (l.direction(), Vec3::from(l.color) * l.intensity))
            .collect();
        Self { ambient, lights }
    }

    fn shade(&self, base: Rgb, normal: Vec3) -> Rgb {
        let irradiance = self
            .lights
            .iter()
            .fold(self.ambient, |acc, (dir, radiance)| {
                acc + *radiance * normal.dot(*dir).max(0.0)
            });
        modulate(base, irradiance.to_array())
    }
}

#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    position: Vec4,
    color: Vec3,
}

impl ClipVertex {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            color: self.color.lerp(other.color, t),
        }
    }
}

/// Signed distances to the six clip planes; inside when all are >= 0
fn plane_distances(v: Vec4) -> [f32; 6] {
    [v.w + v.x, v.w - v.x, v.w + v.y, v.w - v.y, v.z, v.w - v.z]
}

/// Liang-Barsky clipping of a segment against the view volume
fn clip_line(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    let (da, db) = (plane_distances(a), plane_distances(b));

    for (pa, pb) in da.into_iter().zip(db) {
        if pa < 0.0 && pb < 0.0 {
            return None;
        }
        if pa < 0.0 {
            t0 = t0.max(pa / (pa - pb));
        } else if pb < 0.0 {
            t1 = t1.min(pa / (pa - pb));
        }
    }

    if t0 > t1 {
        return None;
    }
    Some((a.lerp(b, t0), a.lerp(b, t1)))
}

/// Clip a triangle against the near plane (z >= 0), returning a convex polygon
fn clip_near(triangle: [ClipVertex; 3]) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(4);
    for i in 0..3 {
        let current = triangle[i];
        let next = triangle[(i + 1) % 3];
        let (dc, dn) = (current.position.z, next.position.z);

        if dc >= 0.0 {
            out.push(current);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            out.push(current.lerp(&next, dc / (dc - dn)));
        }
    }
    out
}

/// Software rasterizer drawing a [`Scene`] into a [`Canvas`]
pub struct Rasterizer {
    canvas: Canvas,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Clear, draw every visible node, then run the scene's post passes
    pub fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.canvas.clear(scene.background);

        let view_projection = camera.view_projection();
        let lighting = Lighting::from_scene(scene);
        let fog = scene.fog.as_ref();
        let mut pass = Pass {
            canvas: &mut self.canvas,
            fog,
            lighting: &lighting,
        };

        scene.walk(|node, world| {
            let mvp = view_projection * world;
            match &node.payload {
                Payload::Group => {}
                Payload::Mesh { geometry, material } => {
                    pass.mesh(geometry, material, mvp, world);
                }
                Payload::Lines { segments, color } => pass.lines(segments, *color, mvp),
                Payload::Points {
                    positions,
                    color,
                    size,
                } => pass.points(positions, *color, *size, mvp),
            }
        });

        post::apply(&mut self.canvas, scene.bloom.as_ref(), scene.tone_mapping);
    }
}

impl Renderer for Rasterizer {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> anyhow::Result<()> {
        self.draw(scene, camera);
        Ok(())
    }
}

/// State for drawing one frame
struct Pass<'a> {
    canvas: &'a mut Canvas,
    fog: Option<&'a FogExp2>,
    lighting: &'a Lighting,
}

impl Pass<'_> {
    fn project(&self, clip: Vec4) -> Option<RasterPoint> {
        if clip.w <= f32::EPSILON {
            return None;
        }
        let (width, height) = self.canvas.dimensions();
        let ndc = clip.truncate() / clip.w;

        Some(RasterPoint {
            x: (ndc.x * 0.5 + 0.5) * width as f32,
            y: (0.5 - ndc.y * 0.5) * height as f32,
            depth: ndc.z,
            view_depth: clip.w,
        })
    }

    fn line(&mut self, a: Vec4, b: Vec4, color: Rgb) {
        let Some((a, b)) = clip_line(a, b) else {
            return;
        };
        if let (Some(pa), Some(pb)) = (self.project(a), self.project(b)) {
            self.canvas.draw_line(pa, pb, color, self.fog);
        }
    }

    fn lines(&mut self, segments: &[Segment], color: Rgb, mvp: Mat4) {
        for [a, b] in segments {
            self.line(mvp * a.extend(1.0), mvp * b.extend(1.0), color);
        }
    }

    fn points(&mut self, positions: &[Vec3], color: Rgb, size: u32, mvp: Mat4) {
        for position in positions {
            let clip = mvp * position.extend(1.0);
            if plane_distances(clip).iter().any(|d| *d < 0.0) {
                continue;
            }
            if let Some(p) = self.project(clip) {
                self.canvas.draw_point(p, size, color, self.fog);
            }
        }
    }

    fn mesh(&mut self, geometry: &Geometry, material: &Material, mvp: Mat4, world: Mat4) {
        match *material {
            Material::Basic {
                color,
                wireframe: true,
            } => {
                for [a, b, c] in geometry.triangles() {
                    let clip = [a, b, c].map(|p| mvp * p.extend(1.0));
                    self.line(clip[0], clip[1], color);
                    self.line(clip[1], clip[2], color);
                    self.line(clip[2], clip[0], color);
                }
            }
            Material::Basic {
                color,
                wireframe: false,
            } => {
                for [a, b, c] in geometry.triangles() {
                    let vertices = [a, b, c].map(|p| ClipVertex {
                        position: mvp * p.extend(1.0),
                        color: Vec3::from(color),
                    });
                    self.triangle(vertices);
                }
            }
            Material::Standard {
                color,
                flat_shading,
            } => {
                let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
                let smooth = !flat_shading && geometry.has_normals();

                for [i0, i1, i2] in &geometry.indices {
                    let idx = [*i0 as usize, *i1 as usize, *i2 as usize];
                    let corners = idx.map(|i| geometry.positions[i]);

                    let colors = if smooth {
                        idx.map(|i| {
                            let normal = (normal_matrix * geometry.normals[i]).normalize_or_zero();
                            Vec3::from(self.lighting.shade(color, normal))
                        })
                    } else {
                        let local = (corners[1] - corners[0]).cross(corners[2] - corners[0]);
                        let normal = (normal_matrix * local).normalize_or_zero();
                        [Vec3::from(self.lighting.shade(color, normal)); 3]
                    };

                    let vertices = [0, 1, 2].map(|k| ClipVertex {
                        position: mvp * corners[k].extend(1.0),
                        color: colors[k],
                    });
                    self.triangle(vertices);
                }
            }
        }
    }

    /// Near-clip, cull back faces, then fill
    fn triangle(&mut self, vertices: [ClipVertex; 3]) {
        let polygon = clip_near(vertices);
        if polygon.len() < 3 {
            return;
        }

        let projected: Option<Vec<RasterPoint>> =
            polygon.iter().map(|v| self.project(v.position)).collect();
        let Some(projected) = projected else {
            return;
        };

        for k in 1..polygon.len() - 1 {
            let points = [projected[0], projected[k], projected[k + 1]];
            if screen_area(&points) >= 0.0 {
                continue;
            }
            let colors = [polygon[0].color, polygon[k].color, polygon[k + 1].color]
                .map(|c| c.to_array());
            self.canvas.fill_triangle(points, colors, self.fog);
        }
    }
}
