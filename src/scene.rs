use std::collections::BTreeMap;
use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::geometry::{Geometry, Segment};
use crate::math::{mix, Rgb};
use crate::post::{Bloom, ToneMapping};

/// Position, Euler rotation (XYZ order, radians) and scale of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-parent matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Surface appearance of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Unlit; `wireframe` draws every triangle edge instead of filling
    Basic { color: Rgb, wireframe: bool },
    /// Diffuse lit by the scene lights; `flat_shading` lights per face
    Standard { color: Rgb, flat_shading: bool },
}

impl Material {
    pub fn basic(color: Rgb) -> Self {
        Self::Basic {
            color,
            wireframe: false,
        }
    }

    pub fn wireframe(color: Rgb) -> Self {
        Self::Basic {
            color,
            wireframe: true,
        }
    }

    pub fn standard(color: Rgb) -> Self {
        Self::Standard {
            color,
            flat_shading: false,
        }
    }

    pub fn flat(color: Rgb) -> Self {
        Self::Standard {
            color,
            flat_shading: true,
        }
    }

    pub fn color(&self) -> Rgb {
        match *self {
            Self::Basic { color, .. } | Self::Standard { color, .. } => color,
        }
    }
}

/// What a node draws
#[derive(Debug, Clone)]
pub enum Payload {
    /// Draws nothing; only carries a transform for its children
    Group,
    Mesh {
        geometry: Arc<Geometry>,
        material: Material,
    },
    Lines {
        segments: Arc<Vec<Segment>>,
        color: Rgb,
    },
    Points {
        positions: Arc<Vec<Vec3>>,
        color: Rgb,
        /// Square side in pixels
        size: u32,
    },
}

/// Scene graph node; children inherit the node's transform
#[derive(Debug, Clone)]
pub struct Node {
    pub transform: Transform,
    pub payload: Payload,
    pub children: Vec<Node>,
    pub visible: bool,
}

impl Node {
    fn with_payload(payload: Payload) -> Self {
        Self {
            transform: Transform::IDENTITY,
            payload,
            children: Vec::new(),
            visible: true,
        }
    }

    pub fn group() -> Self {
        Self::with_payload(Payload::Group)
    }

    pub fn mesh(geometry: Arc<Geometry>, material: Material) -> Self {
        Self::with_payload(Payload::Mesh { geometry, material })
    }

    pub fn lines(segments: Arc<Vec<Segment>>, color: Rgb) -> Self {
        Self::with_payload(Payload::Lines { segments, color })
    }

    pub fn points(positions: Arc<Vec<Vec3>>, color: Rgb, size: u32) -> Self {
        Self::with_payload(Payload::Points {
            positions,
            color,
            size,
        })
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vec3::splat(scale);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Visit this node and its descendants with their world matrices
    pub fn walk<'a>(&'a self, parent: Mat4, visit: &mut impl FnMut(&'a Node, Mat4)) {
        if !self.visible {
            return;
        }
        let world = parent * self.transform.matrix();
        visit(self, world);
        for child in &self.children {
            child.walk(world, visit);
        }
    }
}

/// Light shining from `position` towards the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            color: [1.0; 3],
            intensity: 1.0,
        }
    }

    /// Unit vector from a surface towards the light
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

/// Exponential squared fog, thickening with view distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogExp2 {
    pub color: Rgb,
    pub density: f32,
}

impl FogExp2 {
    pub fn new(color: Rgb, density: f32) -> Self {
        Self { color, density }
    }

    /// Fraction of fog color at `depth` view units, in [0, 1]
    pub fn factor(&self, depth: f32) -> f32 {
        let d = self.density * depth;
        1.0 - (-d * d).exp()
    }

    pub fn apply(&self, color: Rgb, depth: f32) -> Rgb {
        mix(color, self.color, self.factor(depth))
    }
}

/// Handle to a top-level node in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Renderable objects plus lighting for one view
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
    pub background: Rgb,
    pub fog: Option<FogExp2>,
    pub ambient: Option<AmbientLight>,
    pub lights: Vec<DirectionalLight>,
    /// Applied to the finished frame, before tone mapping
    pub bloom: Option<Bloom>,
    pub tone_mapping: ToneMapping,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let _ = self.nodes.insert(id, node);
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn add_light(&mut self, light: DirectionalLight) {
        self.lights.push(light);
    }

    /// Visit every visible node with its world matrix
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Node, Mat4)) {
        for node in self.nodes.values() {
            node.walk(Mat4::IDENTITY, &mut visit);
        }
    }
}
