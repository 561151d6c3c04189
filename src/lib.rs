pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod driver;
pub mod geometry;
pub mod math;
pub mod post;
pub mod render;
pub mod scene;
pub mod scenes;

pub use camera::PerspectiveCamera;
pub use driver::{DriverError, FrameDriver, FrameScheduler, RenderContext, Renderer, Stage};
pub use render::Rasterizer;
pub use scene::{Material, Node, NodeId, Scene};
