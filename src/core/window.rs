use std::sync::Arc;

use winit::window::Window;

use super::surface_renderer::SurfaceRenderer;
use crate::camera::PerspectiveCamera;
use crate::driver::{FrameScheduler, Renderer};
use crate::render::Rasterizer;
use crate::scene::Scene;

/// Paces the frame driver with winit redraw requests
pub struct RedrawScheduler {
    window: Arc<Window>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// Rasterizes on the CPU and presents the result on the window surface
pub struct WindowRenderer {
    rasterizer: Rasterizer,
    surface: SurfaceRenderer,
}

impl WindowRenderer {
    pub fn new(surface: SurfaceRenderer) -> Self {
        let (width, height) = surface.dimensions();
        Self {
            rasterizer: Rasterizer::new(width, height),
            surface,
        }
    }
}

impl Renderer for WindowRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.rasterizer.resize(width, height);
        self.surface.resize(width, height);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> anyhow::Result<()> {
        self.rasterizer.draw(scene, camera);
        let canvas = self.rasterizer.canvas();
        let (width, height) = canvas.dimensions();
        self.surface.present(canvas.as_bytes(), width, height)
    }
}
