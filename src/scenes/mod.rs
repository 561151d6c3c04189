mod cube;
mod earth;
mod icosahedron;
mod wormhole;

pub use cube::CubeDemo;
pub use earth::EarthDemo;
pub use icosahedron::IcosahedronDemo;
pub use wormhole::WormholeDemo;

use crate::camera::PerspectiveCamera;
use crate::config::{DemoConfig, DemoKind};
use crate::controls::OrbitControls;
use crate::core::display_context::DisplayContext;
use crate::core::frame::Frame;
use crate::driver::Stage;

/// Damping used by every demo with orbit controls
pub const ORBIT_DAMPING: f32 = 0.03;

/// A runnable scene: builds its stage once, then animates it each frame
pub trait Demo {
    fn name(&self) -> &str;

    /// Construct scene and camera for the given output size
    fn build(&mut self, display: DisplayContext) -> anyhow::Result<Stage>;

    /// Advance animation and camera state for one frame
    fn update(&mut self, stage: &mut Stage, frame: &Frame);
}

pub fn create_demo(config: &DemoConfig) -> Box<dyn Demo> {
    match config.demo {
        DemoKind::Cube => Box::new(CubeDemo::new()),
        DemoKind::Icosahedron => Box::new(IcosahedronDemo::new()),
        DemoKind::Earth => Box::new(EarthDemo::new(config.detail, config.stars, config.seed)),
        DemoKind::Wormhole => Box::new(WormholeDemo::new(config.seed)),
    }
}

fn perspective(display: DisplayContext, far: f32) -> PerspectiveCamera {
    let aspect = if display.is_empty() { 1.0 } else { display.aspect() };
    PerspectiveCamera::new(75.0, aspect, 0.1, far)
}

/// Feed this frame's pointer input to the controls and move the camera
fn orbit(controls: &mut OrbitControls, stage: &mut Stage) {
    controls.handle_input(&stage.input, &stage.camera, stage.display.height as f32);
    controls.update(&mut stage.camera);
}
