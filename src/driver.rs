use std::time::Duration;

use log::{debug, trace};
use thiserror::Error;

use crate::camera::PerspectiveCamera;
use crate::core::display_context::DisplayContext;
use crate::core::frame::Frame;
use crate::core::input_adapter::InputState;
use crate::scene::Scene;

/// Draws a scene from a camera into an output surface
pub trait Renderer {
    /// Resize the output surface; both dimensions are non-zero
    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> anyhow::Result<()>;
}

/// Host primitive that delivers one display refresh per request
pub trait FrameScheduler {
    /// Ask for `FrameDriver::on_refresh` to be called at the next refresh
    fn request_frame(&mut self);
}

/// Everything a demo mutates between frames
#[derive(Debug, Clone)]
pub struct Stage {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub input: InputState,
    pub display: DisplayContext,
}

impl Stage {
    pub fn new(scene: Scene, camera: PerspectiveCamera, display: DisplayContext) -> Self {
        Self {
            scene,
            camera,
            input: InputState::new(),
            display,
        }
    }
}

/// Explicitly owned scene, camera and renderer handed to the frame callback
pub struct RenderContext<R> {
    pub stage: Stage,
    pub renderer: R,
}

impl<R: Renderer> RenderContext<R> {
    pub fn new(stage: Stage, renderer: R) -> Self {
        Self { stage, renderer }
    }

    /// Draw the stage's scene through its camera
    pub fn render(&mut self) -> anyhow::Result<()> {
        self.renderer.render(&self.stage.scene, &self.stage.camera)
    }

    /// Match camera aspect and renderer surface to new dimensions
    pub fn resize(&mut self, width: u32, height: u32) {
        self.stage.display = DisplayContext::new(width, height);
        self.stage.camera.set_aspect(width as f32 / height as f32);
        self.renderer.resize(width, height);
    }
}

/// Per-frame callback; an error halts the loop
pub type FrameCallback<R> = Box<dyn FnMut(&mut RenderContext<R>, &Frame) -> anyhow::Result<()>>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("frame callback failed on frame {frame}")]
    CallbackFailure {
        frame: u64,
        #[source]
        source: anyhow::Error,
    },
}

/// Cooperative animation loop paced by the host's refresh primitive
///
/// The driver holds at most one outstanding refresh request. Each delivered
/// refresh runs the callback once, then a new refresh is requested only if
/// the driver is still running, so there is never more than one loop.
pub struct FrameDriver<R, S> {
    context: RenderContext<R>,
    scheduler: S,
    callback: Option<FrameCallback<R>>,
    pending: bool,
    origin: Option<Duration>,
    elapsed: Duration,
    frame_count: u64,
}

impl<R: Renderer, S: FrameScheduler> FrameDriver<R, S> {
    pub fn new(context: RenderContext<R>, scheduler: S) -> Self {
        Self {
            context,
            scheduler,
            callback: None,
            pending: false,
            origin: None,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Begin invoking `callback` once per refresh
    ///
    /// Calling this while running swaps the callback without starting a
    /// second loop.
    pub fn start<F>(&mut self, callback: F)
    where
        F: FnMut(&mut RenderContext<R>, &Frame) -> anyhow::Result<()> + 'static,
    {
        if self.callback.replace(Box::new(callback)).is_some() {
            debug!("frame callback replaced");
        } else {
            debug!("frame driver started");
        }
        self.schedule();
    }

    /// Cancel future invocations; stopping twice is a no-op
    pub fn stop(&mut self) {
        if self.callback.take().is_some() {
            debug!("frame driver stopped after {} frames", self.frame_count);
        }
    }

    pub fn is_running(&self) -> bool {
        self.callback.is_some()
    }

    /// True while a refresh has been requested but not yet delivered
    pub fn has_pending_frame(&self) -> bool {
        self.pending
    }

    /// Update camera aspect and output surface; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("ignoring resize to {}x{}", width, height);
            return;
        }
        debug!("resize to {}x{}", width, height);
        self.context.resize(width, height);
    }

    /// Deliver one display refresh at host time `timestamp`
    ///
    /// Runs the callback if running and schedules the next refresh. A failing
    /// callback stops the driver and its error is returned.
    pub fn on_refresh(&mut self, timestamp: Duration) -> Result<(), DriverError> {
        self.pending = false;

        let Some(callback) = self.callback.as_mut() else {
            trace!("refresh delivered while stopped");
            return Ok(());
        };

        let origin = *self.origin.get_or_insert(timestamp);
        let elapsed = timestamp.saturating_sub(origin).max(self.elapsed);
        let delta = elapsed - self.elapsed;
        self.elapsed = elapsed;

        let frame = Frame::new(self.frame_count, elapsed, delta.as_secs_f32());
        self.frame_count += 1;

        if let Err(source) = callback(&mut self.context, &frame) {
            self.callback = None;
            debug!("frame driver halted on frame {}", frame.number);
            return Err(DriverError::CallbackFailure {
                frame: frame.number,
                source,
            });
        }

        self.schedule();
        Ok(())
    }

    fn schedule(&mut self) {
        if self.callback.is_some() && !self.pending {
            self.pending = true;
            self.scheduler.request_frame();
        }
    }

    pub fn context(&self) -> &RenderContext<R> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext<R> {
        &mut self.context
    }

    /// Number of callback invocations so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Elapsed time handed to the most recent frame
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
