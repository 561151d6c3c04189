use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use scene_demos::cli::Cli;
use scene_demos::config::DemoConfig;
use scene_demos::core::clock::Clock;
use scene_demos::core::display_context::DisplayContext;
use scene_demos::core::gpu_context::GpuContext;
use scene_demos::core::surface_renderer::SurfaceRenderer;
use scene_demos::core::timer::FpsCounter;
use scene_demos::core::window::{RedrawScheduler, WindowRenderer};
use scene_demos::driver::{FrameDriver, RenderContext};
use scene_demos::scenes::create_demo;

const FPS_UPDATE_INTERVAL: f32 = 1.0;

type Driver = FrameDriver<WindowRenderer, RedrawScheduler>;

struct App {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    driver: Option<Driver>,
    clock: Clock,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            window: None,
            driver: None,
            clock: Clock::new(),
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let mut demo = create_demo(&self.config);
        let title = format!("Scene Demos - {}", demo.name());

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(title.clone())
                        .with_inner_size(winit::dpi::LogicalSize::new(
                            self.config.width,
                            self.config.height,
                        )),
                )
                .context("failed to create window")?,
        );
        let size = window.inner_size();
        let display = DisplayContext::new(size.width.max(1), size.height.max(1));

        let (gpu, surface) = pollster::block_on(GpuContext::for_window(window.clone()))?;
        let surface = SurfaceRenderer::new(Arc::new(gpu), surface, display.width, display.height)?;

        let stage = demo
            .build(display)
            .with_context(|| format!("failed to build {} demo", demo.name()))?;
        info!("{}: {} objects, {}x{}", demo.name(), stage.scene.len(), display.width, display.height);

        let context = RenderContext::new(stage, WindowRenderer::new(surface));
        let mut driver = FrameDriver::new(context, RedrawScheduler::new(window.clone()));

        let mut fps = FpsCounter::new(FPS_UPDATE_INTERVAL);
        let no_ui = self.config.no_ui;
        let title_window = window.clone();
        driver.start(move |ctx, frame| {
            demo.update(&mut ctx.stage, frame);
            ctx.stage.input.reset_deltas();
            ctx.render()?;

            if let Some(rate) = fps.tick(frame.delta) {
                info!("{:.1} fps", rate);
                if !no_ui {
                    title_window.set_title(&format!("{} - {:.0} fps", title, rate));
                }
            }
            Ok(())
        });

        self.window = Some(window);
        self.driver = Some(driver);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        if let Some(driver) = &mut self.driver {
            driver.stop();
        }
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(driver) = &mut self.driver else {
            return;
        };

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                driver.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => driver.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(e) = driver.on_refresh(self.clock.elapsed()) {
                    self.fail(event_loop, e.into());
                }
            }
            event => driver.context_mut().stage.input.process_event(&event),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DemoConfig::from_cli(&cli).context("invalid configuration")?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    if !app.config.no_ui {
        println!("Scene Demos - Controls: drag to orbit, right-drag to pan, wheel to zoom, Escape to quit");
    }
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
