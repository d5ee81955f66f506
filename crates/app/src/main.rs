//! Mannequin - Main Entry Point
//!
//! Opens a window and animates a humanoid figure built from spheres and
//! boxes, turning about its vertical axis in front of a tiled background.

mod host;

use anyhow::Result;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use mannequin_core::{AppConfig, Timer};
use mannequin_platform::Window;
use mannequin_renderer::{Canvas, RenderLoop, SceneRenderer, TracingSink};
use mannequin_resources::load_background;
use mannequin_rhi::RhiError;
use mannequin_scene::{Camera, MeshFactory, build_scene};

use host::{WindowHost, WindowScheduler, WindowSurface, WindowTitleSink};

type FrameLoop = RenderLoop<Canvas<WindowSurface>, (TracingSink, WindowTitleSink)>;

struct App {
    config: AppConfig,
    timer: Timer,
    render_loop: Option<FrameLoop>,
    scheduler: Option<WindowScheduler>,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            timer: Timer::new(),
            render_loop: None,
            scheduler: None,
            startup_error: None,
        }
    }

    /// Build the window, renderer, scene and loop, then request the first frame.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let config = &self.config;
        let window = Window::new(event_loop, config.width, config.height, &config.title)?;
        let extensions = window.required_extensions()?;
        let (width, height) = window.display_size();

        let renderer = SceneRenderer::new(
            cfg!(debug_assertions),
            &extensions,
            |entry, instance| {
                window
                    .create_surface(entry, instance)
                    .map_err(|e| RhiError::SurfaceError(e.to_string()))
            },
            width,
            height,
        )?;

        let handle = window.inner_arc();
        let mut host = WindowHost::default();
        host.register(config.surface_id.clone(), WindowSurface::new(window, renderer));

        let canvas = Canvas::attach(&mut host, &config.surface_id, config.clear_color)?;

        let background = load_background(config.background.as_deref());
        let scene = build_scene(&mut MeshFactory::new(), background)?;
        let camera = Camera::from_config(&config.camera);
        let output = (TracingSink, WindowTitleSink::new(handle.clone(), &config.title));

        let mut render_loop =
            RenderLoop::new(scene, camera, canvas, output).with_angular_speed(config.angular_speed);
        let mut scheduler = WindowScheduler::new(handle);
        render_loop.start(&mut scheduler);

        self.timer.reset();
        self.render_loop = Some(render_loop);
        self.scheduler = Some(scheduler);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.render_loop.is_some() || self.startup_error.is_some() {
            return;
        }

        match self.init(event_loop) {
            Ok(()) => info!("Initialization complete, entering main loop"),
            Err(e) => {
                error!("Startup failed: {e:#}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                // The loop notices the new size on its next frame.
                tracing::debug!("Window resized to {}x{}", size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let (Some(render_loop), Some(scheduler)) =
                    (self.render_loop.as_mut(), self.scheduler.as_mut())
                {
                    render_loop.on_frame(self.timer.elapsed_ms(), scheduler);
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    mannequin_core::init_logging();
    info!("Starting Mannequin");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(AppConfig::default());
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
