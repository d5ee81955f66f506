//! Binds the winit window to the renderer's host traits.

use std::collections::HashMap;
use std::sync::Arc;

use winit::window::Window as WinitWindow;

use mannequin_core::{Error, Result};
use mannequin_platform::Window;
use mannequin_renderer::{
    DisplaySurface, DrawList, FrameScheduler, OutputSink, SceneRenderer, SurfaceHost,
};

/// A window and the renderer drawing into it.
pub struct WindowSurface {
    // Dropped before the window it draws to.
    renderer: SceneRenderer,
    window: Window,
}

impl WindowSurface {
    pub fn new(window: Window, renderer: SceneRenderer) -> Self {
        Self { renderer, window }
    }
}

impl DisplaySurface for WindowSurface {
    fn display_size(&self) -> (u32, u32) {
        self.window.display_size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    fn render(&mut self, list: &DrawList<'_>) -> Result<()> {
        self.renderer
            .render(list)
            .map_err(|e| Error::Vulkan(e.to_string()))
    }
}

/// Window surfaces registered by id.
#[derive(Default)]
pub struct WindowHost {
    surfaces: HashMap<String, WindowSurface>,
}

impl WindowHost {
    pub fn register(&mut self, id: impl Into<String>, surface: WindowSurface) {
        self.surfaces.insert(id.into(), surface);
    }
}

impl SurfaceHost for WindowHost {
    type Surface = WindowSurface;

    fn take_surface(&mut self, id: &str) -> Option<WindowSurface> {
        self.surfaces.remove(id)
    }
}

/// Schedules frames as winit redraw requests.
pub struct WindowScheduler {
    window: Arc<WinitWindow>,
}

impl WindowScheduler {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { window }
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// Shows the diagnostic line in the window title.
pub struct WindowTitleSink {
    window: Arc<WinitWindow>,
    base_title: String,
}

impl WindowTitleSink {
    pub fn new(window: Arc<WinitWindow>, base_title: &str) -> Self {
        Self {
            window,
            base_title: base_title.to_string(),
        }
    }
}

impl OutputSink for WindowTitleSink {
    fn write(&mut self, text: &str) {
        self.window.set_title(&format!("{} | {}", self.base_title, text));
    }
}
