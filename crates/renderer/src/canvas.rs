//! Host surfaces, the canvas that draws into them, and viewport sync.

use tracing::{debug, info};

use mannequin_core::{Error, Result, calc_aspect};
use mannequin_scene::{Camera, Color, Scene};

use crate::draw_list::{DrawList, DrawStats};

/// Something that draws frames and knows its displayed size.
pub trait DisplaySurface {
    /// Size the surface is currently displayed at, in pixels.
    fn display_size(&self) -> (u32, u32);

    /// Resize the drawing surface. Never called with a zero dimension.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame and show it.
    fn render(&mut self, list: &DrawList<'_>) -> Result<()>;
}

/// Hands out display surfaces by id.
pub trait SurfaceHost {
    type Surface: DisplaySurface;

    /// Take the surface registered under `id`, if there is one.
    fn take_surface(&mut self, id: &str) -> Option<Self::Surface>;
}

/// A drawable target whose backing buffer follows its displayed size.
pub trait RenderTarget {
    /// Size of the backing buffer.
    fn buffer_size(&self) -> (u32, u32);

    /// Size the target is displayed at.
    fn display_size(&self) -> (u32, u32);

    /// Reallocate the backing buffer.
    fn resize_buffer(&mut self, width: u32, height: u32);

    /// Render one frame and present it.
    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<DrawStats>;

    /// Resize the backing buffer to the displayed size if they differ.
    ///
    /// Returns `true` when a resize happened. When the sizes already match
    /// nothing is touched.
    fn ensure_size_synced(&mut self) -> bool {
        let (width, height) = self.display_size();
        if self.buffer_size() == (width, height) {
            return false;
        }
        self.resize_buffer(width, height);
        true
    }
}

/// Recompute the camera projection for a `width` x `height` viewport.
///
/// A viewport with a zero dimension is rejected and the camera is left as it
/// was.
pub fn sync_projection(camera: &mut Camera, width: u32, height: u32) -> Result<()> {
    if width == 0 {
        return Err(Error::InvalidViewport { width, height });
    }
    let aspect = calc_aspect(width, height)?;
    camera.set_aspect(aspect);
    debug!(width, height, aspect, "Projection updated");
    Ok(())
}

/// A canvas bound to one display surface.
pub struct Canvas<S> {
    surface: S,
    size: (u32, u32),
    clear_color: Color,
}

impl<S: DisplaySurface> Canvas<S> {
    /// Wrap a surface that clears to the `0xRRGGBB` colour when the scene has
    /// no background. The buffer starts empty and picks up the displayed size
    /// on the first sync.
    pub fn new(surface: S, clear_rgb: u32) -> Self {
        Self {
            surface,
            size: (0, 0),
            clear_color: Color::from_hex(clear_rgb),
        }
    }

    /// Look up the surface registered under `id` and bind a canvas to it.
    pub fn attach<H>(host: &mut H, id: &str, clear_rgb: u32) -> Result<Self>
    where
        H: SurfaceHost<Surface = S>,
    {
        let surface = host
            .take_surface(id)
            .ok_or_else(|| Error::SurfaceNotFound(id.to_string()))?;
        info!(id, "Canvas attached");
        Ok(Self::new(surface, clear_rgb))
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }
}

impl<S: DisplaySurface> RenderTarget for Canvas<S> {
    fn buffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn display_size(&self) -> (u32, u32) {
        self.surface.display_size()
    }

    fn resize_buffer(&mut self, width: u32, height: u32) {
        debug!(width, height, "Canvas resized");
        self.size = (width, height);
        if width > 0 && height > 0 {
            self.surface.resize(width, height);
        }
    }

    /// Draw `scene` unless the buffer has a zero dimension.
    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<DrawStats> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Ok(DrawStats::default());
        }
        let list = DrawList::build(scene, camera, self.clear_color);
        self.surface.render(&list)?;
        Ok(list.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeSurface {
        size: (u32, u32),
        resized_to: Vec<(u32, u32)>,
        rendered: usize,
    }

    impl DisplaySurface for FakeSurface {
        fn display_size(&self) -> (u32, u32) {
            self.size
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.resized_to.push((width, height));
        }

        fn render(&mut self, _list: &DrawList<'_>) -> Result<()> {
            self.rendered += 1;
            Ok(())
        }
    }

    struct FakeHost(HashMap<String, FakeSurface>);

    impl SurfaceHost for FakeHost {
        type Surface = FakeSurface;

        fn take_surface(&mut self, id: &str) -> Option<FakeSurface> {
            self.0.remove(id)
        }
    }

    fn host_with(id: &str, size: (u32, u32)) -> FakeHost {
        let mut surfaces = HashMap::new();
        surfaces.insert(
            id.to_string(),
            FakeSurface {
                size,
                resized_to: Vec::new(),
                rendered: 0,
            },
        );
        FakeHost(surfaces)
    }

    #[test]
    fn test_attach_missing_surface() {
        let mut host = host_with("canvas", (10, 10));
        let result = Canvas::attach(&mut host, "nope", 0x000000);
        match result {
            Err(Error::SurfaceNotFound(id)) => assert_eq!(id, "nope"),
            _ => panic!("expected SurfaceNotFound"),
        }
    }

    #[test]
    fn test_ensure_size_synced() {
        let mut host = host_with("canvas", (800, 400));
        let mut canvas = Canvas::attach(&mut host, "canvas", 0x000000).unwrap();
        assert_eq!(canvas.buffer_size(), (0, 0));

        assert!(canvas.ensure_size_synced());
        assert_eq!(canvas.buffer_size(), (800, 400));
        assert!(!canvas.ensure_size_synced());

        canvas.surface_mut().size = (640, 480);
        assert!(canvas.ensure_size_synced());
        assert_eq!(canvas.buffer_size(), (640, 480));
        assert_eq!(canvas.surface().resized_to, vec![(800, 400), (640, 480)]);
    }

    #[test]
    fn test_sync_projection() {
        let mut camera = Camera::perspective(40f32.to_radians(), 2.0, 0.1, 1000.0);
        sync_projection(&mut camera, 300, 150).unwrap();
        assert_eq!(camera.aspect, 2.0);

        sync_projection(&mut camera, 400, 400).unwrap();
        assert_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn test_sync_projection_zero_viewport_keeps_camera() {
        let mut camera = Camera::perspective(40f32.to_radians(), 2.0, 0.1, 1000.0);
        let before = camera.projection_matrix();

        assert!(sync_projection(&mut camera, 800, 0).is_err());
        assert!(sync_projection(&mut camera, 0, 400).is_err());
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_empty_canvas_does_not_render() {
        let mut host = host_with("canvas", (0, 0));
        let mut canvas = Canvas::attach(&mut host, "canvas", 0x000000).unwrap();
        let stats = canvas.draw(&Scene::default(), &Camera::default()).unwrap();
        assert_eq!(stats, DrawStats::default());
        assert_eq!(canvas.surface().rendered, 0);
    }

    #[test]
    fn test_zero_height_is_not_forwarded_to_surface() {
        let mut host = host_with("canvas", (640, 0));
        let mut canvas = Canvas::attach(&mut host, "canvas", 0x000000).unwrap();
        assert!(canvas.ensure_size_synced());
        assert_eq!(canvas.buffer_size(), (640, 0));
        assert!(canvas.surface().resized_to.is_empty());

        let stats = canvas.draw(&Scene::default(), &Camera::default()).unwrap();
        assert_eq!(stats, DrawStats::default());
        assert_eq!(canvas.surface().rendered, 0);
    }

    #[test]
    fn test_draw_renders_scene_with_clear_color() {
        let mut host = host_with("canvas", (300, 150));
        let mut canvas = Canvas::attach(&mut host, "canvas", 0x0000ff).unwrap();
        canvas.ensure_size_synced();

        let stats = canvas.draw(&Scene::default(), &Camera::default()).unwrap();
        assert_eq!(stats.nodes, 1);
        assert_eq!(canvas.surface().rendered, 1);
        assert_eq!(canvas.clear_color(), Color::new(0.0, 0.0, 1.0));
    }
}
