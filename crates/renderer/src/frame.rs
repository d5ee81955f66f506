//! The per-frame render loop.

use std::f64::consts::TAU;

use tracing::{debug, error, info, warn};

use mannequin_core::{DEFAULT_ANGULAR_SPEED, calc_rotation};
use mannequin_scene::{Camera, Scene};

use crate::canvas::{RenderTarget, sync_projection};
use crate::output::OutputSink;
use crate::draw_list::DrawStats;
use crate::schedule::{FrameScheduler, ManualScheduler};

/// Where the loop is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Not started yet
    Idle,
    /// A frame has been requested
    Scheduled,
    /// A frame is executing
    Running,
}

/// What one loop invocation did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// The backing buffer was resized this frame
    pub resized: bool,
    /// Root y-rotation applied, `None` when the frame was skipped
    pub rotation: Option<f64>,
    /// Draw counters, `None` when nothing was drawn
    pub stats: Option<DrawStats>,
}

/// The diagnostic line published every frame.
pub fn format_rotation(y: f64) -> String {
    format!("Y Rotation: {y}")
}

/// Drives the scene: sync viewport, animate, publish text, draw, reschedule.
pub struct RenderLoop<T, O> {
    scene: Scene,
    camera: Camera,
    target: T,
    output: O,
    angular_speed: f64,
    state: LoopState,
    frames: u64,
}

impl<T: RenderTarget, O: OutputSink> RenderLoop<T, O> {
    pub fn new(scene: Scene, camera: Camera, target: T, output: O) -> Self {
        Self {
            scene,
            camera,
            target,
            output,
            angular_speed: DEFAULT_ANGULAR_SPEED,
            state: LoopState::Idle,
            frames: 0,
        }
    }

    /// Rotation speed of the root in radians per millisecond.
    pub fn with_angular_speed(mut self, speed: f64) -> Self {
        self.angular_speed = speed;
        self
    }

    /// Request the first frame. Does nothing once started.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.state != LoopState::Idle {
            warn!(state = ?self.state, "Render loop already started");
            return;
        }
        scheduler.request_frame();
        self.state = LoopState::Scheduled;
        info!(speed = self.angular_speed, "Render loop started");
    }

    /// Run one frame at `timestamp_ms` and request the next one.
    pub fn on_frame(
        &mut self,
        timestamp_ms: f64,
        scheduler: &mut impl FrameScheduler,
    ) -> FrameReport {
        self.state = LoopState::Running;
        let report = if timestamp_ms.is_finite() {
            self.render(timestamp_ms)
        } else {
            warn!(timestamp_ms, "Non-finite frame timestamp, skipping frame");
            FrameReport::default()
        };

        scheduler.request_frame();
        self.state = LoopState::Scheduled;
        self.frames += 1;
        report
    }

    fn render(&mut self, timestamp_ms: f64) -> FrameReport {
        let mut report = FrameReport::default();

        if self.target.ensure_size_synced() {
            report.resized = true;
            let (width, height) = self.target.buffer_size();
            if let Err(e) = sync_projection(&mut self.camera, width, height) {
                warn!("Keeping previous projection: {e}");
            }
        }

        let y = calc_rotation(timestamp_ms, self.angular_speed);
        self.output.write(&format_rotation(y));
        // Wrapped in f64 first; f32 loses sub-radian precision on large angles.
        self.scene.root_mut().transform.rotation.y = y.rem_euclid(TAU) as f32;
        report.rotation = Some(y);

        match self.target.draw(&self.scene, &self.camera) {
            Ok(stats) => report.stats = Some(stats),
            Err(e) => error!("Draw failed: {e}"),
        }

        if self.frames == 0 {
            debug!(size = ?self.target.buffer_size(), "First frame rendered");
        }
        report
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames run so far, skipped ones included.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

/// Drive `render_loop` through `timestamps`, one pending request per frame.
///
/// Starts the loop if it is idle. Stops early if no frame is pending.
pub fn run_frames<T, O>(
    render_loop: &mut RenderLoop<T, O>,
    timestamps: impl IntoIterator<Item = f64>,
) -> (ManualScheduler, Vec<FrameReport>)
where
    T: RenderTarget,
    O: OutputSink,
{
    let mut scheduler = ManualScheduler::new();
    if render_loop.state() == LoopState::Idle {
        render_loop.start(&mut scheduler);
    }

    let mut reports = Vec::new();
    for timestamp in timestamps {
        if !scheduler.take() {
            break;
        }
        reports.push(render_loop.on_frame(timestamp, &mut scheduler));
    }
    (scheduler, reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mannequin_core::{Error, Result};
    use mannequin_scene::SceneNode;

    use crate::output::MemorySink;

    /// A target with a settable displayed size that counts draws and resizes.
    struct FakeTarget {
        display: (u32, u32),
        buffer: (u32, u32),
        resizes: usize,
        draws: usize,
        fail_draw: bool,
    }

    impl FakeTarget {
        fn new(display: (u32, u32)) -> Self {
            Self {
                display,
                buffer: (0, 0),
                resizes: 0,
                draws: 0,
                fail_draw: false,
            }
        }
    }

    impl RenderTarget for FakeTarget {
        fn buffer_size(&self) -> (u32, u32) {
            self.buffer
        }

        fn display_size(&self) -> (u32, u32) {
            self.display
        }

        fn resize_buffer(&mut self, width: u32, height: u32) {
            self.buffer = (width, height);
            self.resizes += 1;
        }

        fn draw(&mut self, _scene: &Scene, _camera: &Camera) -> Result<DrawStats> {
            self.draws += 1;
            if self.fail_draw {
                return Err(Error::Internal("lost device".to_string()));
            }
            Ok(DrawStats::default())
        }
    }

    fn render_loop(display: (u32, u32)) -> RenderLoop<FakeTarget, MemorySink> {
        let camera = Camera::perspective(40f32.to_radians(), 2.0, 0.1, 1000.0);
        RenderLoop::new(
            Scene::new(SceneNode::new()),
            camera,
            FakeTarget::new(display),
            MemorySink::new(),
        )
    }

    #[test]
    fn test_format_rotation() {
        assert_eq!(format_rotation(2.0), "Y Rotation: 2");
        assert_eq!(format_rotation(0.0), "Y Rotation: 0");
        assert_eq!(format_rotation(0.5), "Y Rotation: 0.5");
    }

    #[test]
    fn test_state_transitions() {
        let mut rl = render_loop((800, 400));
        let mut scheduler = ManualScheduler::new();
        assert_eq!(rl.state(), LoopState::Idle);

        rl.start(&mut scheduler);
        assert_eq!(rl.state(), LoopState::Scheduled);
        assert_eq!(scheduler.pending(), 1);

        rl.start(&mut scheduler);
        assert_eq!(scheduler.pending(), 1);

        assert!(scheduler.take());
        rl.on_frame(16.0, &mut scheduler);
        assert_eq!(rl.state(), LoopState::Scheduled);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(rl.frames(), 1);
    }

    #[test]
    fn test_frame_steps() {
        let mut rl = render_loop((800, 400));
        let (_, reports) = run_frames(&mut rl, [2000.0]);

        assert_eq!(reports.len(), 1);
        assert!(reports[0].resized);
        assert_eq!(reports[0].rotation, Some(2.0));
        assert_eq!(rl.camera().aspect, 2.0);
        assert_eq!(rl.scene().root().transform.rotation.y, 2.0);
        assert_eq!(rl.output().last(), Some("Y Rotation: 2"));
        assert_eq!(rl.target().draws, 1);
    }

    #[test]
    fn test_resize_only_when_size_changes() {
        let mut rl = render_loop((300, 150));
        let (mut scheduler, _) = run_frames(&mut rl, [0.0, 16.0, 32.0]);
        assert_eq!(rl.target().resizes, 1);

        rl.target_mut().display = (400, 400);
        assert!(scheduler.take());
        let report = rl.on_frame(48.0, &mut scheduler);
        assert!(report.resized);
        assert_eq!(rl.target().resizes, 2);
        assert_eq!(rl.camera().aspect, 1.0);
    }

    #[test]
    fn test_zero_height_keeps_projection() {
        let mut rl = render_loop((640, 0));
        let before = rl.camera().projection_matrix();
        let (_, reports) = run_frames(&mut rl, [100.0]);

        assert!(reports[0].resized);
        assert_eq!(rl.camera().aspect, 2.0);
        assert_eq!(rl.camera().projection_matrix(), before);
        assert_eq!(rl.target().draws, 1);
    }

    #[test]
    fn test_non_finite_timestamp_skips_but_reschedules() {
        let mut rl = render_loop((800, 400));
        let (scheduler, reports) = run_frames(&mut rl, [f64::NAN, f64::INFINITY, 500.0]);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0], FrameReport::default());
        assert_eq!(reports[1], FrameReport::default());
        assert_eq!(reports[2].rotation, Some(0.5));
        assert_eq!(rl.output().lines().len(), 1);
        assert_eq!(rl.target().draws, 1);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_draw_error_keeps_loop_running() {
        let mut rl = render_loop((800, 400));
        rl.target_mut().fail_draw = true;
        let (scheduler, reports) = run_frames(&mut rl, [1.0, 2.0]);

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.stats.is_none()));
        assert_eq!(rl.state(), LoopState::Scheduled);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_long_running_rotation_stays_in_one_turn() {
        // A day of uptime at the default speed.
        let timestamp = 86_400_000.0;
        let mut rl = render_loop((800, 400));
        let (_, reports) = run_frames(&mut rl, [timestamp]);

        let y = timestamp * DEFAULT_ANGULAR_SPEED;
        let applied = rl.scene().root().transform.rotation.y;
        assert!((0.0..std::f32::consts::TAU).contains(&applied));
        assert_eq!(applied, y.rem_euclid(TAU) as f32);
        assert_eq!(reports[0].rotation, Some(y));
        assert_eq!(rl.output().last(), Some("Y Rotation: 86400"));
    }

    #[test]
    fn test_rotation_tracks_timestamp() {
        let mut rl = render_loop((800, 400)).with_angular_speed(0.002);
        run_frames(&mut rl, [250.0, 1000.0]);
        assert_eq!(rl.scene().root().transform.rotation.y, 2.0);
        assert_eq!(
            rl.output().lines(),
            &["Y Rotation: 0.5".to_string(), "Y Rotation: 2".to_string()]
        );
    }
}
