//! Rendering and the per-frame loop.
//!
//! This crate turns the scene into GPU draws and drives it over time:
//! - [`DrawList`], the scene graph flattened into per-drawable uniforms
//! - [`SceneRenderer`], which replays a draw list through Vulkan
//! - [`Canvas`], which binds a host surface and keeps its size in sync
//! - Output sinks for the diagnostic line
//! - Frame scheduling and the [`RenderLoop`] driver

pub mod canvas;
pub mod depth_buffer;
pub mod draw_list;
pub mod frame;
pub mod output;
pub mod renderer;
pub mod schedule;
pub mod shaders;
pub mod ubo;

pub use canvas::{Canvas, DisplaySurface, RenderTarget, SurfaceHost, sync_projection};
pub use draw_list::{DrawItem, DrawList, DrawStats};
pub use frame::{FrameReport, LoopState, RenderLoop, format_rotation, run_frames};
pub use output::{MemorySink, OutputSink, TracingSink};
pub use renderer::{MAX_FRAMES_IN_FLIGHT, SceneRenderer};
pub use schedule::{FrameScheduler, ManualScheduler};
pub use ubo::ObjectUniforms;
