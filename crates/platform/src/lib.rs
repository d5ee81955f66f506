//! Platform layer for the mannequin renderer.
//!
//! This crate provides:
//! - Window management via winit
//! - Vulkan surface creation for the window

mod window;

pub use window::Window;

// Re-export winit types that users might need
pub use winit::event::WindowEvent;
pub use winit::event_loop::EventLoop;
