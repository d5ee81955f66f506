//! Vulkan layer (Render Hardware Interface).
//!
//! A thin layer over `ash` for drawing the scene on the GPU:
//! - Instance, physical device and logical device creation
//! - Surface ownership and swapchain management
//! - Buffers, images, samplers and descriptor sets
//! - Shader modules and dynamic-rendering graphics pipelines
//! - Command recording and synchronization

mod error;

pub mod buffer;
pub mod command;
pub mod descriptor;
pub mod device;
pub mod image;
pub mod instance;
pub mod physical_device;
pub mod pipeline;
pub mod shader;
pub mod surface;
pub mod swapchain;
pub mod sync;
pub mod vertex;

pub use error::{RhiError, RhiResult};

// Re-export ash types that users might need
pub use ash::vk;
