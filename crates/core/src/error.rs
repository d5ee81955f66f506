//! Error types shared across the mannequin crates.

use thiserror::Error;

/// Main error type for the mannequin renderer.
#[derive(Error, Debug)]
pub enum Error {
    /// The host has no drawable surface registered under the requested id
    #[error("Target ID for canvas does not exist: {0}")]
    SurfaceNotFound(String),

    /// Viewport dimensions that cannot produce a projection
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    /// Shape parameters rejected by the geometry factory
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Window creation or management errors
    #[error("Window error: {0}")]
    Window(String),

    /// Vulkan-related errors surfaced through the renderer
    #[error("Vulkan error: {0}")]
    Vulkan(String),

    /// Resource loading errors
    #[error("Resource error: {0}")]
    Resource(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the renderer's Error type.
pub type Result<T> = std::result::Result<T, Error>;
