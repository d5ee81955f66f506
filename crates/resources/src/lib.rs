//! Resource loading and management.
//!
//! This crate handles loading of external assets:
//! - Image files decoded into tiling background textures

mod error;
pub mod texture;

pub use error::{ResourceError, ResourceResult};
pub use texture::{load_background, load_texture};
