//! Core utilities for the mannequin renderer.
//!
//! This crate provides foundational types and utilities used across the workspace:
//! - Error types and result aliases
//! - Logging initialization
//! - Timer utilities
//! - Numeric helpers for projection and animation
//! - Configuration

mod config;
mod error;
mod logging;
mod math;
mod timer;

pub use config::{AppConfig, CameraConfig, DEFAULT_ANGULAR_SPEED, DEFAULT_SURFACE_ID};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use math::{calc_aspect, calc_rotation};
pub use timer::Timer;
