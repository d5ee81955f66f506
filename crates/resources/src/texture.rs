//! Background texture loading.

use std::path::Path;

use tracing::{info, warn};

use mannequin_scene::{Texture, WrapMode};

use crate::error::{ResourceError, ResourceResult};

/// Load an image file as a tiling texture.
///
/// The image is converted to RGBA8 and both wrap modes are set to
/// [`WrapMode::Repeat`].
///
/// # Errors
/// Returns [`ResourceError::FileNotFound`] when `path` does not exist and
/// [`ResourceError::Image`] when it cannot be decoded.
pub fn load_texture(path: &Path) -> ResourceResult<Texture> {
    if !path.exists() {
        return Err(ResourceError::FileNotFound(path.to_path_buf()));
    }

    let rgba = image::open(path)
        .map_err(|source| ResourceError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();

    let (width, height) = rgba.dimensions();
    let texels = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            u32::from_be_bytes([a, r, g, b])
        })
        .collect();

    let texture = Texture::new(width, height, texels)
        .map_err(|e| ResourceError::InvalidTexture {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .with_wrap(WrapMode::Repeat, WrapMode::Repeat);

    info!("Loaded texture {:?} ({}x{})", path, width, height);
    Ok(texture)
}

/// Load the scene backdrop, tolerating a missing or broken file.
///
/// A failure is logged and the scene simply renders without a background.
pub fn load_background(path: Option<&Path>) -> Option<Texture> {
    let path = path?;
    match load_texture(path) {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!("Background unavailable, continuing without it: {}", e);
            None
        }
    }
}
