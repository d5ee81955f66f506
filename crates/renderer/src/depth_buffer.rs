//! Depth attachment for the scene pass.
//!
//! - [`DepthBuffer`] owns a GPU-only depth image and its view
//! - Uses [`DEFAULT_DEPTH_FORMAT`] (32-bit float)
//! - Rebuilt whenever the swapchain changes size

use std::sync::Arc;

use ash::vk;
use tracing::info;

use mannequin_rhi::RhiResult;
use mannequin_rhi::device::Device;
use mannequin_rhi::image::{Image, ImageDesc};

/// Depth format used by every pipeline in the scene pass.
pub const DEFAULT_DEPTH_FORMAT: vk::Format = vk::Format::D32_SFLOAT;

/// Depth image sized to the swapchain.
pub struct DepthBuffer {
    image: Image,
}

impl DepthBuffer {
    /// Creates a depth buffer of `width` x `height` in [`DEFAULT_DEPTH_FORMAT`].
    ///
    /// # Errors
    ///
    /// Fails for a zero dimension or when image creation or allocation fails.
    pub fn new(device: Arc<Device>, width: u32, height: u32) -> RhiResult<Self> {
        let image = Image::new(device, &depth_image_desc(width, height))?;
        info!("Depth buffer created: {}x{}", width, height);
        Ok(Self { image })
    }

    #[inline]
    pub fn image(&self) -> vk::Image {
        self.image.handle()
    }

    #[inline]
    pub fn image_view(&self) -> vk::ImageView {
        self.image.view()
    }

    #[inline]
    pub fn format(&self) -> vk::Format {
        self.image.format()
    }

    #[inline]
    pub fn extent(&self) -> vk::Extent2D {
        self.image.extent()
    }
}

fn depth_image_desc(width: u32, height: u32) -> ImageDesc {
    ImageDesc {
        width,
        height,
        format: DEFAULT_DEPTH_FORMAT,
        usage: vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
        aspect: vk::ImageAspectFlags::DEPTH,
        name: "depth_buffer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_image_desc() {
        let desc = depth_image_desc(800, 400);
        assert_eq!((desc.width, desc.height), (800, 400));
        assert_eq!(desc.format, vk::Format::D32_SFLOAT);
        assert_eq!(desc.aspect, vk::ImageAspectFlags::DEPTH);
        assert!(
            desc.usage
                .contains(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT)
        );
    }

    #[test]
    fn test_depth_buffer_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<DepthBuffer>();
    }
}
