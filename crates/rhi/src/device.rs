//! Vulkan logical device, queues and the memory allocator.

use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex, MutexGuard};

use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use tracing::{debug, info};

use crate::error::{RhiError, RhiResult};
use crate::instance::Instance;
use crate::physical_device::{PhysicalDeviceInfo, QueueFamilyIndices};

/// Required device extensions.
const DEVICE_EXTENSIONS: &[&std::ffi::CStr] = &[
    ash::khr::swapchain::NAME,
    // Core in 1.3; listed for drivers that still report it separately.
    ash::khr::dynamic_rendering::NAME,
];

/// Vulkan logical device wrapper.
///
/// Shared through `Arc` by everything that owns Vulkan objects, so the device
/// outlives them. The allocator sits behind a `Mutex` and is released before
/// the device it allocates from.
pub struct Device {
    device: ash::Device,
    physical_device: vk::PhysicalDevice,
    allocator: ManuallyDrop<Mutex<Allocator>>,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
    queue_families: QueueFamilyIndices,
    min_uniform_buffer_offset_alignment: vk::DeviceSize,
}

impl Device {
    /// Creates the logical device with dynamic rendering enabled, plus the
    /// gpu-allocator instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected device lacks a required queue, or if
    /// device or allocator creation fails.
    pub fn new(
        instance: &Instance,
        physical_device_info: &PhysicalDeviceInfo,
    ) -> RhiResult<Arc<Self>> {
        let queue_families = physical_device_info.queue_families;
        let (Some(graphics_family), Some(present_family)) =
            (queue_families.graphics_family, queue_families.present_family)
        else {
            return Err(RhiError::NoSuitableGpu);
        };

        let unique_families = queue_families.unique_families();
        let queue_priorities = [1.0f32];
        let queue_create_infos: Vec<vk::DeviceQueueCreateInfo> = unique_families
            .iter()
            .map(|&family| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(family)
                    .queue_priorities(&queue_priorities)
            })
            .collect();

        debug!("Creating queue(s) for families: {:?}", unique_families);

        let extension_names: Vec<*const std::ffi::c_char> =
            DEVICE_EXTENSIONS.iter().map(|ext| ext.as_ptr()).collect();
        let features = vk::PhysicalDeviceFeatures::default();
        let mut features_1_3 =
            vk::PhysicalDeviceVulkan13Features::default().dynamic_rendering(true);

        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&extension_names)
            .enabled_features(&features)
            .push_next(&mut features_1_3);

        let device = unsafe {
            instance
                .handle()
                .create_device(physical_device_info.device, &create_info, None)?
        };
        info!("Logical device created (dynamic rendering enabled)");

        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };
        let present_queue = unsafe { device.get_device_queue(present_family, 0) };

        let allocator = Allocator::new(&AllocatorCreateDesc {
            instance: instance.handle().clone(),
            device: device.clone(),
            physical_device: physical_device_info.device,
            debug_settings: Default::default(),
            buffer_device_address: false,
            allocation_sizes: Default::default(),
        });
        let allocator = match allocator {
            Ok(allocator) => allocator,
            Err(e) => {
                unsafe { device.destroy_device(None) };
                return Err(e.into());
            }
        };
        info!("GPU memory allocator initialized");

        let limits = physical_device_info.properties.limits;

        Ok(Arc::new(Self {
            device,
            physical_device: physical_device_info.device,
            allocator: ManuallyDrop::new(Mutex::new(allocator)),
            graphics_queue,
            present_queue,
            queue_families,
            min_uniform_buffer_offset_alignment: limits.min_uniform_buffer_offset_alignment,
        }))
    }

    #[inline]
    pub fn handle(&self) -> &ash::Device {
        &self.device
    }

    #[inline]
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    #[inline]
    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    #[inline]
    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    #[inline]
    pub fn queue_families(&self) -> &QueueFamilyIndices {
        &self.queue_families
    }

    /// Required alignment of dynamic uniform buffer offsets.
    #[inline]
    pub fn min_uniform_buffer_offset_alignment(&self) -> vk::DeviceSize {
        self.min_uniform_buffer_offset_alignment
    }

    /// Locks the GPU memory allocator.
    pub fn allocator(&self) -> RhiResult<MutexGuard<'_, Allocator>> {
        self.allocator.lock().map_err(|_| RhiError::AllocatorPoisoned)
    }

    /// Blocks until every queue is idle.
    pub fn wait_idle(&self) -> RhiResult<()> {
        unsafe { self.device.device_wait_idle()? };
        Ok(())
    }

    /// Submits work to the graphics queue.
    ///
    /// # Safety
    ///
    /// The command buffers must be fully recorded and every handle referenced
    /// by `submit_infos` must stay alive until `fence` signals.
    pub unsafe fn submit_graphics(
        &self,
        submit_infos: &[vk::SubmitInfo],
        fence: vk::Fence,
    ) -> RhiResult<()> {
        unsafe {
            self.device
                .queue_submit(self.graphics_queue, submit_infos, fence)?;
        }
        Ok(())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if let Err(e) = unsafe { self.device.device_wait_idle() } {
            tracing::error!("Failed to wait for device idle during drop: {:?}", e);
        }
        let device = &self.device;
        // SAFETY: the allocator is not touched again after this point.
        unsafe {
            release_allocator_then(&mut self.allocator, || device.destroy_device(None));
        }
        info!("Logical device destroyed");
    }
}

/// Drops `allocator`, then runs `destroy_device`.
///
/// gpu-allocator frees its memory blocks through the device on drop, so the
/// device must still exist at that point.
///
/// # Safety
///
/// `allocator` must not be used after this call.
unsafe fn release_allocator_then<A>(
    allocator: &mut ManuallyDrop<A>,
    destroy_device: impl FnOnce(),
) {
    unsafe { ManuallyDrop::drop(allocator) };
    destroy_device();
}

// SAFETY: ash::Device and the raw handles are plain data; the allocator is
// only reached through its Mutex.
unsafe impl Send for Device {}
unsafe impl Sync for Device {}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_device_extensions_defined() {
        assert_eq!(DEVICE_EXTENSIONS.len(), 2);
        assert!(DEVICE_EXTENSIONS.contains(&ash::khr::swapchain::NAME));
        assert!(DEVICE_EXTENSIONS.contains(&ash::khr::dynamic_rendering::NAME));
    }

    #[test]
    fn test_device_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Device>();
    }

    struct DropLog(Rc<RefCell<Vec<&'static str>>>);

    impl Drop for DropLog {
        fn drop(&mut self) {
            self.0.borrow_mut().push("allocator");
        }
    }

    #[test]
    fn test_allocator_released_before_device_destroyed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut allocator = ManuallyDrop::new(DropLog(log.clone()));

        unsafe {
            release_allocator_then(&mut allocator, || log.borrow_mut().push("device"));
        }

        assert_eq!(*log.borrow(), vec!["allocator", "device"]);
    }
}
