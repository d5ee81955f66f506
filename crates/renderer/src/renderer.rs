//! GPU scene renderer.
//!
//! [`SceneRenderer`] owns the Vulkan stack for one window and replays a
//! [`DrawList`] each frame: a fullscreen background pass followed by one
//! indexed draw per scene drawable, all inside a single dynamic-rendering
//! pass with a depth attachment.

use std::collections::HashMap;
use std::ffi::c_char;
use std::sync::Arc;

use ash::vk;
use tracing::{debug, error, info};

use mannequin_rhi::buffer::{Buffer, BufferUsage};
use mannequin_rhi::command::{CommandBuffer, CommandPool, LayoutTransition};
use mannequin_rhi::descriptor::{
    DescriptorBindingBuilder, DescriptorPool, DescriptorSetLayout, buffer_info, image_info,
    update_descriptor_sets,
};
use mannequin_rhi::device::Device;
use mannequin_rhi::image::{Image, ImageDesc, Sampler};
use mannequin_rhi::instance::Instance;
use mannequin_rhi::physical_device::select_physical_device;
use mannequin_rhi::pipeline::{
    CullMode, FrontFace, GraphicsPipelineBuilder, Pipeline, PipelineLayout,
};
use mannequin_rhi::shader::{Shader, ShaderStage};
use mannequin_rhi::surface::Surface;
use mannequin_rhi::swapchain::Swapchain;
use mannequin_rhi::sync::{Fence, Semaphore};
use mannequin_rhi::vertex::Vertex;
use mannequin_rhi::{RhiError, RhiResult};
use mannequin_scene::{Geometry, Material, Texture, WrapMode};

use crate::depth_buffer::{DEFAULT_DEPTH_FORMAT, DepthBuffer};
use crate::draw_list::{DrawItem, DrawList};
use crate::shaders;
use crate::ubo::{ObjectUniforms, dynamic_stride};

/// Frames the CPU may record ahead of the GPU.
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Uniform slots each frame starts with before growing.
const INITIAL_UNIFORM_CAPACITY: usize = 16;

/// Background textures are uploaded as-is; `0xAARRGGBB` in little-endian
/// bytes is B, G, R, A.
const TEXTURE_FORMAT: vk::Format = vk::Format::B8G8R8A8_UNORM;

/// Per-frame recording and uniform resources.
struct FrameData {
    command_buffer: CommandBuffer,
    in_flight: Fence,
    image_available: Semaphore,
    /// One [`ObjectUniforms`] slot per draw item, `stride` bytes apart.
    uniforms: Buffer,
    capacity: usize,
    descriptor_set: vk::DescriptorSet,
}

/// Vertex and index buffers for one shared geometry.
struct MeshGpuData {
    // Keeps the geometry alive so its address stays a unique key.
    _geometry: Arc<Geometry>,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

/// The uploaded background, sampled through the renderer's background set.
struct BackgroundGpuData {
    source: Texture,
    _image: Image,
    _sampler: Sampler,
}

/// Graphics pipelines for the scene pass, built for one colour format.
struct Pipelines {
    normal: Pipeline,
    basic: Pipeline,
    background: Pipeline,
    mesh_layout: PipelineLayout,
    background_layout: PipelineLayout,
    color_format: vk::Format,
}

impl Pipelines {
    fn new(
        device: &Arc<Device>,
        object_set_layout: &DescriptorSetLayout,
        background_set_layout: &DescriptorSetLayout,
        color_format: vk::Format,
    ) -> RhiResult<Self> {
        let mesh_vs = Shader::from_spirv_bytes(
            device.clone(),
            shaders::MESH_SPV,
            ShaderStage::Vertex,
            shaders::MESH_VERTEX_ENTRY,
        )?;
        let normal_fs = Shader::from_spirv_bytes(
            device.clone(),
            shaders::MESH_SPV,
            ShaderStage::Fragment,
            shaders::NORMAL_FRAGMENT_ENTRY,
        )?;
        let basic_fs = Shader::from_spirv_bytes(
            device.clone(),
            shaders::MESH_SPV,
            ShaderStage::Fragment,
            shaders::BASIC_FRAGMENT_ENTRY,
        )?;
        let background_vs = Shader::from_spirv_bytes(
            device.clone(),
            shaders::BACKGROUND_SPV,
            ShaderStage::Vertex,
            shaders::BACKGROUND_VERTEX_ENTRY,
        )?;
        let background_fs = Shader::from_spirv_bytes(
            device.clone(),
            shaders::BACKGROUND_SPV,
            ShaderStage::Fragment,
            shaders::BACKGROUND_FRAGMENT_ENTRY,
        )?;

        let mesh_layout =
            PipelineLayout::new(device.clone(), &[object_set_layout.handle()], &[])?;
        let background_layout = PipelineLayout::new(
            device.clone(),
            &[background_set_layout.handle()],
            &[background_push_range()],
        )?;

        // Meshes wind counter-clockwise; the clip-space y flip keeps them so.
        let mesh_pipeline = |label: &'static str, fragment: &Shader| {
            GraphicsPipelineBuilder::new(label)
                .vertex_shader(&mesh_vs)
                .fragment_shader(fragment)
                .vertex_binding(Vertex::binding_description())
                .vertex_attributes(&Vertex::attribute_descriptions())
                .color_attachment_format(color_format)
                .depth_attachment_format(DEFAULT_DEPTH_FORMAT)
                .cull_mode(CullMode::Back)
                .front_face(FrontFace::CounterClockwise)
                .depth_test_enable(true)
                .depth_write_enable(true)
                .build(device.clone(), &mesh_layout)
        };
        let normal = mesh_pipeline("normal", &normal_fs)?;
        let basic = mesh_pipeline("basic", &basic_fs)?;

        let background = GraphicsPipelineBuilder::new("background")
            .vertex_shader(&background_vs)
            .fragment_shader(&background_fs)
            .color_attachment_format(color_format)
            .depth_attachment_format(DEFAULT_DEPTH_FORMAT)
            .cull_mode(CullMode::None)
            .depth_test_enable(false)
            .depth_write_enable(false)
            .build(device.clone(), &background_layout)?;

        Ok(Self {
            normal,
            basic,
            background,
            mesh_layout,
            background_layout,
            color_format,
        })
    }

    fn for_material(&self, material: &Material) -> &Pipeline {
        match material {
            Material::Normal => &self.normal,
            Material::Basic { .. } => &self.basic,
        }
    }
}

/// Draws scenes into a window surface through Vulkan.
///
/// Fields drop top to bottom: per-frame objects, GPU resources, swapchain,
/// device, surface, instance.
pub struct SceneRenderer {
    frames: Vec<FrameData>,
    render_finished: Vec<Semaphore>,
    command_pool: CommandPool,
    meshes: HashMap<usize, MeshGpuData>,
    background: Option<BackgroundGpuData>,
    background_set: vk::DescriptorSet,
    pipelines: Pipelines,
    // Owns every descriptor set above.
    _descriptor_pool: DescriptorPool,
    object_set_layout: DescriptorSetLayout,
    background_set_layout: DescriptorSetLayout,
    depth_buffer: DepthBuffer,
    swapchain: Swapchain,
    device: Arc<Device>,
    surface: Surface,
    instance: Instance,
    uniform_stride: u64,
    current_frame: usize,
    size: (u32, u32),
    needs_recreate: bool,
}

impl SceneRenderer {
    /// Builds instance, surface, device, swapchain and the scene pipelines.
    ///
    /// `create_surface` turns the fresh instance into a window surface; the
    /// renderer takes ownership of the returned handle.
    pub fn new<F>(
        enable_validation: bool,
        surface_extensions: &[*const c_char],
        create_surface: F,
        width: u32,
        height: u32,
    ) -> RhiResult<Self>
    where
        F: FnOnce(&ash::Entry, &ash::Instance) -> RhiResult<vk::SurfaceKHR>,
    {
        info!("Initializing Vulkan renderer ({}x{})", width, height);

        let instance = Instance::new(enable_validation, surface_extensions)?;
        let surface_handle = create_surface(instance.entry(), instance.handle())?;
        let surface = Surface::new(&instance, surface_handle);

        let physical_device =
            select_physical_device(instance.handle(), surface.handle(), surface.loader())?;
        let device = Device::new(&instance, &physical_device)?;
        let swapchain = Swapchain::new(&instance, device.clone(), &surface, width, height)?;
        let extent = swapchain.extent();
        let depth_buffer = DepthBuffer::new(device.clone(), extent.width, extent.height)?;

        let object_set_layout = DescriptorSetLayout::new(
            device.clone(),
            &[DescriptorBindingBuilder::uniform_buffer_dynamic(
                0,
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            )],
        )?;
        let background_set_layout = DescriptorSetLayout::new(
            device.clone(),
            &[
                DescriptorBindingBuilder::sampled_image(0, vk::ShaderStageFlags::FRAGMENT),
                DescriptorBindingBuilder::sampler(1, vk::ShaderStageFlags::FRAGMENT),
            ],
        )?;

        // One object set per frame plus the background set.
        let pool_sizes = [
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC)
                .descriptor_count(MAX_FRAMES_IN_FLIGHT as u32),
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::SAMPLED_IMAGE)
                .descriptor_count(1),
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::SAMPLER)
                .descriptor_count(1),
        ];
        let descriptor_pool = DescriptorPool::new(
            device.clone(),
            MAX_FRAMES_IN_FLIGHT as u32 + 1,
            &pool_sizes,
        )?;

        let pipelines = Pipelines::new(
            &device,
            &object_set_layout,
            &background_set_layout,
            swapchain.format(),
        )?;

        let graphics_family = device
            .queue_families()
            .graphics_family
            .ok_or(RhiError::NoSuitableGpu)?;
        let command_pool = CommandPool::new(device.clone(), graphics_family)?;

        let uniform_stride = dynamic_stride(
            ObjectUniforms::SIZE as u64,
            device.min_uniform_buffer_offset_alignment(),
        );
        let frames = create_frame_data(
            &device,
            &command_pool,
            &descriptor_pool,
            &object_set_layout,
            uniform_stride,
        )?;
        let render_finished = create_semaphores(&device, swapchain.image_count())?;
        let background_set = descriptor_pool
            .allocate(&[background_set_layout.handle()])?
            .into_iter()
            .next()
            .ok_or_else(|| RhiError::ImageError("No background descriptor set".to_string()))?;

        info!(
            "Renderer ready on '{}': {} swapchain images, {} frames in flight",
            physical_device.device_name(),
            swapchain.image_count(),
            MAX_FRAMES_IN_FLIGHT
        );

        Ok(Self {
            frames,
            render_finished,
            command_pool,
            meshes: HashMap::new(),
            background: None,
            background_set,
            pipelines,
            _descriptor_pool: descriptor_pool,
            object_set_layout,
            background_set_layout,
            depth_buffer,
            swapchain,
            device,
            surface,
            instance,
            uniform_stride,
            current_frame: 0,
            size: (width, height),
            needs_recreate: false,
        })
    }

    /// Notes a new drawing size. The swapchain is rebuilt before the next
    /// frame; a zero dimension is ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("Ignoring resize to zero dimensions");
            return;
        }
        if self.size != (width, height) {
            debug!(
                "Resize requested: {}x{} -> {}x{}",
                self.size.0, self.size.1, width, height
            );
            self.size = (width, height);
            self.needs_recreate = true;
        }
    }

    /// Draws one frame and queues it for presentation.
    ///
    /// An out-of-date swapchain drops the frame and is rebuilt before the
    /// next one.
    pub fn render(&mut self, list: &DrawList<'_>) -> RhiResult<()> {
        if self.needs_recreate {
            self.recreate_swapchain()?;
        }

        self.frames[self.current_frame].in_flight.wait(u64::MAX)?;

        self.ensure_meshes(&list.items)?;
        if let Some(texture) = list.background {
            self.ensure_background(texture)?;
        }

        let image_available = self.frames[self.current_frame].image_available.handle();
        let (image_index, suboptimal) = match self.swapchain.acquire_next_image(image_available)
        {
            Ok(result) => result,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                debug!("Swapchain out of date on acquire, dropping frame");
                self.needs_recreate = true;
                return Ok(());
            }
            Err(e) => return Err(RhiError::VulkanError(e)),
        };

        // Only reset once work is certain to be submitted.
        self.frames[self.current_frame].in_flight.reset()?;
        self.write_uniforms(&list.items)?;
        self.record(image_index, list)?;

        let frame = &self.frames[self.current_frame];
        let render_finished = self.render_finished[image_index as usize].handle();
        let wait_semaphores = [image_available];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let signal_semaphores = [render_finished];
        let command_buffers = [frame.command_buffer.handle()];
        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.device
                .submit_graphics(&[submit_info], frame.in_flight.handle())?;
        }

        let present_result =
            self.swapchain
                .present(self.device.present_queue(), image_index, render_finished);
        match present_result {
            Ok(present_suboptimal) => {
                if suboptimal || present_suboptimal {
                    debug!("Swapchain suboptimal, recreating before next frame");
                    self.needs_recreate = true;
                }
            }
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR | vk::Result::SUBOPTIMAL_KHR) => {
                debug!("Swapchain out of date on present");
                self.needs_recreate = true;
            }
            Err(e) => return Err(RhiError::VulkanError(e)),
        }

        self.current_frame = (self.current_frame + 1) % MAX_FRAMES_IN_FLIGHT;
        Ok(())
    }

    /// Rebuilds the swapchain and everything sized or formatted after it.
    fn recreate_swapchain(&mut self) -> RhiResult<()> {
        let (width, height) = self.size;
        self.swapchain
            .recreate(&self.instance, &self.surface, width, height)?;

        let extent = self.swapchain.extent();
        self.depth_buffer = DepthBuffer::new(self.device.clone(), extent.width, extent.height)?;

        if self.render_finished.len() != self.swapchain.image_count() {
            self.render_finished = create_semaphores(&self.device, self.swapchain.image_count())?;
        }
        if self.pipelines.color_format != self.swapchain.format() {
            info!("Swapchain format changed, rebuilding pipelines");
            self.pipelines = Pipelines::new(
                &self.device,
                &self.object_set_layout,
                &self.background_set_layout,
                self.swapchain.format(),
            )?;
        }

        self.needs_recreate = false;
        Ok(())
    }

    /// Uploads vertex and index buffers for geometries not seen before.
    fn ensure_meshes(&mut self, items: &[DrawItem]) -> RhiResult<()> {
        for item in items {
            let key = mesh_key(&item.geometry);
            if self.meshes.contains_key(&key) || item.geometry.indices().is_empty() {
                continue;
            }

            let vertices: Vec<Vertex> = item
                .geometry
                .vertices()
                .iter()
                .map(|v| Vertex::new(v.position, v.normal))
                .collect();
            let vertex_buffer = Buffer::new_with_data(
                self.device.clone(),
                BufferUsage::Vertex,
                bytemuck::cast_slice(&vertices),
            )?;
            let index_buffer = Buffer::new_with_data(
                self.device.clone(),
                BufferUsage::Index,
                bytemuck::cast_slice(item.geometry.indices()),
            )?;

            debug!(
                "Mesh uploaded: {:?}, {} vertices, {} indices",
                item.geometry.shape(),
                vertices.len(),
                item.geometry.indices().len()
            );

            self.meshes.insert(
                key,
                MeshGpuData {
                    _geometry: item.geometry.clone(),
                    vertex_buffer,
                    index_buffer,
                    index_count: item.geometry.indices().len() as u32,
                },
            );
        }
        Ok(())
    }

    /// Uploads `texture` unless it is already the current background.
    fn ensure_background(&mut self, texture: &Texture) -> RhiResult<()> {
        if self
            .background
            .as_ref()
            .is_some_and(|background| background.source == *texture)
        {
            return Ok(());
        }

        // The set and the old image may still be read by frames in flight.
        self.device.wait_idle()?;
        self.background = None;

        let image = Image::new(
            self.device.clone(),
            &ImageDesc {
                width: texture.width(),
                height: texture.height(),
                format: TEXTURE_FORMAT,
                usage: vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::TRANSFER_DST,
                aspect: vk::ImageAspectFlags::COLOR,
                name: "background",
            },
        )?;
        let staging = Buffer::new_with_data(
            self.device.clone(),
            BufferUsage::Staging,
            &texel_bytes(texture),
        )?;

        let region = vk::BufferImageCopy::default()
            .image_subresource(
                vk::ImageSubresourceLayers::default()
                    .aspect_mask(vk::ImageAspectFlags::COLOR)
                    .layer_count(1),
            )
            .image_extent(vk::Extent3D {
                width: texture.width(),
                height: texture.height(),
                depth: 1,
            });
        self.command_pool.submit_once(|cmd| {
            cmd.transition_image(image.handle(), LayoutTransition::TEXTURE_TO_TRANSFER_DST);
            cmd.copy_buffer_to_image(
                staging.handle(),
                image.handle(),
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &[region],
            );
            cmd.transition_image(image.handle(), LayoutTransition::TEXTURE_TO_SHADER_READ);
        })?;

        let sampler = Sampler::new(
            self.device.clone(),
            address_mode(texture.wrap_s),
            address_mode(texture.wrap_t),
            vk::Filter::NEAREST,
        )?;

        let image_infos = [image_info(
            vk::Sampler::null(),
            image.view(),
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        )];
        let sampler_infos = [image_info(
            sampler.handle(),
            vk::ImageView::null(),
            vk::ImageLayout::UNDEFINED,
        )];
        let writes = [
            vk::WriteDescriptorSet::default()
                .dst_set(self.background_set)
                .dst_binding(0)
                .descriptor_type(vk::DescriptorType::SAMPLED_IMAGE)
                .image_info(&image_infos),
            vk::WriteDescriptorSet::default()
                .dst_set(self.background_set)
                .dst_binding(1)
                .descriptor_type(vk::DescriptorType::SAMPLER)
                .image_info(&sampler_infos),
        ];
        update_descriptor_sets(&self.device, &writes);

        info!(
            "Background uploaded: {}x{}, wrap {:?}/{:?}",
            texture.width(),
            texture.height(),
            texture.wrap_s,
            texture.wrap_t
        );

        self.background = Some(BackgroundGpuData {
            source: texture.clone(),
            _image: image,
            _sampler: sampler,
        });
        Ok(())
    }

    /// Writes this frame's uniform slots, growing the buffer if needed.
    fn write_uniforms(&mut self, items: &[DrawItem]) -> RhiResult<()> {
        let stride = self.uniform_stride;
        let frame = &mut self.frames[self.current_frame];

        if items.len() > frame.capacity {
            let capacity = items.len().next_power_of_two();
            debug!(
                "Growing frame {} uniforms: {} -> {} slots",
                self.current_frame, frame.capacity, capacity
            );
            frame.uniforms = create_uniform_buffer(
                &self.device,
                frame.descriptor_set,
                stride,
                capacity,
            )?;
            frame.capacity = capacity;
        }

        let bytes = pack_uniforms(items, stride);
        frame.uniforms.write_data(0, &bytes)
    }

    fn record(&self, image_index: u32, list: &DrawList<'_>) -> RhiResult<()> {
        let frame = &self.frames[self.current_frame];
        let cmd = &frame.command_buffer;
        let extent = self.swapchain.extent();
        let color_image = self.swapchain.image(image_index as usize);

        cmd.begin()?;
        cmd.transition_image(color_image, LayoutTransition::COLOR_TO_ATTACHMENT);
        cmd.transition_image(self.depth_buffer.image(), LayoutTransition::DEPTH_TO_ATTACHMENT);

        let color_attachment = vk::RenderingAttachmentInfo::default()
            .image_view(self.swapchain.image_view(image_index as usize))
            .image_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::STORE)
            .clear_value(vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: list.clear_color,
                },
            });
        let depth_attachment = vk::RenderingAttachmentInfo::default()
            .image_view(self.depth_buffer.image_view())
            .image_layout(vk::ImageLayout::DEPTH_ATTACHMENT_OPTIMAL)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::DONT_CARE)
            .clear_value(vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: 1.0,
                    stencil: 0,
                },
            });
        let rendering_info = vk::RenderingInfo::default()
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            })
            .layer_count(1)
            .color_attachments(std::slice::from_ref(&color_attachment))
            .depth_attachment(&depth_attachment);

        cmd.begin_rendering(&rendering_info);
        cmd.set_full_viewport(extent);

        if let (Some(texture), Some(_)) = (list.background, self.background.as_ref()) {
            cmd.bind_graphics_pipeline(self.pipelines.background.handle());
            cmd.bind_descriptor_sets(
                self.pipelines.background_layout.handle(),
                &[self.background_set],
                &[],
            );
            cmd.push_constants(
                self.pipelines.background_layout.handle(),
                vk::ShaderStageFlags::VERTEX,
                bytemuck::bytes_of(&texture.repeat),
            );
            cmd.draw(3);
        }

        for (i, item) in list.items.iter().enumerate() {
            let Some(mesh) = self.meshes.get(&mesh_key(&item.geometry)) else {
                continue;
            };
            cmd.bind_graphics_pipeline(self.pipelines.for_material(&item.material).handle());
            cmd.bind_descriptor_sets(
                self.pipelines.mesh_layout.handle(),
                &[frame.descriptor_set],
                &[(i as u64 * self.uniform_stride) as u32],
            );
            cmd.bind_vertex_buffer(mesh.vertex_buffer.handle());
            cmd.bind_index_buffer(mesh.index_buffer.handle());
            cmd.draw_indexed(mesh.index_count);
        }

        cmd.end_rendering();
        cmd.transition_image(color_image, LayoutTransition::COLOR_TO_PRESENT);
        cmd.end()
    }
}

impl Drop for SceneRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.device.wait_idle() {
            error!("Failed to wait for device idle during renderer drop: {:?}", e);
        }
    }
}

fn create_frame_data(
    device: &Arc<Device>,
    command_pool: &CommandPool,
    descriptor_pool: &DescriptorPool,
    object_set_layout: &DescriptorSetLayout,
    stride: u64,
) -> RhiResult<Vec<FrameData>> {
    let layouts = [object_set_layout.handle(); MAX_FRAMES_IN_FLIGHT];
    let descriptor_sets = descriptor_pool.allocate(&layouts)?;

    descriptor_sets
        .into_iter()
        .map(|descriptor_set| -> RhiResult<FrameData> {
            Ok(FrameData {
                command_buffer: command_pool.allocate()?,
                in_flight: Fence::new(device.clone(), true)?,
                image_available: Semaphore::new(device.clone())?,
                uniforms: create_uniform_buffer(
                    device,
                    descriptor_set,
                    stride,
                    INITIAL_UNIFORM_CAPACITY,
                )?,
                capacity: INITIAL_UNIFORM_CAPACITY,
                descriptor_set,
            })
        })
        .collect()
}

/// Creates a buffer of `capacity` uniform slots and points `descriptor_set`
/// at it.
fn create_uniform_buffer(
    device: &Arc<Device>,
    descriptor_set: vk::DescriptorSet,
    stride: u64,
    capacity: usize,
) -> RhiResult<Buffer> {
    let buffer = Buffer::new(device.clone(), BufferUsage::Uniform, stride * capacity as u64)?;

    let buffer_infos = [buffer_info(buffer.handle(), 0, ObjectUniforms::SIZE as u64)];
    let writes = [vk::WriteDescriptorSet::default()
        .dst_set(descriptor_set)
        .dst_binding(0)
        .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC)
        .buffer_info(&buffer_infos)];
    update_descriptor_sets(device, &writes);

    Ok(buffer)
}

fn create_semaphores(device: &Arc<Device>, count: usize) -> RhiResult<Vec<Semaphore>> {
    (0..count).map(|_| Semaphore::new(device.clone())).collect()
}

fn background_push_range() -> vk::PushConstantRange {
    vk::PushConstantRange::default()
        .stage_flags(vk::ShaderStageFlags::VERTEX)
        .offset(0)
        .size(std::mem::size_of::<glam::Vec2>() as u32)
}

fn mesh_key(geometry: &Arc<Geometry>) -> usize {
    Arc::as_ptr(geometry) as usize
}

/// Uniform blocks for `items`, each at a multiple of `stride`.
fn pack_uniforms(items: &[DrawItem], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; items.len() * stride];
    for (item, slot) in items.iter().zip(bytes.chunks_exact_mut(stride)) {
        slot[..ObjectUniforms::SIZE].copy_from_slice(bytemuck::bytes_of(&item.uniforms));
    }
    bytes
}

/// Texels as bytes for [`TEXTURE_FORMAT`].
fn texel_bytes(texture: &Texture) -> Vec<u8> {
    texture
        .texels()
        .iter()
        .flat_map(|texel| texel.to_le_bytes())
        .collect()
}

fn address_mode(wrap: WrapMode) -> vk::SamplerAddressMode {
    match wrap {
        WrapMode::Repeat => vk::SamplerAddressMode::REPEAT,
        WrapMode::ClampToEdge => vk::SamplerAddressMode::CLAMP_TO_EDGE,
        WrapMode::MirroredRepeat => vk::SamplerAddressMode::MIRRORED_REPEAT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn item(geometry: &Arc<Geometry>, material: Material) -> DrawItem {
        DrawItem {
            geometry: geometry.clone(),
            material,
            uniforms: ObjectUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, &material),
        }
    }

    #[test]
    fn test_texel_bytes_are_bgra() {
        let texture = Texture::new(2, 1, vec![0xff102030, 0x80405060]).unwrap();
        assert_eq!(
            texel_bytes(&texture),
            vec![0x30, 0x20, 0x10, 0xff, 0x60, 0x50, 0x40, 0x80]
        );
    }

    #[test]
    fn test_address_modes() {
        assert_eq!(address_mode(WrapMode::Repeat), vk::SamplerAddressMode::REPEAT);
        assert_eq!(
            address_mode(WrapMode::ClampToEdge),
            vk::SamplerAddressMode::CLAMP_TO_EDGE
        );
        assert_eq!(
            address_mode(WrapMode::MirroredRepeat),
            vk::SamplerAddressMode::MIRRORED_REPEAT
        );
    }

    #[test]
    fn test_pack_uniforms_places_blocks_at_stride() {
        let cube = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0).unwrap());
        let items = [
            item(&cube, Material::Normal),
            item(&cube, Material::basic(0x00ff00)),
        ];
        let bytes = pack_uniforms(&items, 256);

        assert_eq!(bytes.len(), 512);
        assert_eq!(
            &bytes[256..256 + ObjectUniforms::SIZE],
            bytemuck::bytes_of(&items[1].uniforms)
        );
        assert!(bytes[ObjectUniforms::SIZE..256].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_shared_geometry_shares_mesh_key() {
        let sphere = Arc::new(Geometry::sphere(1.0, 8, 6).unwrap());
        let other = Arc::new(Geometry::sphere(1.0, 8, 6).unwrap());
        assert_eq!(mesh_key(&sphere), mesh_key(&sphere.clone()));
        assert_ne!(mesh_key(&sphere), mesh_key(&other));
    }

    #[test]
    fn test_background_push_range_holds_repeat() {
        let range = background_push_range();
        assert_eq!(range.size, 8);
        assert_eq!(range.stage_flags, vk::ShaderStageFlags::VERTEX);
    }
}
