/// GraphicsContext - exclusive owner of every long-lived GPU object

use std::sync::Arc;
use raw_window_handle::RawWindowHandle;
use crate::error::Result;
use crate::renderer::{
    GraphicsDevice, CommandQueue, Swapchain, SwapchainDesc, DescriptorHeap, CommandAllocator,
    CommandList, Fence, Pipeline, PipelineDesc, GpuResource, ResourceState,
    ResourceStateTracker, RendererConfig, Format, Vertex,
};
use crate::frame::FrameSync;
use crate::{engine_info, engine_debug, engine_warn};

/// Every GPU object the frame sequence needs, created together and destroyed together
///
/// Fields drop in declaration order: dependents first, device last.
pub struct GraphicsContext {
    pub(crate) pipeline: Option<Box<dyn Pipeline>>,
    pub(crate) command_list: Box<dyn CommandList>,
    pub(crate) allocators: Vec<Box<dyn CommandAllocator>>,
    pub(crate) back_buffers: Vec<Arc<dyn GpuResource>>,
    pub(crate) rtv_heap: Box<dyn DescriptorHeap>,
    pub(crate) swapchain: Box<dyn Swapchain>,
    pub(crate) fence: Box<dyn Fence>,
    pub(crate) queue: Box<dyn CommandQueue>,
    pub(crate) device: Box<dyn GraphicsDevice>,

    pub(crate) tracker: ResourceStateTracker,
    pub(crate) sync: FrameSync,
    pub(crate) clear_color: [f32; 4],
    pub(crate) sync_interval: u32,
    pub(crate) frame_count: u32,
}

impl GraphicsContext {
    pub const RENDER_TARGET_FORMAT: Format = Format::R8G8B8A8_UNORM;

    /// Create every GPU object for `config`
    ///
    /// Order: queue, swap chain, RTV heap, render-target views, one allocator per
    /// back-buffer, command list (closed), fence, optional pipeline, state tracker.
    pub fn new(
        mut device: Box<dyn GraphicsDevice>,
        window: RawWindowHandle,
        config: &RendererConfig,
    ) -> Result<Self> {
        config.validate()?;
        engine_info!("triangle::context", "Creating graphics context for '{}' on '{}' ({}x{}, {} buffers)",
            config.app_name, device.adapter_name(), config.width, config.height, config.frame_count);

        let queue = device.create_command_queue()?;

        let swapchain = device.create_swapchain(queue.as_ref(), window, &SwapchainDesc {
            width: config.width,
            height: config.height,
            buffer_count: config.frame_count,
            format: Self::RENDER_TARGET_FORMAT,
        })?;

        let rtv_heap = device.create_rtv_heap(config.frame_count)?;
        let back_buffers = create_render_targets(device.as_mut(), swapchain.as_ref(), rtv_heap.as_ref())?;

        let allocators = (0..config.frame_count)
            .map(|_| device.create_command_allocator())
            .collect::<Result<Vec<_>>>()?;

        let mut command_list = device.create_command_list(allocators[0].as_ref())?;
        command_list.close()?;

        let fence = device.create_fence(0)?;

        let pipeline = match &config.pipeline {
            Some(pipeline_config) => {
                let pipeline = device.create_pipeline(&PipelineDesc {
                    vertex_shader: &pipeline_config.vertex_shader,
                    pixel_shader: &pipeline_config.pixel_shader,
                    input_layout: &Vertex::LAYOUT,
                    render_target_format: Self::RENDER_TARGET_FORMAT,
                    vertices: &pipeline_config.vertices,
                    topology: pipeline_config.topology,
                })?;
                engine_debug!("triangle::context", "Pipeline created ({} vertices)", pipeline.vertex_count());
                Some(pipeline)
            }
            None => None,
        };

        let mut tracker = ResourceStateTracker::new();
        for buffer in &back_buffers {
            tracker.register(buffer.id(), ResourceState::Present);
        }

        Ok(Self {
            pipeline,
            command_list,
            allocators,
            back_buffers,
            rtv_heap,
            swapchain,
            fence,
            queue,
            device,
            tracker,
            sync: FrameSync::new(config.frame_count, 0),
            clear_color: config.clear_color_rgba(),
            sync_interval: config.sync_interval,
            frame_count: config.frame_count,
        })
    }

    /// Block until every submitted frame has completed on the GPU
    pub fn wait_for_gpu(&mut self) -> Result<()> {
        self.sync.wait_idle(self.queue.as_mut(), self.fence.as_ref())
    }

    /// Resize the swap chain and recreate the render-target views
    ///
    /// Waits for the GPU first. Zero-sized requests (minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            engine_debug!("triangle::context", "Ignoring resize to {}x{}", width, height);
            return Ok(());
        }
        if width == self.swapchain.width() && height == self.swapchain.height() {
            return Ok(());
        }

        self.wait_for_gpu()?;

        // The swap chain refuses to resize while back-buffer references are alive
        for buffer in self.back_buffers.drain(..) {
            self.tracker.unregister(buffer.id());
        }

        // A failed resize keeps the old buffers, which still need their views
        let resized = self.swapchain.resize(width, height);
        let recreated = self.recreate_render_targets();
        if let Err(e) = resized {
            engine_warn!("triangle::context", "Swap chain resize to {}x{} failed, keeping {}x{}",
                width, height, self.swapchain.width(), self.swapchain.height());
            return Err(e);
        }
        recreated?;

        engine_info!("triangle::context", "Swap chain resized to {}x{}", width, height);
        Ok(())
    }

    /// Re-fetch the swap chain's back-buffers, write their views and track them in PRESENT
    ///
    /// On failure `back_buffers` stays empty and frames fail with `InvalidResource`.
    fn recreate_render_targets(&mut self) -> Result<()> {
        self.back_buffers = create_render_targets(
            self.device.as_mut(),
            self.swapchain.as_ref(),
            self.rtv_heap.as_ref(),
        )?;
        for buffer in &self.back_buffers {
            self.tracker.register(buffer.id(), ResourceState::Present);
        }
        Ok(())
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn width(&self) -> u32 {
        self.swapchain.width()
    }

    pub fn height(&self) -> u32 {
        self.swapchain.height()
    }

    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn adapter_name(&self) -> String {
        self.device.adapter_name()
    }

    /// Tracked state of back-buffer `index`
    pub fn back_buffer_state(&self, index: u32) -> Option<ResourceState> {
        let buffer = self.back_buffers.get(index as usize)?;
        self.tracker.state(buffer.id())
    }

    /// Current back-buffer index reported by the swap chain
    pub fn current_back_buffer_index(&self) -> u32 {
        self.swapchain.current_back_buffer_index()
    }

    pub fn state_tracker(&self) -> &ResourceStateTracker {
        &self.tracker
    }
}

/// Fetch every back-buffer and write its render-target view at `heap start + i * stride`
fn create_render_targets(
    device: &mut dyn GraphicsDevice,
    swapchain: &dyn Swapchain,
    rtv_heap: &dyn DescriptorHeap,
) -> Result<Vec<Arc<dyn GpuResource>>> {
    (0..swapchain.buffer_count())
        .map(|i| {
            let buffer = swapchain.back_buffer(i)?;
            device.create_render_target_view(buffer.as_ref(), rtv_heap.handle(i)?)?;
            Ok(buffer)
        })
        .collect()
}

#[cfg(test)]
#[path = "graphics_context_tests.rs"]
mod tests;
