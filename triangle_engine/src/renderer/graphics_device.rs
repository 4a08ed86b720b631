/// GraphicsDevice trait - factory for every other GPU object

use raw_window_handle::RawWindowHandle;
use crate::error::Result;
use crate::renderer::{
    CommandQueue, Fence, Swapchain, SwapchainDesc, DescriptorHeap, CpuDescriptorHandle,
    CommandAllocator, CommandList, Pipeline, PipelineDesc, GpuResource,
};

/// Main graphics device trait
///
/// Implemented by backend-specific devices (e.g., `D3d12GraphicsDevice`).
/// Objects it creates must not outlive it; `GraphicsContext` owns both and
/// drops the device last.
pub trait GraphicsDevice: Send {
    /// Create the direct (graphics) command queue
    fn create_command_queue(&mut self) -> Result<Box<dyn CommandQueue>>;

    /// Create a swap chain presenting into a native window
    ///
    /// # Arguments
    ///
    /// * `queue` - Queue that will execute the frames presented on this swap chain
    /// * `window` - Native window handle
    /// * `desc` - Swap-chain descriptor
    fn create_swapchain(
        &mut self,
        queue: &dyn CommandQueue,
        window: RawWindowHandle,
        desc: &SwapchainDesc,
    ) -> Result<Box<dyn Swapchain>>;

    /// Create a CPU-only descriptor heap for `count` render-target views
    fn create_rtv_heap(&mut self, count: u32) -> Result<Box<dyn DescriptorHeap>>;

    /// Write a render-target view of `resource` into the descriptor slot `handle`
    fn create_render_target_view(&mut self, resource: &dyn GpuResource, handle: CpuDescriptorHandle) -> Result<()>;

    fn create_command_allocator(&mut self) -> Result<Box<dyn CommandAllocator>>;

    /// Create a command list backed by `allocator`
    ///
    /// The returned list is `Recording`; callers close it before first use.
    fn create_command_list(&mut self, allocator: &dyn CommandAllocator) -> Result<Box<dyn CommandList>>;

    fn create_fence(&mut self, initial_value: u64) -> Result<Box<dyn Fence>>;

    /// Create root signature, pipeline state and vertex buffer
    ///
    /// Shader files are read through `ShaderSource::load`, so a missing or empty
    /// file fails with `InvalidResource`.
    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<Box<dyn Pipeline>>;

    /// Human-readable name of the selected adapter
    fn adapter_name(&self) -> String;
}
