/// Swapchain trait - ring of presentable back-buffers

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{GpuResource, Format};

/// Swap-chain creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainDesc {
    pub width: u32,
    pub height: u32,
    /// Number of back-buffers in the ring
    pub buffer_count: u32,
    pub format: Format,
}

/// Presentable ring of back-buffers (flip-discard model)
///
/// `present()` advances the current back-buffer index by one, modulo
/// `buffer_count()`.
pub trait Swapchain: Send {
    /// Index of the back-buffer to render into next
    fn current_back_buffer_index(&self) -> u32;

    fn buffer_count(&self) -> u32;

    /// Back-buffer resource at `index`
    ///
    /// Fails with `InvalidResource` when `index >= buffer_count()`.
    fn back_buffer(&self, index: u32) -> Result<Arc<dyn GpuResource>>;

    /// Queue the current back-buffer for display
    ///
    /// # Arguments
    ///
    /// * `sync_interval` - 0 = immediate, 1..=4 = wait for that many vertical blanks
    fn present(&mut self, sync_interval: u32) -> Result<()>;

    /// Resize every back-buffer. All references obtained from `back_buffer()`
    /// must be dropped beforehand.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn format(&self) -> Format;
}
