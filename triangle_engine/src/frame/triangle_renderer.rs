/// TriangleRenderer - initialize / render / resize / cleanup lifecycle

use raw_window_handle::HasWindowHandle;
use crate::error::Result;
use crate::renderer::{GraphicsDevice, RendererConfig};
use crate::frame::{GraphicsContext, FrameRenderer, FrameInfo};
use crate::{engine_bail, engine_err, engine_info, engine_warn};

/// Application-facing renderer
///
/// Holds the `GraphicsContext` between `initialize()` and `cleanup()`.
///
/// # Example
///
/// ```no_run
/// use triangle_engine::triangle::render::{GraphicsDevice, RendererConfig};
/// use triangle_engine::triangle::frame::TriangleRenderer;
/// # fn run(device: Box<dyn GraphicsDevice>, window: &impl raw_window_handle::HasWindowHandle) -> triangle_engine::triangle::Result<()> {
/// let mut renderer = TriangleRenderer::new(RendererConfig::default());
/// renderer.initialize(device, window)?;
/// renderer.render_frame()?;
/// renderer.cleanup()?;
/// # Ok(())
/// # }
/// ```
pub struct TriangleRenderer {
    config: RendererConfig,
    context: Option<GraphicsContext>,
    frame_renderer: FrameRenderer,
}

impl TriangleRenderer {
    /// Create an uninitialized renderer
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            context: None,
            frame_renderer: FrameRenderer::new(),
        }
    }

    /// Create every GPU object for `window`
    ///
    /// Fails with `InitializationFailed` when already initialized.
    pub fn initialize<W>(&mut self, device: Box<dyn GraphicsDevice>, window: &W) -> Result<()>
    where
        W: HasWindowHandle + ?Sized,
    {
        if self.context.is_some() {
            engine_bail!("triangle::renderer", InitializationFailed, "Renderer is already initialized");
        }

        let handle = window
            .window_handle()
            .map_err(|e| engine_err!("triangle::renderer", InitializationFailed, "No window handle: {}", e))?;

        let context = GraphicsContext::new(device, handle.as_raw(), &self.config)?;
        engine_info!("triangle::renderer", "Renderer initialized on '{}'", context.adapter_name());
        self.context = Some(context);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.context.is_some()
    }

    /// Render one frame
    ///
    /// Fails with `NotInitialized` before `initialize()` or after `cleanup()`.
    pub fn render_frame(&mut self) -> Result<FrameInfo> {
        let Some(context) = self.context.as_mut() else {
            engine_bail!("triangle::renderer", NotInitialized,
                "render_frame() called before initialize()");
        };
        self.frame_renderer.render_frame(context)
    }

    /// Resize the swap chain. Zero-sized requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let Some(context) = self.context.as_mut() else {
            engine_bail!("triangle::renderer", NotInitialized, "resize() called before initialize()");
        };
        context.resize(width, height)
    }

    /// Wait for in-flight GPU work, then release every GPU object
    ///
    /// Idempotent. The context is released even when the wait fails.
    pub fn cleanup(&mut self) -> Result<()> {
        let Some(mut context) = self.context.take() else {
            return Ok(());
        };

        let waited = context.wait_for_gpu();
        drop(context);
        engine_info!("triangle::renderer", "Renderer cleaned up after {} frames",
            self.frame_renderer.frames_submitted());
        waited
    }

    /// Number of back-buffers in flight
    pub fn frame_count(&self) -> u32 {
        self.config.frame_count
    }

    /// Frames submitted successfully so far
    pub fn frames_rendered(&self) -> u64 {
        self.frame_renderer.frames_submitted()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Context access for callers that need backend details
    pub fn context(&self) -> Option<&GraphicsContext> {
        self.context.as_ref()
    }
}

impl Drop for TriangleRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            engine_warn!("triangle::renderer", "Cleanup on drop failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "triangle_renderer_tests.rs"]
mod tests;
