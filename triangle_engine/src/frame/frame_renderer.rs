/// FrameRenderer - records and submits one frame
///
/// A frame is a fixed sequence around the current back-buffer:
///
/// ```text
/// wait(fence) -> reset allocator + list -> barrier PRESENT->RENDER_TARGET
///   -> bind RTV -> clear -> draw -> barrier RENDER_TARGET->PRESENT
///   -> close -> execute -> present -> signal(fence)
/// ```
///
/// Any failing step aborts the frame and returns its error. Nothing is retried,
/// and a frame that fails before submission issues no present.

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{
    ResourceState, TransitionBarrier, Viewport, Rect2D, CommandList, CommandListState,
    DescriptorHeap, Pipeline, Swapchain, CommandAllocator, CommandQueue, GpuResource,
};
use crate::frame::GraphicsContext;
use crate::{engine_bail, engine_error, engine_trace, engine_warn};

/// Result of one submitted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// 1-based count of frames submitted by this renderer
    pub frame_number: u64,
    /// Back-buffer the frame was rendered into
    pub back_buffer_index: u32,
    /// Fence value signaled after the frame's submission
    pub fence_value: u64,
}

#[derive(Debug, Default)]
pub struct FrameRenderer {
    frames_submitted: u64,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames that made it through `render_frame` successfully
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Record, submit and present exactly one frame
    pub fn render_frame(&mut self, ctx: &mut GraphicsContext) -> Result<FrameInfo> {
        match self.record_and_submit(ctx) {
            Ok((back_buffer_index, fence_value)) => {
                self.frames_submitted += 1;
                Ok(FrameInfo {
                    frame_number: self.frames_submitted,
                    back_buffer_index,
                    fence_value,
                })
            }
            Err(e) => {
                engine_error!("triangle::frame", "Frame {} aborted: {}", self.frames_submitted + 1, e);
                Err(e)
            }
        }
    }

    fn record_and_submit(&mut self, ctx: &mut GraphicsContext) -> Result<(u32, u64)> {
        // 1. Current back-buffer
        let index = ctx.swapchain.current_back_buffer_index();
        if index >= ctx.frame_count {
            engine_bail!("triangle::frame", InvalidResource,
                "Back-buffer index {} out of range (frame count {})", index, ctx.frame_count);
        }
        let slot = index as usize;
        let Some(back_buffer) = ctx.back_buffers.get(slot).cloned() else {
            engine_bail!("triangle::frame", InvalidResource,
                "Back-buffer {} has no render target ({} available)", index, ctx.back_buffers.len());
        };

        // 2. Reclaim this back-buffer's allocator once the GPU is done with it
        ctx.sync.wait_for_frame(ctx.fence.as_ref(), index)?;
        ctx.allocators[slot].reset()?;
        ctx.command_list.reset(ctx.allocators[slot].as_ref(), ctx.pipeline.as_deref())?;

        // 3-8. Record and close
        if let Err(e) = Self::record(ctx, index, back_buffer) {
            Self::abandon(ctx, index);
            return Err(e);
        }

        // 9. Submit
        ctx.queue.execute(&[ctx.command_list.as_ref() as &dyn CommandList])?;

        // 10. Present (advances the current back-buffer index)
        let presented = ctx.swapchain.present(ctx.sync_interval);

        // 11. Fence for this back-buffer's allocator. The list was submitted, so
        // the signal is issued even when present failed.
        let fence_value = ctx.sync.signal(ctx.queue.as_mut(), ctx.fence.as_ref(), index)?;
        presented?;
        engine_trace!("triangle::frame", "Back-buffer {} presented, fence {}", index, fence_value);

        Ok((index, fence_value))
    }

    /// Steps 3-8 into the freshly reset command list
    fn record(ctx: &mut GraphicsContext, index: u32, back_buffer: Arc<dyn GpuResource>) -> Result<()> {
        let to_render_target = TransitionBarrier::new(
            back_buffer,
            ResourceState::Present,
            ResourceState::RenderTarget,
        );

        // 3. PRESENT -> RENDER_TARGET
        ctx.tracker.transition(&to_render_target)?;
        ctx.command_list.resource_barrier(std::slice::from_ref(&to_render_target))?;

        let rtv = ctx.rtv_heap.handle(index)?;
        let list = ctx.command_list.as_mut();

        // 4. Bind
        list.set_render_target(rtv)?;
        if let Some(pipeline) = ctx.pipeline.as_deref() {
            let (width, height) = (ctx.swapchain.width(), ctx.swapchain.height());
            list.set_graphics_root_signature(pipeline)?;
            list.set_viewport(Viewport::full(width, height))?;
            list.set_scissor(Rect2D::full(width, height))?;
        }

        // 5. Clear
        list.clear_render_target(rtv, ctx.clear_color)?;

        // 6. Draw
        if let Some(pipeline) = ctx.pipeline.as_deref() {
            list.set_primitive_topology(pipeline.topology())?;
            list.bind_vertex_buffer(&pipeline.vertex_buffer_view())?;
            list.draw(pipeline.vertex_count(), 1, 0, 0)?;
        }

        // 7. RENDER_TARGET -> PRESENT
        let to_present = to_render_target.reversed();
        ctx.tracker.transition(&to_present)?;
        list.resource_barrier(std::slice::from_ref(&to_present))?;

        // 8. Close
        list.close()
    }

    /// Undo the effects of a frame that never reached the queue
    ///
    /// The GPU never saw its barriers, so the back-buffer is still in PRESENT.
    /// The list is closed so the next frame can reset it.
    fn abandon(ctx: &mut GraphicsContext, index: u32) {
        if let Some(buffer) = ctx.back_buffers.get(index as usize) {
            let id = buffer.id();
            if ctx.tracker.state(id) == Some(ResourceState::RenderTarget) {
                ctx.tracker.register(id, ResourceState::Present);
            }
        }

        if ctx.command_list.state() == CommandListState::Recording {
            if let Err(e) = ctx.command_list.close() {
                engine_warn!("triangle::frame", "Could not close abandoned command list: {}", e);
            }
        }
    }
}

#[cfg(test)]
#[path = "frame_renderer_tests.rs"]
mod tests;
