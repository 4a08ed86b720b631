/// CommandList - Direct3D 12 implementation of the CommandAllocator and CommandList traits

use std::any::Any;
use triangle_engine::triangle::Result;
use triangle_engine::triangle::render::{
    CommandAllocator as RendererCommandAllocator,
    CommandList as RendererCommandList,
    Pipeline as RendererPipeline,
    CommandListState, CpuDescriptorHandle, TransitionBarrier, VertexBufferView,
    Viewport, Rect2D, PrimitiveTopology, ensure_recording,
};
use triangle_engine::engine_bail;
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D12::*;

use crate::d3d12_error::{downcast, HResultExt, LOG_SOURCE};
use crate::d3d12_descriptor_heap::to_d3d12_handle;
use crate::d3d12_format::to_d3d_topology;
use crate::d3d12_pipeline::Pipeline;
use crate::d3d12_resource::{transition_barrier, Resource};

/// Direct command allocator
pub struct CommandAllocator {
    allocator: ID3D12CommandAllocator,
}

unsafe impl Send for CommandAllocator {}

impl CommandAllocator {
    pub(crate) fn new(allocator: ID3D12CommandAllocator) -> Self {
        Self { allocator }
    }

    pub fn raw(&self) -> &ID3D12CommandAllocator {
        &self.allocator
    }
}

impl RendererCommandAllocator for CommandAllocator {
    fn reset(&mut self) -> Result<()> {
        unsafe { self.allocator.Reset() }.or_engine("Failed to reset command allocator")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Direct graphics command list
///
/// D3D12 only reports recording errors at `Close()`, so the state is tracked
/// here and every recording call checks it first.
pub struct CommandList {
    list: ID3D12GraphicsCommandList,
    state: CommandListState,
}

unsafe impl Send for CommandList {}

impl CommandList {
    /// Wrap a freshly created list (D3D12 creates lists in the recording state)
    pub(crate) fn new(list: ID3D12GraphicsCommandList) -> Self {
        Self { list, state: CommandListState::Recording }
    }

    pub fn raw(&self) -> &ID3D12GraphicsCommandList {
        &self.list
    }
}

impl RendererCommandList for CommandList {
    fn state(&self) -> CommandListState {
        self.state
    }

    fn reset(&mut self, allocator: &dyn RendererCommandAllocator, pipeline: Option<&dyn RendererPipeline>) -> Result<()> {
        if self.state != CommandListState::Closed {
            engine_bail!(LOG_SOURCE, InvalidCommandListState,
                "Command list must be closed before reset (state: {})", self.state);
        }

        let allocator = downcast::<CommandAllocator>(allocator.as_any(), "Command allocator")?;
        let pso = match pipeline {
            Some(pipeline) => Some(downcast::<Pipeline>(pipeline.as_any(), "Pipeline")?.pso()),
            None => None,
        };

        unsafe { self.list.Reset(allocator.raw(), pso) }.or_engine("Failed to reset command list")?;
        self.state = CommandListState::Recording;
        Ok(())
    }

    fn resource_barrier(&mut self, barriers: &[TransitionBarrier]) -> Result<()> {
        ensure_recording(self.state, "resource_barrier()")?;

        let mut raw = Vec::with_capacity(barriers.len());
        for barrier in barriers {
            let resource = downcast::<Resource>(barrier.resource.as_any(), "Barrier resource")?;
            raw.push(transition_barrier(resource.raw(), barrier.before, barrier.after));
        }

        unsafe { self.list.ResourceBarrier(&raw) };
        Ok(())
    }

    fn set_render_target(&mut self, rtv: CpuDescriptorHandle) -> Result<()> {
        ensure_recording(self.state, "set_render_target()")?;
        let handle = to_d3d12_handle(rtv);
        unsafe { self.list.OMSetRenderTargets(1, Some(&handle), false, None) };
        Ok(())
    }

    fn clear_render_target(&mut self, rtv: CpuDescriptorHandle, color: [f32; 4]) -> Result<()> {
        ensure_recording(self.state, "clear_render_target()")?;
        unsafe { self.list.ClearRenderTargetView(to_d3d12_handle(rtv), &color, None) };
        Ok(())
    }

    fn set_graphics_root_signature(&mut self, pipeline: &dyn RendererPipeline) -> Result<()> {
        ensure_recording(self.state, "set_graphics_root_signature()")?;
        let pipeline = downcast::<Pipeline>(pipeline.as_any(), "Pipeline")?;
        unsafe { self.list.SetGraphicsRootSignature(pipeline.root_signature()) };
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        ensure_recording(self.state, "set_viewport()")?;
        let viewport = D3D12_VIEWPORT {
            TopLeftX: viewport.x,
            TopLeftY: viewport.y,
            Width: viewport.width,
            Height: viewport.height,
            MinDepth: viewport.min_depth,
            MaxDepth: viewport.max_depth,
        };
        unsafe { self.list.RSSetViewports(&[viewport]) };
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        ensure_recording(self.state, "set_scissor()")?;
        let rect = RECT {
            left: scissor.x,
            top: scissor.y,
            right: scissor.x + scissor.width as i32,
            bottom: scissor.y + scissor.height as i32,
        };
        unsafe { self.list.RSSetScissorRects(&[rect]) };
        Ok(())
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) -> Result<()> {
        ensure_recording(self.state, "set_primitive_topology()")?;
        unsafe { self.list.IASetPrimitiveTopology(to_d3d_topology(topology)) };
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, view: &VertexBufferView) -> Result<()> {
        ensure_recording(self.state, "bind_vertex_buffer()")?;
        let view = D3D12_VERTEX_BUFFER_VIEW {
            BufferLocation: view.gpu_address,
            SizeInBytes: view.size_in_bytes,
            StrideInBytes: view.stride_in_bytes,
        };
        unsafe { self.list.IASetVertexBuffers(0, Some(&[view])) };
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) -> Result<()> {
        ensure_recording(self.state, "draw()")?;
        unsafe { self.list.DrawInstanced(vertex_count, instance_count, first_vertex, first_instance) };
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        ensure_recording(self.state, "close()")?;
        // A failed Close() still leaves the list closed; it needs a reset either way
        self.state = CommandListState::Closed;
        unsafe { self.list.Close() }.or_engine("Failed to close command list")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
