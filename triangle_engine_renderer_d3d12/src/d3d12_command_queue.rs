/// CommandQueue - Direct3D 12 implementation of the CommandQueue and Fence traits

use std::any::Any;
use triangle_engine::triangle::Result;
use triangle_engine::triangle::render::{
    CommandQueue as RendererCommandQueue,
    CommandList as RendererCommandList,
    Fence as RendererFence,
};
use triangle_engine::{engine_bail, engine_warn};
use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_OBJECT_0};
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::System::Threading::{CreateEventA, WaitForSingleObject, INFINITE};
use windows::core::Interface;

use crate::d3d12_error::{downcast, HResultExt, LOG_SOURCE};
use crate::d3d12_command_list::CommandList;

/// Direct command queue
pub struct CommandQueue {
    queue: ID3D12CommandQueue,
}

unsafe impl Send for CommandQueue {}

impl CommandQueue {
    pub(crate) fn new(queue: ID3D12CommandQueue) -> Self {
        Self { queue }
    }

    pub fn raw(&self) -> &ID3D12CommandQueue {
        &self.queue
    }
}

impl RendererCommandQueue for CommandQueue {
    fn execute(&mut self, lists: &[&dyn RendererCommandList]) -> Result<()> {
        let mut raw = Vec::with_capacity(lists.len());
        for list in lists {
            let list = downcast::<CommandList>(list.as_any(), "Command list")?;
            let list: ID3D12CommandList = list.raw().cast()
                .or_engine("Failed to cast graphics command list")?;
            raw.push(Some(list));
        }

        unsafe { self.queue.ExecuteCommandLists(&raw) };
        Ok(())
    }

    fn signal(&mut self, fence: &dyn RendererFence, value: u64) -> Result<()> {
        let fence = downcast::<Fence>(fence.as_any(), "Fence")?;
        unsafe { self.queue.Signal(fence.raw(), value) }.or_engine("Failed to signal fence")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fence with its own wait event
pub struct Fence {
    fence: ID3D12Fence,
    event: HANDLE,
}

unsafe impl Send for Fence {}

impl Fence {
    pub(crate) fn new(fence: ID3D12Fence) -> Result<Self> {
        let event = unsafe { CreateEventA(None, false, false, None) }
            .or_engine("Failed to create fence event")?;
        Ok(Self { fence, event })
    }

    pub fn raw(&self) -> &ID3D12Fence {
        &self.fence
    }
}

impl RendererFence for Fence {
    fn completed_value(&self) -> u64 {
        unsafe { self.fence.GetCompletedValue() }
    }

    fn wait_for(&self, value: u64) -> Result<()> {
        let completed = self.completed_value();
        // Device removal makes every fence report u64::MAX
        if completed == u64::MAX {
            engine_bail!(LOG_SOURCE, DeviceLost, "Fence reports device removal");
        }
        if completed >= value {
            return Ok(());
        }

        unsafe { self.fence.SetEventOnCompletion(value, self.event) }
            .or_engine("Failed to arm fence event")?;

        let wait = unsafe { WaitForSingleObject(self.event, INFINITE) };
        if wait != WAIT_OBJECT_0 {
            engine_bail!(LOG_SOURCE, "Waiting for fence value {} failed ({:?})", value, wait);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Fence {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.event) } {
            engine_warn!(LOG_SOURCE, "Failed to close fence event: {:?}", e);
        }
    }
}
