/// Per-back-buffer fence bookkeeping
///
/// Each back-buffer slot remembers the fence value signaled after its last
/// submission. Before the slot's command allocator is reused, the CPU waits
/// until the GPU has reached that value.

use crate::error::Result;
use crate::renderer::{CommandQueue, Fence};
use crate::engine_bail;

#[derive(Debug, Clone)]
pub struct FrameSync {
    pending: Vec<u64>,
    next_value: u64,
}

impl FrameSync {
    /// Bookkeeping for `frame_count` slots, with a fence created at `initial_value`
    pub fn new(frame_count: u32, initial_value: u64) -> Self {
        Self {
            pending: vec![initial_value; frame_count as usize],
            next_value: initial_value + 1,
        }
    }

    pub fn frame_count(&self) -> u32 {
        self.pending.len() as u32
    }

    /// Fence value the slot waits for before reuse
    pub fn pending_value(&self, slot: u32) -> Option<u64> {
        self.pending.get(slot as usize).copied()
    }

    /// Value the next `signal` issues
    pub fn next_value(&self) -> u64 {
        self.next_value
    }

    /// Last value issued (0-based fences report the initial value before any signal)
    pub fn last_signaled(&self) -> u64 {
        self.next_value - 1
    }

    /// Block until the GPU finished the slot's previous submission
    pub fn wait_for_frame(&self, fence: &dyn Fence, slot: u32) -> Result<()> {
        let Some(value) = self.pending_value(slot) else {
            engine_bail!("triangle::frame_sync", InvalidResource,
                "Frame slot {} out of range ({} slots)", slot, self.pending.len());
        };

        if fence.completed_value() < value {
            fence.wait_for(value)?;
        }
        Ok(())
    }

    /// Signal the next fence value and attach it to `slot`
    pub fn signal(&mut self, queue: &mut dyn CommandQueue, fence: &dyn Fence, slot: u32) -> Result<u64> {
        if slot as usize >= self.pending.len() {
            engine_bail!("triangle::frame_sync", InvalidResource,
                "Frame slot {} out of range ({} slots)", slot, self.pending.len());
        }

        let value = self.next_value;
        queue.signal(fence, value)?;
        self.pending[slot as usize] = value;
        self.next_value += 1;
        Ok(value)
    }

    /// Signal a fresh value and wait for it: every submitted frame is complete afterwards
    pub fn wait_idle(&mut self, queue: &mut dyn CommandQueue, fence: &dyn Fence) -> Result<()> {
        let value = self.next_value;
        queue.signal(fence, value)?;
        self.next_value += 1;
        fence.wait_for(value)
    }
}

#[cfg(test)]
#[path = "frame_sync_tests.rs"]
mod tests;
