/// Descriptor heap trait and CPU descriptor handle arithmetic

use crate::error::Result;
use crate::engine_bail;

/// CPU-visible address of one descriptor slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuDescriptorHandle {
    pub ptr: usize,
}

impl CpuDescriptorHandle {
    pub fn new(ptr: usize) -> Self {
        Self { ptr }
    }

    /// Handle `index` slots past this one (`ptr + index * increment`)
    pub fn offset(self, index: u32, increment: usize) -> Self {
        Self { ptr: self.ptr + index as usize * increment }
    }
}

/// Table of descriptors addressed by a flat offset from the heap start
pub trait DescriptorHeap: Send {
    /// Handle of slot 0
    fn cpu_start(&self) -> CpuDescriptorHandle;

    /// Byte stride between consecutive slots (device dependent)
    fn increment_size(&self) -> usize;

    /// Number of slots
    fn len(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handle of slot `index`
    ///
    /// Fails with `InvalidResource` when `index` is outside `[0, len)`.
    fn handle(&self, index: u32) -> Result<CpuDescriptorHandle> {
        if index >= self.len() {
            engine_bail!("triangle::descriptor_heap", InvalidResource,
                "Descriptor index {} out of range (heap has {} slots)", index, self.len());
        }
        Ok(self.cpu_start().offset(index, self.increment_size()))
    }
}

#[cfg(test)]
#[path = "descriptor_heap_tests.rs"]
mod tests;
