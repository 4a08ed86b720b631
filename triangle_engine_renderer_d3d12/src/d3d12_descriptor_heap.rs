/// DescriptorHeap - Direct3D 12 render-target-view heap

use triangle_engine::triangle::render::{
    DescriptorHeap as RendererDescriptorHeap,
    CpuDescriptorHandle,
};
use windows::Win32::Graphics::Direct3D12::*;

pub struct DescriptorHeap {
    heap: ID3D12DescriptorHeap,
    start: CpuDescriptorHandle,
    increment: usize,
    len: u32,
}

unsafe impl Send for DescriptorHeap {}

impl DescriptorHeap {
    pub(crate) fn new(heap: ID3D12DescriptorHeap, increment: u32, len: u32) -> Self {
        let start = unsafe { heap.GetCPUDescriptorHandleForHeapStart() };
        Self {
            heap,
            start: CpuDescriptorHandle::new(start.ptr),
            increment: increment as usize,
            len,
        }
    }

    pub fn raw(&self) -> &ID3D12DescriptorHeap {
        &self.heap
    }
}

impl RendererDescriptorHeap for DescriptorHeap {
    fn cpu_start(&self) -> CpuDescriptorHandle {
        self.start
    }

    fn increment_size(&self) -> usize {
        self.increment
    }

    fn len(&self) -> u32 {
        self.len
    }
}

pub(crate) fn to_d3d12_handle(handle: CpuDescriptorHandle) -> D3D12_CPU_DESCRIPTOR_HANDLE {
    D3D12_CPU_DESCRIPTOR_HANDLE { ptr: handle.ptr }
}
