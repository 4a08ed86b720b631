/*!
# Triangle Engine - Direct3D 12 Backend

Direct3D 12 implementation of the triangle_engine backend traits, built on
the `windows` crate bindings for D3D12 and DXGI.

`D3d12GraphicsDevice` is the only entry point: hand it to
`TriangleRenderer::initialize()` and every other GPU object is created
through it.

The crate is empty on non-Windows targets.
*/

#![cfg(windows)]

mod d3d12_error;
mod d3d12_format;
mod d3d12_resource;
mod d3d12_descriptor_heap;
mod d3d12_command_list;
mod d3d12_command_queue;
mod d3d12_swapchain;
mod d3d12_pipeline;
mod d3d12_device;

// Main triangle namespace module
//
// Concrete types are exported for callers that downcast through `as_any()`.
pub mod triangle {
    pub use crate::d3d12_device::D3d12GraphicsDevice;
    pub use crate::d3d12_swapchain::Swapchain as D3d12Swapchain;
    pub use crate::d3d12_command_list::{
        CommandAllocator as D3d12CommandAllocator,
        CommandList as D3d12CommandList,
    };
    pub use crate::d3d12_command_queue::{
        CommandQueue as D3d12CommandQueue,
        Fence as D3d12Fence,
    };
    pub use crate::d3d12_descriptor_heap::DescriptorHeap as D3d12DescriptorHeap;
    pub use crate::d3d12_resource::Resource as D3d12Resource;
    pub use crate::d3d12_pipeline::Pipeline as D3d12Pipeline;
}
