/// Resource - Direct3D 12 implementation of the GpuResource trait

use std::any::Any;
use std::mem::ManuallyDrop;
use triangle_engine::triangle::render::{
    GpuResource as RendererGpuResource,
    ResourceId, ResourceState,
};
use windows::Win32::Graphics::Direct3D12::*;

/// A swap-chain back buffer
pub struct Resource {
    id: ResourceId,
    resource: ID3D12Resource,
}

// D3D12 resources are free-threaded
unsafe impl Send for Resource {}
unsafe impl Sync for Resource {}

impl Resource {
    pub(crate) fn new(resource: ID3D12Resource) -> Self {
        Self { id: ResourceId::allocate(), resource }
    }

    pub fn raw(&self) -> &ID3D12Resource {
        &self.resource
    }
}

impl RendererGpuResource for Resource {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn to_d3d12_state(state: ResourceState) -> D3D12_RESOURCE_STATES {
    match state {
        ResourceState::Present => D3D12_RESOURCE_STATE_PRESENT,
        ResourceState::RenderTarget => D3D12_RESOURCE_STATE_RENDER_TARGET,
    }
}

/// Build a whole-resource transition barrier
///
/// The barrier borrows `resource` without taking a reference; it must not
/// outlive the `ResourceBarrier` call it is recorded with.
pub(crate) fn transition_barrier(
    resource: &ID3D12Resource,
    before: ResourceState,
    after: ResourceState,
) -> D3D12_RESOURCE_BARRIER {
    D3D12_RESOURCE_BARRIER {
        Type: D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
        Flags: D3D12_RESOURCE_BARRIER_FLAG_NONE,
        Anonymous: D3D12_RESOURCE_BARRIER_0 {
            Transition: ManuallyDrop::new(D3D12_RESOURCE_TRANSITION_BARRIER {
                pResource: unsafe { std::mem::transmute_copy(resource) },
                StateBefore: to_d3d12_state(before),
                StateAfter: to_d3d12_state(after),
                Subresource: D3D12_RESOURCE_BARRIER_ALL_SUBRESOURCES,
            }),
        },
    }
}
