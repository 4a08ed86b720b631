/// D3d12GraphicsDevice - Direct3D 12 implementation of the GraphicsDevice trait

use raw_window_handle::RawWindowHandle;
use triangle_engine::triangle::Result;
use triangle_engine::triangle::render::{
    GraphicsDevice as RendererGraphicsDevice,
    CommandQueue as RendererCommandQueue,
    Swapchain as RendererSwapchain,
    DescriptorHeap as RendererDescriptorHeap,
    CommandAllocator as RendererCommandAllocator,
    CommandList as RendererCommandList,
    Fence as RendererFence,
    Pipeline as RendererPipeline,
    GpuResource as RendererGpuResource,
    SwapchainDesc, CpuDescriptorHandle, PipelineDesc, ValidationFlags,
};
use triangle_engine::{engine_bail, engine_info, engine_warn};
use windows::Win32::Graphics::Direct3D::D3D_FEATURE_LEVEL_11_0;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::core::Interface;

use crate::d3d12_error::{downcast, map_init_hresult, HResultExt, LOG_SOURCE};
use crate::d3d12_command_list::{CommandAllocator, CommandList};
use crate::d3d12_command_queue::{CommandQueue, Fence};
use crate::d3d12_descriptor_heap::{to_d3d12_handle, DescriptorHeap};
use crate::d3d12_pipeline::Pipeline;
use crate::d3d12_resource::Resource;
use crate::d3d12_swapchain::Swapchain;

/// Direct3D 12 device and the DXGI factory it was created from
pub struct D3d12GraphicsDevice {
    factory: IDXGIFactory4,
    device: ID3D12Device,
    adapter_name: String,
}

unsafe impl Send for D3d12GraphicsDevice {}

impl D3d12GraphicsDevice {
    /// Create a device on the first hardware adapter supporting feature level 11_0
    ///
    /// Falls back to the WARP software adapter when no hardware adapter
    /// qualifies. `validation` selects the debug layer and GPU-based
    /// validation; an unavailable debug layer is logged, not fatal.
    pub fn new(validation: ValidationFlags) -> Result<Self> {
        let mut factory_flags = DXGI_CREATE_FACTORY_FLAGS(0);
        if validation.contains(ValidationFlags::DEBUG_LAYER) && enable_debug_layer(validation) {
            factory_flags |= DXGI_CREATE_FACTORY_DEBUG;
        }

        let factory: IDXGIFactory4 = unsafe { CreateDXGIFactory2(factory_flags) }
            .map_err(|e| map_init_hresult("Failed to create DXGI factory", e))?;

        let (device, adapter_name) = match create_hardware_device(&factory) {
            Some(found) => found,
            None => {
                engine_warn!(LOG_SOURCE, "No hardware adapter supports Direct3D 12, using WARP");
                create_warp_device(&factory)?
            }
        };

        engine_info!(LOG_SOURCE, "Direct3D 12 device created on '{}'", adapter_name);
        Ok(Self { factory, device, adapter_name })
    }

    pub fn raw(&self) -> &ID3D12Device {
        &self.device
    }
}

/// Returns whether the debug layer is active
fn enable_debug_layer(validation: ValidationFlags) -> bool {
    let mut debug: Option<ID3D12Debug> = None;
    let Some(debug) = unsafe { D3D12GetDebugInterface(&mut debug) }.ok().and(debug) else {
        engine_warn!(LOG_SOURCE, "D3D12 debug layer unavailable (Graphics Tools not installed?)");
        return false;
    };

    unsafe { debug.EnableDebugLayer() };

    if validation.contains(ValidationFlags::GPU_BASED_VALIDATION) {
        match debug.cast::<ID3D12Debug1>() {
            Ok(debug1) => unsafe { debug1.SetEnableGPUBasedValidation(true) },
            Err(e) => engine_warn!(LOG_SOURCE, "GPU-based validation unavailable: {:?}", e),
        }
    }

    engine_info!(LOG_SOURCE, "D3D12 debug layer enabled");
    true
}

fn adapter_description(desc: &DXGI_ADAPTER_DESC1) -> String {
    let len = desc.Description.iter().position(|&c| c == 0).unwrap_or(desc.Description.len());
    String::from_utf16_lossy(&desc.Description[..len])
}

fn create_hardware_device(factory: &IDXGIFactory4) -> Option<(ID3D12Device, String)> {
    // EnumAdapters1 fails with DXGI_ERROR_NOT_FOUND past the last adapter
    for index in 0.. {
        let adapter = unsafe { factory.EnumAdapters1(index) }.ok()?;
        let Ok(desc) = (unsafe { adapter.GetDesc1() }) else {
            continue;
        };

        if (DXGI_ADAPTER_FLAG(desc.Flags as i32) & DXGI_ADAPTER_FLAG_SOFTWARE) != DXGI_ADAPTER_FLAG_NONE {
            continue;
        }

        let mut device: Option<ID3D12Device> = None;
        if unsafe { D3D12CreateDevice(&adapter, D3D_FEATURE_LEVEL_11_0, &mut device) }.is_ok() {
            if let Some(device) = device {
                return Some((device, adapter_description(&desc)));
            }
        }
    }
    None
}

fn create_warp_device(factory: &IDXGIFactory4) -> Result<(ID3D12Device, String)> {
    let adapter: IDXGIAdapter1 = unsafe { factory.EnumWarpAdapter() }
        .map_err(|e| map_init_hresult("Failed to enumerate the WARP adapter", e))?;

    let mut device: Option<ID3D12Device> = None;
    unsafe { D3D12CreateDevice(&adapter, D3D_FEATURE_LEVEL_11_0, &mut device) }
        .map_err(|e| map_init_hresult("Failed to create Direct3D 12 device", e))?;

    let Some(device) = device else {
        engine_bail!(LOG_SOURCE, InitializationFailed, "D3D12CreateDevice returned no device");
    };

    let name = unsafe { adapter.GetDesc1() }
        .map(|desc| adapter_description(&desc))
        .unwrap_or_else(|_| "WARP".to_string());
    Ok((device, name))
}

impl RendererGraphicsDevice for D3d12GraphicsDevice {
    fn create_command_queue(&mut self) -> Result<Box<dyn RendererCommandQueue>> {
        let queue: ID3D12CommandQueue = unsafe {
            self.device.CreateCommandQueue(&D3D12_COMMAND_QUEUE_DESC {
                Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
                ..Default::default()
            })
        }.or_engine("Failed to create command queue")?;

        Ok(Box::new(CommandQueue::new(queue)))
    }

    fn create_swapchain(
        &mut self,
        queue: &dyn RendererCommandQueue,
        window: RawWindowHandle,
        desc: &SwapchainDesc,
    ) -> Result<Box<dyn RendererSwapchain>> {
        let queue = downcast::<CommandQueue>(queue.as_any(), "Command queue")?;
        let swapchain = Swapchain::new(&self.factory, queue.raw(), window, desc)?;
        Ok(Box::new(swapchain))
    }

    fn create_rtv_heap(&mut self, count: u32) -> Result<Box<dyn RendererDescriptorHeap>> {
        let heap: ID3D12DescriptorHeap = unsafe {
            self.device.CreateDescriptorHeap(&D3D12_DESCRIPTOR_HEAP_DESC {
                NumDescriptors: count,
                Type: D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
                ..Default::default()
            })
        }.or_engine("Failed to create RTV descriptor heap")?;

        let increment = unsafe { self.device.GetDescriptorHandleIncrementSize(D3D12_DESCRIPTOR_HEAP_TYPE_RTV) };
        Ok(Box::new(DescriptorHeap::new(heap, increment, count)))
    }

    fn create_render_target_view(&mut self, resource: &dyn RendererGpuResource, handle: CpuDescriptorHandle) -> Result<()> {
        let resource = downcast::<Resource>(resource.as_any(), "Render target")?;
        unsafe { self.device.CreateRenderTargetView(resource.raw(), None, to_d3d12_handle(handle)) };
        Ok(())
    }

    fn create_command_allocator(&mut self) -> Result<Box<dyn RendererCommandAllocator>> {
        let allocator: ID3D12CommandAllocator = unsafe {
            self.device.CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT)
        }.or_engine("Failed to create command allocator")?;

        Ok(Box::new(CommandAllocator::new(allocator)))
    }

    fn create_command_list(&mut self, allocator: &dyn RendererCommandAllocator) -> Result<Box<dyn RendererCommandList>> {
        let allocator = downcast::<CommandAllocator>(allocator.as_any(), "Command allocator")?;
        let list: ID3D12GraphicsCommandList = unsafe {
            self.device.CreateCommandList(0, D3D12_COMMAND_LIST_TYPE_DIRECT, allocator.raw(), None)
        }.or_engine("Failed to create command list")?;

        Ok(Box::new(CommandList::new(list)))
    }

    fn create_fence(&mut self, initial_value: u64) -> Result<Box<dyn RendererFence>> {
        let fence: ID3D12Fence = unsafe { self.device.CreateFence(initial_value, D3D12_FENCE_FLAG_NONE) }
            .or_engine("Failed to create fence")?;

        Ok(Box::new(Fence::new(fence)?))
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<Box<dyn RendererPipeline>> {
        Ok(Box::new(Pipeline::new(&self.device, desc)?))
    }

    fn adapter_name(&self) -> String {
        self.adapter_name.clone()
    }
}
