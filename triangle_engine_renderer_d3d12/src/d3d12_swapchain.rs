/// Swapchain - Direct3D 12 / DXGI implementation of the Swapchain trait

use std::ffi::c_void;
use std::sync::Arc;
use raw_window_handle::RawWindowHandle;
use triangle_engine::triangle::Result;
use triangle_engine::triangle::render::{
    Swapchain as RendererSwapchain,
    GpuResource as RendererGpuResource,
    SwapchainDesc, Format,
};
use triangle_engine::{engine_bail, engine_debug};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D12::ID3D12CommandQueue;
use windows::Win32::Graphics::Dxgi::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::core::Interface;

use crate::d3d12_error::{map_init_hresult, HResultExt, LOG_SOURCE};
use crate::d3d12_format::to_dxgi_format;
use crate::d3d12_resource::Resource;

/// Flip-model swap chain bound to a Win32 window
pub struct Swapchain {
    swapchain: IDXGISwapChain3,
    back_buffers: Vec<Arc<Resource>>,
    desc: SwapchainDesc,
}

unsafe impl Send for Swapchain {}

impl Swapchain {
    /// Create a swap chain presenting through `queue`
    ///
    /// # Arguments
    ///
    /// * `factory` - DXGI factory the device was created from
    /// * `queue` - Direct command queue that will present
    /// * `window` - Must be a `RawWindowHandle::Win32`
    /// * `desc` - Size, buffer count and format
    pub(crate) fn new(
        factory: &IDXGIFactory4,
        queue: &ID3D12CommandQueue,
        window: RawWindowHandle,
        desc: &SwapchainDesc,
    ) -> Result<Self> {
        let hwnd = match window {
            RawWindowHandle::Win32(handle) => HWND(handle.hwnd.get() as *mut c_void),
            other => engine_bail!(LOG_SOURCE, InitializationFailed,
                "Direct3D 12 needs a Win32 window handle, got {:?}", other),
        };

        let swapchain_desc = DXGI_SWAP_CHAIN_DESC1 {
            Width: desc.width,
            Height: desc.height,
            Format: to_dxgi_format(desc.format),
            SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: desc.buffer_count,
            SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
            ..Default::default()
        };

        let swapchain: IDXGISwapChain1 = unsafe {
            factory.CreateSwapChainForHwnd(queue, hwnd, &swapchain_desc, None, None)
        }.map_err(|e| map_init_hresult("Failed to create swap chain", e))?;

        // Fullscreen transitions are not supported
        unsafe { factory.MakeWindowAssociation(hwnd, DXGI_MWA_NO_ALT_ENTER) }
            .or_engine("Failed to disable Alt+Enter")?;

        let swapchain: IDXGISwapChain3 = swapchain.cast().or_engine("IDXGISwapChain3 unavailable")?;

        let mut result = Self { swapchain, back_buffers: Vec::new(), desc: *desc };
        result.acquire_back_buffers()?;
        engine_debug!(LOG_SOURCE, "Swap chain created: {}x{}, {} buffers",
            desc.width, desc.height, desc.buffer_count);
        Ok(result)
    }

    fn acquire_back_buffers(&mut self) -> Result<()> {
        self.back_buffers.clear();
        for index in 0..self.desc.buffer_count {
            let buffer = unsafe { self.swapchain.GetBuffer(index) }
                .or_engine("Failed to get swap chain buffer")?;
            self.back_buffers.push(Arc::new(Resource::new(buffer)));
        }
        Ok(())
    }

    pub fn raw(&self) -> &IDXGISwapChain3 {
        &self.swapchain
    }
}

impl RendererSwapchain for Swapchain {
    fn current_back_buffer_index(&self) -> u32 {
        unsafe { self.swapchain.GetCurrentBackBufferIndex() }
    }

    fn buffer_count(&self) -> u32 {
        self.desc.buffer_count
    }

    fn back_buffer(&self, index: u32) -> Result<Arc<dyn RendererGpuResource>> {
        match self.back_buffers.get(index as usize) {
            Some(buffer) => Ok(Arc::clone(buffer) as Arc<dyn RendererGpuResource>),
            None => engine_bail!(LOG_SOURCE, InvalidResource,
                "Back buffer {} out of range ({} buffers)", index, self.back_buffers.len()),
        }
    }

    fn present(&mut self, sync_interval: u32) -> Result<()> {
        unsafe { self.swapchain.Present(sync_interval, DXGI_PRESENT(0)) }
            .ok()
            .or_engine("Present failed")
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        // ResizeBuffers fails while any back-buffer reference is alive
        if let Some(index) = self.back_buffers.iter().position(|b| Arc::strong_count(b) > 1) {
            engine_bail!(LOG_SOURCE, InvalidResource,
                "Back buffer {} is still referenced, cannot resize", index);
        }
        self.back_buffers.clear();

        let resized = unsafe {
            self.swapchain.ResizeBuffers(
                self.desc.buffer_count,
                width,
                height,
                DXGI_FORMAT_UNKNOWN,
                DXGI_SWAP_CHAIN_FLAG(0),
            )
        }.or_engine("Failed to resize swap chain");

        // The old buffers survive a failed ResizeBuffers
        if let Err(e) = resized {
            self.acquire_back_buffers()?;
            return Err(e);
        }

        self.desc.width = width;
        self.desc.height = height;
        self.acquire_back_buffers()
    }

    fn width(&self) -> u32 {
        self.desc.width
    }

    fn height(&self) -> u32 {
        self.desc.height
    }

    fn format(&self) -> Format {
        self.desc.format
    }
}
