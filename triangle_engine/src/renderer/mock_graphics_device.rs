/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every mock object shares one `MockGpuState`, which records the calls made
/// through the backend traits and simulates the parts of GPU behavior the
/// frame sequence depends on:
/// - fence completion (instant with `auto_complete`, otherwise on `wait_for`)
/// - command allocators rejecting a reset while their submission is in flight
/// - command lists enforcing Closed/Recording transitions
/// - flip-discard back-buffer rotation on present
///
/// Failures are injected with `MockGpuState::fail_at`.

use std::any::Any;
use std::num::NonZeroIsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use raw_window_handle::{RawWindowHandle, Win32WindowHandle};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::renderer::{
    GraphicsDevice, CommandQueue, Fence, Swapchain, SwapchainDesc, DescriptorHeap,
    CpuDescriptorHandle, CommandAllocator, CommandList, CommandListState, Pipeline,
    PipelineDesc, GpuResource, ResourceId, ResourceState, TransitionBarrier, Format,
    Viewport, Rect2D, PrimitiveTopology, VertexBufferView, Vertex, ensure_recording,
};

// ============================================================================
// Shared state
// ============================================================================

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    CreateCommandQueue,
    CreateSwapchain { width: u32, height: u32, buffer_count: u32 },
    CreateRtvHeap(u32),
    CreateRenderTargetView { resource: ResourceId, handle: usize },
    CreateCommandAllocator(u32),
    CreateCommandList,
    CreateFence(u64),
    CreatePipeline { vertex_count: u32 },
    AllocatorReset(u32),
    ListReset { allocator: u32, with_pipeline: bool },
    ResourceBarrier { resource: ResourceId, before: ResourceState, after: ResourceState },
    SetRenderTarget(usize),
    ClearRenderTarget { rtv: usize, color: [f32; 4] },
    SetRootSignature,
    SetViewport(Viewport),
    SetScissor(Rect2D),
    SetPrimitiveTopology(PrimitiveTopology),
    BindVertexBuffer(VertexBufferView),
    Draw { vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32 },
    Close,
    Execute(usize),
    Present { back_buffer_index: u32, sync_interval: u32 },
    Signal(u64),
    WaitForFence(u64),
    Resize { width: u32, height: u32 },
}

/// Backend operation where an error can be injected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailPoint {
    CreateSwapchain,
    CreatePipeline,
    AllocatorReset,
    ListReset,
    ResourceBarrier,
    ClearRenderTarget,
    Draw,
    Close,
    Execute,
    Present,
    Signal,
    Resize,
}

#[derive(Debug, Default)]
pub struct MockGpuState {
    /// Every backend call, in order
    pub calls: Vec<MockCall>,
    /// Value the simulated GPU has reached
    pub completed_fence: u64,
    /// Highest value signaled on the queue
    pub last_signaled: u64,
    /// Complete every signal immediately (GPU infinitely fast)
    pub auto_complete: bool,
    /// Override the swap chain's current index (to simulate a broken backend)
    pub forced_back_buffer_index: Option<u32>,
    failure: Option<(MockFailPoint, Error)>,
    /// allocator id -> fence value of its last submission
    allocator_fences: FxHashMap<u32, u64>,
    /// Allocators executed but not yet covered by a signal
    unsignaled_allocators: Vec<u32>,
    next_allocator_id: u32,
}

impl MockGpuState {
    /// Make the next calls at `point` fail with `error`
    pub fn fail_at(&mut self, point: MockFailPoint, error: Error) {
        self.failure = Some((point, error));
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    /// Calls matching a predicate
    pub fn count(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    /// Whether the GPU may still be executing commands from this allocator
    pub fn allocator_in_flight(&self, id: u32) -> bool {
        self.unsignaled_allocators.contains(&id)
            || self.allocator_fences.get(&id).is_some_and(|v| *v > self.completed_fence)
    }

    fn check(&self, point: MockFailPoint) -> Result<()> {
        match &self.failure {
            Some((p, error)) if *p == point => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

pub type SharedState = Arc<Mutex<MockGpuState>>;

pub fn lock(state: &SharedState) -> MutexGuard<'_, MockGpuState> {
    state.lock().unwrap()
}

// ============================================================================
// Test helpers
// ============================================================================

/// Placeholder native window (the mock never dereferences it)
pub fn test_window() -> RawWindowHandle {
    let hwnd = NonZeroIsize::new(1).unwrap();
    RawWindowHandle::Win32(Win32WindowHandle::new(hwnd))
}

/// Write a non-empty `basic.hlsl` into a fresh per-test directory and return it
pub fn write_test_shaders(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("triangle_mock_shaders_{}_{}", std::process::id(), test_name));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("basic.hlsl"), "float4 VSMain() : SV_POSITION { return 0; }").unwrap();
    dir
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    state: SharedState,
    rtv_heap_start: usize,
    rtv_increment: usize,
}

impl MockGraphicsDevice {
    pub const RTV_HEAP_START: usize = 0x1000;
    pub const RTV_INCREMENT: usize = 32;

    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockGpuState::default())),
            rtv_heap_start: Self::RTV_HEAP_START,
            rtv_increment: Self::RTV_INCREMENT,
        }
    }

    /// Device whose fence completes every signal immediately
    pub fn auto_complete() -> Self {
        let device = Self::new();
        lock(&device.state).auto_complete = true;
        device
    }

    /// Handle on the shared state, valid after the device is boxed away
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_command_queue(&mut self) -> Result<Box<dyn CommandQueue>> {
        lock(&self.state).calls.push(MockCall::CreateCommandQueue);
        Ok(Box::new(MockCommandQueue { state: self.state() }))
    }

    fn create_swapchain(
        &mut self,
        _queue: &dyn CommandQueue,
        _window: RawWindowHandle,
        desc: &SwapchainDesc,
    ) -> Result<Box<dyn Swapchain>> {
        let mut state = lock(&self.state);
        state.check(MockFailPoint::CreateSwapchain)?;
        state.calls.push(MockCall::CreateSwapchain {
            width: desc.width,
            height: desc.height,
            buffer_count: desc.buffer_count,
        });
        drop(state);

        Ok(Box::new(MockSwapchain::new(self.state(), desc)))
    }

    fn create_rtv_heap(&mut self, count: u32) -> Result<Box<dyn DescriptorHeap>> {
        lock(&self.state).calls.push(MockCall::CreateRtvHeap(count));
        Ok(Box::new(MockDescriptorHeap::new(self.rtv_heap_start, self.rtv_increment, count)))
    }

    fn create_render_target_view(&mut self, resource: &dyn GpuResource, handle: CpuDescriptorHandle) -> Result<()> {
        lock(&self.state).calls.push(MockCall::CreateRenderTargetView {
            resource: resource.id(),
            handle: handle.ptr,
        });
        Ok(())
    }

    fn create_command_allocator(&mut self) -> Result<Box<dyn CommandAllocator>> {
        let mut state = lock(&self.state);
        let id = state.next_allocator_id;
        state.next_allocator_id += 1;
        state.calls.push(MockCall::CreateCommandAllocator(id));
        drop(state);

        Ok(Box::new(MockCommandAllocator { state: self.state(), id }))
    }

    fn create_command_list(&mut self, allocator: &dyn CommandAllocator) -> Result<Box<dyn CommandList>> {
        let allocator_id = MockCommandAllocator::id_of(allocator)?;
        lock(&self.state).calls.push(MockCall::CreateCommandList);
        Ok(Box::new(MockCommandList {
            state: self.state(),
            list_state: CommandListState::Recording,
            allocator: Some(allocator_id),
        }))
    }

    fn create_fence(&mut self, initial_value: u64) -> Result<Box<dyn Fence>> {
        let mut state = lock(&self.state);
        state.completed_fence = initial_value;
        state.last_signaled = initial_value;
        state.calls.push(MockCall::CreateFence(initial_value));
        drop(state);

        Ok(Box::new(MockFence { state: self.state() }))
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<Box<dyn Pipeline>> {
        lock(&self.state).check(MockFailPoint::CreatePipeline)?;
        desc.vertex_shader.load()?;
        desc.pixel_shader.load()?;

        let vertex_count = desc.vertices.len() as u32;
        lock(&self.state).calls.push(MockCall::CreatePipeline { vertex_count });

        Ok(Box::new(MockPipeline {
            view: VertexBufferView {
                gpu_address: 0xD000_0000,
                size_in_bytes: vertex_count * Vertex::STRIDE,
                stride_in_bytes: Vertex::STRIDE,
            },
            vertex_count,
            topology: desc.topology,
        }))
    }

    fn adapter_name(&self) -> String {
        "Mock Adapter".to_string()
    }
}

// ============================================================================
// Mock CommandQueue / Fence
// ============================================================================

pub struct MockCommandQueue {
    state: SharedState,
}

impl CommandQueue for MockCommandQueue {
    fn execute(&mut self, lists: &[&dyn CommandList]) -> Result<()> {
        let mut state = lock(&self.state);
        state.check(MockFailPoint::Execute)?;

        for list in lists {
            if list.state() != CommandListState::Closed {
                return Err(Error::InvalidCommandListState(
                    "Executed a command list that is still recording".to_string(),
                ));
            }
            let mock = list
                .as_any()
                .downcast_ref::<MockCommandList>()
                .ok_or_else(|| Error::InvalidResource("Not a mock command list".to_string()))?;
            if let Some(id) = mock.allocator {
                state.unsignaled_allocators.push(id);
            }
        }

        state.calls.push(MockCall::Execute(lists.len()));
        Ok(())
    }

    fn signal(&mut self, _fence: &dyn Fence, value: u64) -> Result<()> {
        let mut state = lock(&self.state);
        state.check(MockFailPoint::Signal)?;

        let pending = std::mem::take(&mut state.unsignaled_allocators);
        for id in pending {
            state.allocator_fences.insert(id, value);
        }
        state.last_signaled = value;
        if state.auto_complete {
            state.completed_fence = value;
        }
        state.calls.push(MockCall::Signal(value));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockFence {
    state: SharedState,
}

impl Fence for MockFence {
    fn completed_value(&self) -> u64 {
        lock(&self.state).completed_fence
    }

    fn wait_for(&self, value: u64) -> Result<()> {
        let mut state = lock(&self.state);
        if state.completed_fence >= value {
            return Ok(());
        }
        if value > state.last_signaled {
            // A real GPU would never reach it: the CPU would hang forever
            return Err(Error::BackendError(format!(
                "Waiting for fence value {} that was never signaled (last {})",
                value, state.last_signaled
            )));
        }
        state.completed_fence = value;
        state.calls.push(MockCall::WaitForFence(value));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Swapchain / BackBuffer
// ============================================================================

#[derive(Debug)]
pub struct MockBackBuffer {
    id: ResourceId,
    pub index: u32,
}

impl MockBackBuffer {
    pub fn new(index: u32) -> Self {
        Self { id: ResourceId::allocate(), index }
    }
}

impl GpuResource for MockBackBuffer {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockSwapchain {
    state: SharedState,
    width: u32,
    height: u32,
    format: Format,
    current: u32,
    buffers: Vec<Arc<MockBackBuffer>>,
}

impl MockSwapchain {
    fn new(state: SharedState, desc: &SwapchainDesc) -> Self {
        Self {
            state,
            width: desc.width,
            height: desc.height,
            format: desc.format,
            current: 0,
            buffers: (0..desc.buffer_count).map(|i| Arc::new(MockBackBuffer::new(i))).collect(),
        }
    }
}

impl Swapchain for MockSwapchain {
    fn current_back_buffer_index(&self) -> u32 {
        lock(&self.state).forced_back_buffer_index.unwrap_or(self.current)
    }

    fn buffer_count(&self) -> u32 {
        self.buffers.len() as u32
    }

    fn back_buffer(&self, index: u32) -> Result<Arc<dyn GpuResource>> {
        self.buffers
            .get(index as usize)
            .map(|b| Arc::clone(b) as Arc<dyn GpuResource>)
            .ok_or_else(|| Error::InvalidResource(format!("No back-buffer {}", index)))
    }

    fn present(&mut self, sync_interval: u32) -> Result<()> {
        let mut state = lock(&self.state);
        state.check(MockFailPoint::Present)?;
        state.calls.push(MockCall::Present { back_buffer_index: self.current, sync_interval });
        drop(state);

        self.current = (self.current + 1) % self.buffer_count();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        lock(&self.state).check(MockFailPoint::Resize)?;
        if self.buffers.iter().any(|b| Arc::strong_count(b) > 1) {
            return Err(Error::InvalidResourceState(
                "Resizing while back-buffer references are alive".to_string(),
            ));
        }

        let count = self.buffer_count();
        self.buffers = (0..count).map(|i| Arc::new(MockBackBuffer::new(i))).collect();
        self.width = width;
        self.height = height;
        self.current = 0;
        lock(&self.state).calls.push(MockCall::Resize { width, height });
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> Format {
        self.format
    }
}

// ============================================================================
// Mock DescriptorHeap
// ============================================================================

pub struct MockDescriptorHeap {
    start: usize,
    increment: usize,
    len: u32,
}

impl MockDescriptorHeap {
    pub fn new(start: usize, increment: usize, len: u32) -> Self {
        Self { start, increment, len }
    }
}

impl DescriptorHeap for MockDescriptorHeap {
    fn cpu_start(&self) -> CpuDescriptorHandle {
        CpuDescriptorHandle::new(self.start)
    }

    fn increment_size(&self) -> usize {
        self.increment
    }

    fn len(&self) -> u32 {
        self.len
    }
}

// ============================================================================
// Mock CommandAllocator / CommandList
// ============================================================================

pub struct MockCommandAllocator {
    state: SharedState,
    pub id: u32,
}

impl MockCommandAllocator {
    fn id_of(allocator: &dyn CommandAllocator) -> Result<u32> {
        allocator
            .as_any()
            .downcast_ref::<MockCommandAllocator>()
            .map(|a| a.id)
            .ok_or_else(|| Error::InvalidResource("Not a mock command allocator".to_string()))
    }
}

impl CommandAllocator for MockCommandAllocator {
    fn reset(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.check(MockFailPoint::AllocatorReset)?;
        if state.allocator_in_flight(self.id) {
            return Err(Error::BackendError(format!(
                "Command allocator {} reset while its commands are still executing",
                self.id
            )));
        }
        state.calls.push(MockCall::AllocatorReset(self.id));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockCommandList {
    state: SharedState,
    list_state: CommandListState,
    allocator: Option<u32>,
}

impl MockCommandList {
    /// Check recording state and injected failures, then record `call`
    fn record(&mut self, operation: &str, point: Option<MockFailPoint>, call: MockCall) -> Result<()> {
        ensure_recording(self.list_state, operation)?;
        let mut state = lock(&self.state);
        if let Some(point) = point {
            state.check(point)?;
        }
        state.calls.push(call);
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn state(&self) -> CommandListState {
        self.list_state
    }

    fn reset(&mut self, allocator: &dyn CommandAllocator, pipeline: Option<&dyn Pipeline>) -> Result<()> {
        if self.list_state == CommandListState::Recording {
            return Err(Error::InvalidCommandListState(
                "Command list reset while still recording".to_string(),
            ));
        }
        let allocator_id = MockCommandAllocator::id_of(allocator)?;

        let mut state = lock(&self.state);
        state.check(MockFailPoint::ListReset)?;
        state.calls.push(MockCall::ListReset {
            allocator: allocator_id,
            with_pipeline: pipeline.is_some(),
        });
        drop(state);

        self.allocator = Some(allocator_id);
        self.list_state = CommandListState::Recording;
        Ok(())
    }

    fn resource_barrier(&mut self, barriers: &[TransitionBarrier]) -> Result<()> {
        for barrier in barriers {
            self.record("resource_barrier", Some(MockFailPoint::ResourceBarrier), MockCall::ResourceBarrier {
                resource: barrier.resource_id(),
                before: barrier.before,
                after: barrier.after,
            })?;
        }
        Ok(())
    }

    fn set_render_target(&mut self, rtv: CpuDescriptorHandle) -> Result<()> {
        self.record("set_render_target", None, MockCall::SetRenderTarget(rtv.ptr))
    }

    fn clear_render_target(&mut self, rtv: CpuDescriptorHandle, color: [f32; 4]) -> Result<()> {
        self.record("clear_render_target", Some(MockFailPoint::ClearRenderTarget),
            MockCall::ClearRenderTarget { rtv: rtv.ptr, color })
    }

    fn set_graphics_root_signature(&mut self, _pipeline: &dyn Pipeline) -> Result<()> {
        self.record("set_graphics_root_signature", None, MockCall::SetRootSignature)
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.record("set_viewport", None, MockCall::SetViewport(viewport))
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.record("set_scissor", None, MockCall::SetScissor(scissor))
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) -> Result<()> {
        self.record("set_primitive_topology", None, MockCall::SetPrimitiveTopology(topology))
    }

    fn bind_vertex_buffer(&mut self, view: &VertexBufferView) -> Result<()> {
        self.record("bind_vertex_buffer", None, MockCall::BindVertexBuffer(*view))
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) -> Result<()> {
        self.record("draw", Some(MockFailPoint::Draw), MockCall::Draw {
            vertex_count,
            instance_count,
            first_vertex,
            first_instance,
        })
    }

    fn close(&mut self) -> Result<()> {
        if self.list_state == CommandListState::Closed {
            return Err(Error::InvalidCommandListState(
                "Command list closed twice".to_string(),
            ));
        }
        let mut state = lock(&self.state);
        state.check(MockFailPoint::Close)?;
        state.calls.push(MockCall::Close);
        drop(state);

        self.list_state = CommandListState::Closed;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Pipeline
// ============================================================================

pub struct MockPipeline {
    view: VertexBufferView,
    vertex_count: u32,
    topology: PrimitiveTopology,
}

impl Pipeline for MockPipeline {
    fn vertex_buffer_view(&self) -> VertexBufferView {
        self.view
    }

    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
