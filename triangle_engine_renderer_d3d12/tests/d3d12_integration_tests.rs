//! Integration tests for the Direct3D 12 backend
//!
//! These tests drive the frame sequence on a real GPU (or WARP).
//! All tests require Windows and a D3D12 runtime and are marked with #[ignore].
//!
//! Run with: cargo test -p triangle_engine_renderer_d3d12 --test d3d12_integration_tests -- --ignored

#![cfg(windows)]


use gpu_test_utils::{create_device, test_config, test_window, TEST_HEIGHT, TEST_WIDTH};
use serial_test::serial;
use triangle_engine::triangle::{Error, TriangleRenderer};
use triangle_engine::triangle::render::{
    CommandAllocator, CommandList, CommandListState, CommandQueue, DescriptorHeap, Fence,
    GraphicsDevice, PipelineConfig, ResourceState,
};

// ============================================================================
// DEVICE OBJECT TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_device_reports_adapter() {
    let device = create_device();

    assert!(!device.adapter_name().is_empty());
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_command_list_state_machine() {
    let mut device = create_device();
    let mut allocator = device.create_command_allocator().unwrap();
    let mut list = device.create_command_list(allocator.as_ref()).unwrap();

    assert_eq!(list.state(), CommandListState::Recording);
    assert!(matches!(list.reset(allocator.as_ref(), None), Err(Error::InvalidCommandListState(_))));

    list.close().unwrap();
    assert_eq!(list.state(), CommandListState::Closed);
    assert!(matches!(list.close(), Err(Error::InvalidCommandListState(_))));
    assert!(matches!(list.draw(3, 1, 0, 0), Err(Error::InvalidCommandListState(_))));

    allocator.reset().unwrap();
    list.reset(allocator.as_ref(), None).unwrap();
    assert_eq!(list.state(), CommandListState::Recording);
    list.close().unwrap();
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_fence_signal_and_wait() {
    let mut device = create_device();
    let mut queue = device.create_command_queue().unwrap();
    let fence = device.create_fence(0).unwrap();

    queue.signal(fence.as_ref(), 5).unwrap();
    fence.wait_for(5).unwrap();

    assert!(fence.completed_value() >= 5);
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_rtv_heap_layout() {
    let mut device = create_device();
    let heap = device.create_rtv_heap(3).unwrap();

    assert_eq!(heap.len(), 3);
    assert!(heap.increment_size() > 0);
    let second = heap.handle(1).unwrap();
    assert_eq!(second.ptr, heap.cpu_start().ptr + heap.increment_size());
    assert!(matches!(heap.handle(3), Err(Error::InvalidResource(_))));
}

// ============================================================================
// FRAME SEQUENCE TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_clear_only_frames() {
    let mut renderer = TriangleRenderer::new(test_config(false));
    renderer.initialize(Box::new(create_device()), test_window()).unwrap();

    for _ in 0..4 {
        renderer.render_frame().unwrap();
    }

    let context = renderer.context().unwrap();
    assert!(!context.has_pipeline());
    for index in 0..context.frame_count() {
        assert_eq!(context.back_buffer_state(index), Some(ResourceState::Present));
    }
    renderer.cleanup().unwrap();
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_triangle_frames_alternate_back_buffers() {
    let mut renderer = TriangleRenderer::new(test_config(true));
    renderer.initialize(Box::new(create_device()), test_window()).unwrap();
    assert!(renderer.context().unwrap().has_pipeline());

    let mut previous = None;
    for _ in 0..6 {
        let frame = renderer.render_frame().unwrap();
        assert!(frame.back_buffer_index < renderer.frame_count());
        assert_ne!(Some(frame.back_buffer_index), previous);
        previous = Some(frame.back_buffer_index);
    }

    assert_eq!(renderer.frames_rendered(), 6);
    renderer.cleanup().unwrap();
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_resize_then_render() {
    let mut renderer = TriangleRenderer::new(test_config(true));
    renderer.initialize(Box::new(create_device()), test_window()).unwrap();
    renderer.render_frame().unwrap();

    renderer.resize(TEST_WIDTH / 2, TEST_HEIGHT / 2).unwrap();
    let context = renderer.context().unwrap();
    assert_eq!((context.width(), context.height()), (TEST_WIDTH / 2, TEST_HEIGHT / 2));

    renderer.render_frame().unwrap();
    renderer.cleanup().unwrap();
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_missing_shader_fails_initialize() {
    let mut config = test_config(false);
    config.pipeline = Some(PipelineConfig::basic_hlsl("does/not/exist"));

    let mut renderer = TriangleRenderer::new(config);
    let err = renderer.initialize(Box::new(create_device()), test_window()).unwrap_err();

    assert!(matches!(err, Error::InvalidResource(_)));
    assert!(!renderer.is_initialized());
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_integration_three_buffer_ring() {
    let mut config = test_config(true);
    config.frame_count = 3;
    let mut renderer = TriangleRenderer::new(config);
    renderer.initialize(Box::new(create_device()), test_window()).unwrap();

    let indices: Vec<u32> = (0..6).map(|_| renderer.render_frame().unwrap().back_buffer_index).collect();

    assert_eq!(&indices[0..3], &indices[3..6]);
    renderer.cleanup().unwrap();
}
