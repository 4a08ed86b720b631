//! Unit tests for the TriangleRenderer lifecycle

use crate::frame::TriangleRenderer;
use crate::renderer::RendererConfig;
use crate::renderer::mock_graphics_device::{MockGraphicsDevice, MockCall, lock, test_window};
use crate::error::Error;
use raw_window_handle::{HasWindowHandle, WindowHandle, HandleError};

struct TestWindow;

impl HasWindowHandle for TestWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        // SAFETY: the mock backend never dereferences the handle
        Ok(unsafe { WindowHandle::borrow_raw(test_window()) })
    }
}

struct ClosedWindow;

impl HasWindowHandle for ClosedWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        Err(HandleError::Unavailable)
    }
}

fn initialized() -> TriangleRenderer {
    let mut renderer = TriangleRenderer::new(RendererConfig::default());
    renderer.initialize(Box::new(MockGraphicsDevice::new()), &TestWindow).unwrap();
    renderer
}

#[test]
fn test_new_renderer_is_uninitialized() {
    let renderer = TriangleRenderer::new(RendererConfig::default());

    assert!(!renderer.is_initialized());
    assert!(renderer.context().is_none());
    assert_eq!(renderer.frame_count(), 2);
    assert_eq!(renderer.frames_rendered(), 0);
    assert_eq!(renderer.config().width, 1280);
}

#[test]
fn test_render_before_initialize_fails() {
    let mut renderer = TriangleRenderer::new(RendererConfig::default());

    assert!(matches!(renderer.render_frame(), Err(Error::NotInitialized(_))));
    assert!(matches!(renderer.resize(640, 480), Err(Error::NotInitialized(_))));
}

#[test]
fn test_initialize_then_render() {
    let mut renderer = initialized();

    assert!(renderer.is_initialized());
    let first = renderer.render_frame().unwrap();
    let second = renderer.render_frame().unwrap();

    assert_eq!(first.frame_number, 1);
    assert_eq!(second.frame_number, 2);
    assert_ne!(first.back_buffer_index, second.back_buffer_index);
    assert_eq!(renderer.frames_rendered(), 2);
}

#[test]
fn test_double_initialize_fails() {
    let mut renderer = initialized();

    let err = renderer.initialize(Box::new(MockGraphicsDevice::new()), &TestWindow).unwrap_err();
    assert!(matches!(err, Error::InitializationFailed(_)));
    assert!(renderer.is_initialized(), "the first context must survive");
}

#[test]
fn test_missing_window_handle_fails() {
    let mut renderer = TriangleRenderer::new(RendererConfig::default());

    let err = renderer.initialize(Box::new(MockGraphicsDevice::new()), &ClosedWindow).unwrap_err();
    assert!(matches!(err, Error::InitializationFailed(_)));
    assert!(!renderer.is_initialized());
}

#[test]
fn test_invalid_config_fails_initialize() {
    let mut renderer = TriangleRenderer::new(RendererConfig { sync_interval: 9, ..Default::default() });

    assert!(renderer.initialize(Box::new(MockGraphicsDevice::new()), &TestWindow).is_err());
    assert!(!renderer.is_initialized());
}

#[test]
fn test_cleanup_waits_for_gpu_and_is_idempotent() {
    let device = MockGraphicsDevice::new();
    let state = device.state();
    let mut renderer = TriangleRenderer::new(RendererConfig::default());
    renderer.initialize(Box::new(device), &TestWindow).unwrap();
    renderer.render_frame().unwrap();
    renderer.render_frame().unwrap();

    renderer.cleanup().unwrap();

    {
        let state = lock(&state);
        assert_eq!(state.completed_fence, state.last_signaled);
        assert_eq!(state.calls.last(), Some(&MockCall::WaitForFence(3)));
    }
    assert!(!renderer.is_initialized());

    let calls_before = lock(&state).calls.len();
    renderer.cleanup().unwrap();
    assert_eq!(lock(&state).calls.len(), calls_before);
}

#[test]
fn test_render_after_cleanup_fails() {
    let mut renderer = initialized();
    renderer.cleanup().unwrap();

    assert!(matches!(renderer.render_frame(), Err(Error::NotInitialized(_))));
}

#[test]
fn test_drop_waits_for_gpu() {
    let device = MockGraphicsDevice::new();
    let state = device.state();
    let mut renderer = TriangleRenderer::new(RendererConfig::default());
    renderer.initialize(Box::new(device), &TestWindow).unwrap();
    renderer.render_frame().unwrap();

    drop(renderer);

    let state = lock(&state);
    assert_eq!(state.completed_fence, state.last_signaled);
}

#[test]
fn test_resize_forwards_to_context() {
    let mut renderer = initialized();

    renderer.resize(800, 600).unwrap();
    let context = renderer.context().unwrap();
    assert_eq!((context.width(), context.height()), (800, 600));

    // Minimized window
    renderer.resize(0, 0).unwrap();
    let context = renderer.context().unwrap();
    assert_eq!((context.width(), context.height()), (800, 600));

    renderer.render_frame().unwrap();
}
