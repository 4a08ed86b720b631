/// CommandAllocator and CommandList traits - for recording one frame of GPU commands

use std::any::Any;
use std::fmt;
use crate::error::Result;
use crate::renderer::{TransitionBarrier, CpuDescriptorHandle, Pipeline, VertexBufferView};
use crate::engine_bail;

/// Recording state of a command list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandListState {
    /// Immutable; may be submitted or reset
    Closed,
    /// Accepting commands; must be closed before submission
    Recording,
}

impl fmt::Display for CommandListState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandListState::Closed => write!(f, "Closed"),
            CommandListState::Recording => write!(f, "Recording"),
        }
    }
}

/// Fail with `InvalidCommandListState` unless `state` is `Recording`
///
/// Backends call this at the top of every recording method.
pub fn ensure_recording(state: CommandListState, operation: &str) -> Result<()> {
    if state != CommandListState::Recording {
        engine_bail!("triangle::command_list", InvalidCommandListState,
            "{} requires a recording command list (state: {})", operation, state);
    }
    Ok(())
}

/// Backing memory for recorded commands
///
/// One allocator per back-buffer. Resetting it while the GPU still executes
/// commands recorded from it is invalid; the caller must wait on the fence first.
pub trait CommandAllocator: Send {
    /// Reclaim the memory of all commands recorded from this allocator
    fn reset(&mut self) -> Result<()>;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}

/// Command list for recording rendering commands
///
/// Lifecycle: `reset` (Closed -> Recording), record, `close` (Recording -> Closed),
/// then submit through `CommandQueue::execute`.
pub trait CommandList: Send {
    /// Current recording state
    fn state(&self) -> CommandListState;

    /// Start a new recording against an allocator
    ///
    /// # Arguments
    ///
    /// * `allocator` - Allocator that backs the new commands (must be reset already)
    /// * `pipeline` - Initial pipeline state, if any
    ///
    /// Fails with `InvalidCommandListState` while the list is still recording.
    fn reset(&mut self, allocator: &dyn CommandAllocator, pipeline: Option<&dyn Pipeline>) -> Result<()>;

    /// Record resource-state transition barriers
    fn resource_barrier(&mut self, barriers: &[TransitionBarrier]) -> Result<()>;

    /// Bind a single render target for the output-merger stage
    fn set_render_target(&mut self, rtv: CpuDescriptorHandle) -> Result<()>;

    /// Clear a render target to a solid color
    ///
    /// # Arguments
    ///
    /// * `rtv` - Render-target view descriptor
    /// * `color` - RGBA clear color
    fn clear_render_target(&mut self, rtv: CpuDescriptorHandle, color: [f32; 4]) -> Result<()>;

    /// Bind the root signature of a pipeline
    fn set_graphics_root_signature(&mut self, pipeline: &dyn Pipeline) -> Result<()>;

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) -> Result<()>;

    /// Bind a vertex buffer at slot 0
    fn bind_vertex_buffer(&mut self, view: &VertexBufferView) -> Result<()>;

    /// Draw non-indexed, instanced primitives
    ///
    /// # Arguments
    ///
    /// * `vertex_count` - Number of vertices per instance
    /// * `instance_count` - Number of instances
    /// * `first_vertex` - Index of first vertex
    /// * `first_instance` - Index of first instance
    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) -> Result<()>;

    /// Finish recording. Fails when the list is already closed.
    fn close(&mut self) -> Result<()>;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}

/// Viewport dimensions and depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Full-surface viewport with depth range [0, 1]
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// 2D rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Primitive assembly topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    LineList,
    PointList,
}
