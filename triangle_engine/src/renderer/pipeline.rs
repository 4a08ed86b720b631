/// Pipeline trait and pipeline descriptor

use std::any::Any;
use crate::renderer::{ShaderSource, InputElement, Format, Vertex, PrimitiveTopology};

/// GPU view of a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferView {
    /// GPU virtual address of the first vertex
    pub gpu_address: u64,
    /// Total size of the buffer in bytes
    pub size_in_bytes: u32,
    /// Size of one vertex in bytes
    pub stride_in_bytes: u32,
}

/// Graphics pipeline descriptor
#[derive(Debug, Clone, Copy)]
pub struct PipelineDesc<'a> {
    pub vertex_shader: &'a ShaderSource,
    pub pixel_shader: &'a ShaderSource,
    /// Input-assembler layout (one element per shader input)
    pub input_layout: &'a [InputElement],
    /// Format of the single render target
    pub render_target_format: Format,
    /// Vertices uploaded into the pipeline's vertex buffer
    pub vertices: &'a [Vertex],
    pub topology: PrimitiveTopology,
}

/// Root signature + pipeline state object + the vertex buffer it draws
///
/// Created once with the graphics context and bound every frame.
pub trait Pipeline: Send {
    fn vertex_buffer_view(&self) -> VertexBufferView;

    /// Number of vertices in the vertex buffer
    fn vertex_count(&self) -> u32;

    fn topology(&self) -> PrimitiveTopology;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}
