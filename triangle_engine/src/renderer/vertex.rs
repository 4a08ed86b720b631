/// Vertex layout of the triangle pipeline

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::renderer::Format;

/// Position + RGBA color, tightly packed (28 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Byte stride between consecutive vertices
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;

    /// Input layout matching the `POSITION` / `COLOR` shader inputs
    pub const LAYOUT: [InputElement; 2] = [
        InputElement { semantic: "POSITION", format: Format::R32G32B32_FLOAT, offset: 0 },
        InputElement { semantic: "COLOR", format: Format::R32G32B32A32_FLOAT, offset: 12 },
    ];
}

/// One element of the input-assembler layout (semantic index 0, slot 0, per-vertex)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputElement {
    /// HLSL semantic name
    pub semantic: &'static str,
    pub format: Format,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
}

/// Default triangle: red top, green bottom-right, blue bottom-left
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new(Vec3::new(0.0, 0.5, 0.0), [1.0, 0.0, 0.0, 1.0]),
    Vertex::new(Vec3::new(0.5, -0.5, 0.0), [0.0, 1.0, 0.0, 1.0]),
    Vertex::new(Vec3::new(-0.5, -0.5, 0.0), [0.0, 0.0, 1.0, 1.0]),
];

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
