/// Renderer configuration

use std::path::Path;
use bitflags::bitflags;
use glam::Vec4;
use crate::error::Result;
use crate::renderer::{ShaderSource, ShaderStage, Vertex, PrimitiveTopology, TRIANGLE_VERTICES};
use crate::engine_bail;

bitflags! {
    /// Native debug/validation layers to enable at device creation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValidationFlags: u32 {
        /// API debug layer (message output on misuse)
        const DEBUG_LAYER = 1 << 0;
        /// GPU-based validation (slow; implies DEBUG_LAYER)
        const GPU_BASED_VALIDATION = 1 << 1;
    }
}

/// Shaders and geometry of the optional draw pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub vertex_shader: ShaderSource,
    pub pixel_shader: ShaderSource,
    pub vertices: Vec<Vertex>,
    pub topology: PrimitiveTopology,
}

impl PipelineConfig {
    /// Default triangle compiled from `shader_dir/basic.hlsl`
    pub fn basic_hlsl(shader_dir: impl AsRef<Path>) -> Self {
        let dir = shader_dir.as_ref();
        Self {
            vertex_shader: ShaderSource::basic_hlsl(dir, ShaderStage::Vertex),
            pixel_shader: ShaderSource::basic_hlsl(dir, ShaderStage::Pixel),
            vertices: TRIANGLE_VERTICES.to_vec(),
            topology: PrimitiveTopology::TriangleList,
        }
    }

    /// Default triangle from precompiled `basic_vs.cso` / `basic_ps.cso`
    pub fn basic_bytecode(shader_dir: impl AsRef<Path>) -> Self {
        let dir = shader_dir.as_ref();
        Self {
            vertex_shader: ShaderSource::basic_bytecode(dir, ShaderStage::Vertex),
            pixel_shader: ShaderSource::basic_bytecode(dir, ShaderStage::Pixel),
            vertices: TRIANGLE_VERTICES.to_vec(),
            topology: PrimitiveTopology::TriangleList,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Application name
    pub app_name: String,
    /// Initial swap-chain width
    pub width: u32,
    /// Initial swap-chain height
    pub height: u32,
    /// Number of back-buffers (2..=16)
    pub frame_count: u32,
    /// Color the render target is cleared to each frame
    pub clear_color: Vec4,
    /// Vertical blanks to wait at present (0..=4)
    pub sync_interval: u32,
    /// Enable validation/debug layers
    pub validation: ValidationFlags,
    /// Draw pipeline; `None` renders clear-only frames
    pub pipeline: Option<PipelineConfig>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            app_name: "Triangle Application".to_string(),
            width: 1280,
            height: 720,
            frame_count: 2,
            clear_color: Vec4::new(0.0, 0.2, 0.4, 1.0),
            sync_interval: 1,
            validation: if cfg!(debug_assertions) {
                ValidationFlags::DEBUG_LAYER
            } else {
                ValidationFlags::empty()
            },
            pipeline: None,
        }
    }
}

impl RendererConfig {
    pub const MIN_FRAME_COUNT: u32 = 2;
    pub const MAX_FRAME_COUNT: u32 = 16;
    pub const MAX_SYNC_INTERVAL: u32 = 4;

    /// Check the configuration before any GPU object is created
    ///
    /// Fails with `InitializationFailed`.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            engine_bail!("triangle::config", InitializationFailed,
                "Invalid surface size {}x{}", self.width, self.height);
        }
        if !(Self::MIN_FRAME_COUNT..=Self::MAX_FRAME_COUNT).contains(&self.frame_count) {
            engine_bail!("triangle::config", InitializationFailed,
                "frame_count must be in {}..={} (got {})",
                Self::MIN_FRAME_COUNT, Self::MAX_FRAME_COUNT, self.frame_count);
        }
        if self.sync_interval > Self::MAX_SYNC_INTERVAL {
            engine_bail!("triangle::config", InitializationFailed,
                "sync_interval must be <= {} (got {})", Self::MAX_SYNC_INTERVAL, self.sync_interval);
        }
        if self.pipeline.as_ref().is_some_and(|p| p.vertices.is_empty()) {
            engine_bail!("triangle::config", InitializationFailed, "Pipeline has no vertices");
        }
        Ok(())
    }

    /// Clear color as the RGBA array the command list takes
    pub fn clear_color_rgba(&self) -> [f32; 4] {
        self.clear_color.to_array()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
