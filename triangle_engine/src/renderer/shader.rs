/// Shader sources and loading

use std::path::{Path, PathBuf};
use crate::error::Result;
use crate::engine_bail;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    /// Entry point of the bundled `basic.hlsl`
    pub fn basic_entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VSMain",
            ShaderStage::Pixel => "PSMain",
        }
    }

    /// Shader model 5.0 compile target
    pub fn target(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_5_0",
            ShaderStage::Pixel => "ps_5_0",
        }
    }
}

/// Where a shader comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    /// HLSL source file, compiled by the backend at pipeline creation
    Hlsl {
        path: PathBuf,
        entry_point: String,
        /// Compile target (e.g. "vs_5_0")
        target: String,
    },
    /// Precompiled bytecode blob (.cso)
    Bytecode {
        path: PathBuf,
    },
}

impl ShaderSource {
    /// Stage of the bundled `basic.hlsl` found in `shader_dir`
    pub fn basic_hlsl(shader_dir: impl AsRef<Path>, stage: ShaderStage) -> Self {
        ShaderSource::Hlsl {
            path: shader_dir.as_ref().join("basic.hlsl"),
            entry_point: stage.basic_entry_point().to_string(),
            target: stage.target().to_string(),
        }
    }

    /// Precompiled `basic_vs.cso` / `basic_ps.cso` found in `shader_dir`
    pub fn basic_bytecode(shader_dir: impl AsRef<Path>, stage: ShaderStage) -> Self {
        let file = match stage {
            ShaderStage::Vertex => "basic_vs.cso",
            ShaderStage::Pixel => "basic_ps.cso",
        };
        ShaderSource::Bytecode { path: shader_dir.as_ref().join(file) }
    }

    pub fn path(&self) -> &Path {
        match self {
            ShaderSource::Hlsl { path, .. } | ShaderSource::Bytecode { path } => path,
        }
    }

    /// Read the file contents (HLSL text or bytecode)
    ///
    /// Fails with `InvalidResource` when the file is missing, unreadable or empty.
    pub fn load(&self) -> Result<Vec<u8>> {
        let path = self.path();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => engine_bail!("triangle::shader", InvalidResource,
                "Failed to read shader '{}': {}", path.display(), e),
        };

        if bytes.is_empty() {
            engine_bail!("triangle::shader", InvalidResource,
                "Shader file '{}' is empty", path.display());
        }

        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
