/*!
# Triangle Engine

Core traits and types for a Direct3D 12 style "hello triangle" renderer.

The crate owns the per-frame recording contract: every frame resets its
command list, brackets its commands between a PRESENT -> RENDER_TARGET barrier
and the reverse barrier, submits, presents and signals a fence. The GPU API is
reached through backend traits, so the sequence runs against real hardware
(`triangle_engine_renderer_d3d12`) or against the mock backend used by the
unit tests.

## Architecture

- **GraphicsDevice**: Factory trait for every GPU object
- **Swapchain / CommandList / CommandQueue / Fence / DescriptorHeap / Pipeline**: Backend object traits
- **ResourceStateTracker**: CPU-side record of back-buffer states, validates barriers
- **GraphicsContext**: Exclusive owner of the GPU objects
- **FrameRenderer**: The frame sequence
- **TriangleRenderer**: initialize / render / resize / cleanup lifecycle
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod renderer;
pub mod frame;

// Main triangle namespace module
pub mod triangle {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Lifecycle entry point
    pub use crate::frame::TriangleRenderer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with backend traits and configuration
    pub mod render {
        pub use crate::renderer::*;
    }

    // Frame sub-module
    pub mod frame {
        pub use crate::frame::*;
    }
}

// Re-export math library at crate root
pub use glam;
