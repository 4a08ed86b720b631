/// Frame module - GPU object ownership and the per-frame sequence

pub mod frame_sync;
pub mod graphics_context;
pub mod frame_renderer;
pub mod triangle_renderer;

pub use frame_sync::*;
pub use graphics_context::*;
pub use frame_renderer::*;
pub use triangle_renderer::*;
