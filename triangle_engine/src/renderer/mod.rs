/// Renderer module - backend traits and the types they exchange

// Module declarations
pub mod config;
pub mod format;
pub mod resource;
pub mod resource_state_tracker;
pub mod descriptor_heap;
pub mod command_list;
pub mod command_queue;
pub mod swapchain;
pub mod shader;
pub mod vertex;
pub mod pipeline;
pub mod graphics_device;

#[cfg(test)]
pub(crate) mod mock_graphics_device;

// Re-export everything
pub use config::*;
pub use format::*;
pub use resource::*;
pub use resource_state_tracker::*;
pub use descriptor_heap::*;
pub use command_list::*;
pub use command_queue::*;
pub use swapchain::*;
pub use shader::*;
pub use vertex::*;
pub use pipeline::*;
pub use graphics_device::*;
