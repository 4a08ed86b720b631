/// CommandQueue and Fence traits - submission and CPU/GPU synchronization

use std::any::Any;
use crate::error::Result;
use crate::renderer::CommandList;

/// Monotonic 64-bit GPU completion counter
pub trait Fence: Send {
    /// Highest value the GPU has reached so far
    fn completed_value(&self) -> u64;

    /// Block the calling thread until `completed_value() >= value`
    ///
    /// Returns immediately when the value is already reached.
    fn wait_for(&self, value: u64) -> Result<()>;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}

/// Queue executing closed command lists in submission order
pub trait CommandQueue: Send {
    /// Submit closed command lists for execution
    ///
    /// # Arguments
    ///
    /// * `lists` - Command lists to execute (all must be `Closed`)
    fn execute(&mut self, lists: &[&dyn CommandList]) -> Result<()>;

    /// Ask the GPU to set `fence` to `value` once all prior work completes
    fn signal(&mut self, fence: &dyn Fence, value: u64) -> Result<()>;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}
