/// GPU resources, resource states and transition barriers

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identifier of a GPU resource
///
/// Backends allocate one per resource wrapper with `ResourceId::allocate()`.
/// The state tracker keys on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Allocate a fresh id
    pub fn allocate() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Usage role of a resource, as seen by the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Owned by the presentation engine (being displayed)
    Present,
    /// Bound as a color output
    RenderTarget,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceState::Present => write!(f, "PRESENT"),
            ResourceState::RenderTarget => write!(f, "RENDER_TARGET"),
        }
    }
}

/// A GPU resource (back-buffer image, buffer, ...)
pub trait GpuResource: Send + Sync {
    /// Stable id of this resource
    fn id(&self) -> ResourceId;

    /// Downcasting hook for backends
    fn as_any(&self) -> &dyn Any;
}

/// Resource-state transition barrier
///
/// Tells the GPU a resource changes its usage role between two commands.
#[derive(Clone)]
pub struct TransitionBarrier {
    /// Resource being transitioned
    pub resource: Arc<dyn GpuResource>,
    /// State the resource is in before the barrier
    pub before: ResourceState,
    /// State the resource is in after the barrier
    pub after: ResourceState,
}

impl TransitionBarrier {
    /// Create a transition barrier
    pub fn new(resource: Arc<dyn GpuResource>, before: ResourceState, after: ResourceState) -> Self {
        Self { resource, before, after }
    }

    /// Same resource, before/after swapped
    pub fn reversed(&self) -> Self {
        Self {
            resource: Arc::clone(&self.resource),
            before: self.after,
            after: self.before,
        }
    }

    /// Id of the transitioned resource
    pub fn resource_id(&self) -> ResourceId {
        self.resource.id()
    }
}

impl fmt::Debug for TransitionBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionBarrier")
            .field("resource", &self.resource.id())
            .field("before", &self.before)
            .field("after", &self.after)
            .finish()
    }
}
