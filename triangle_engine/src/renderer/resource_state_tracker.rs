/// CPU-side record of every tracked resource's current state
///
/// The GPU itself never reports resource states. Recording a barrier whose
/// `before` state differs from the real one is undefined behavior at the API
/// boundary, so every barrier goes through `transition()` first.

use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::renderer::{ResourceId, ResourceState, TransitionBarrier};
use crate::engine_bail;

const SOURCE: &str = "triangle::state_tracker";

#[derive(Debug, Default)]
pub struct ResourceStateTracker {
    states: FxHashMap<ResourceId, ResourceState>,
}

impl ResourceStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a resource in `state`. Re-registering overwrites.
    pub fn register(&mut self, id: ResourceId, state: ResourceState) {
        self.states.insert(id, state);
    }

    /// Stop tracking a resource. Returns its last state.
    pub fn unregister(&mut self, id: ResourceId) -> Option<ResourceState> {
        self.states.remove(&id)
    }

    pub fn state(&self, id: ResourceId) -> Option<ResourceState> {
        self.states.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// True when every tracked resource is in `state`
    pub fn all_in(&self, state: ResourceState) -> bool {
        self.states.values().all(|s| *s == state)
    }

    /// Validate a barrier against the tracked state and apply it
    pub fn transition(&mut self, barrier: &TransitionBarrier) -> Result<()> {
        let id = barrier.resource_id();

        if barrier.before == barrier.after {
            engine_bail!(SOURCE, InvalidResourceState,
                "Barrier on resource {} does not change state ({})", id, barrier.before);
        }

        let Some(current) = self.states.get_mut(&id) else {
            engine_bail!(SOURCE, InvalidResourceState,
                "Barrier on untracked resource {}", id);
        };

        if *current != barrier.before {
            engine_bail!(SOURCE, InvalidResourceState,
                "Resource {} is in {} but barrier expects {}", id, current, barrier.before);
        }

        *current = barrier.after;
        Ok(())
    }
}

#[cfg(test)]
#[path = "resource_state_tracker_tests.rs"]
mod tests;
