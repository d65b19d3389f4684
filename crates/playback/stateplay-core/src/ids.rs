//! Identifiers and a simple allocator for authored states.

use serde::{Deserialize, Serialize};

/// Opaque handle for an authored state loaded into the engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StateId(pub u32);

/// Monotonic allocator for StateId.
/// Dense indices keep the library cache-friendly; ids are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_state: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_state(&mut self) -> StateId {
        let id = StateId(self.next_state);
        self.next_state = self.next_state.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
