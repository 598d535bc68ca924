//! Identifiers and a simple allocator for core entities.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub u32);

/// Monotonic actor-id allocator owned by a Timeline instance. Ids are
/// opaque externally and never shared across engine instances; keyframe
/// ids come from a per-actor counter instead.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_actor: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_actor(&mut self) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor = self.next_actor.wrapping_add(1);
        id
    }

    /// Advance the counter so future allocations never collide with ids
    /// reconstructed from an export.
    #[inline]
    pub fn reserve_through(&mut self, actor: ActorId) {
        if actor.0 >= self.next_actor {
            self.next_actor = actor.0.wrapping_add(1);
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_actor(), ActorId(0));
        assert_eq!(alloc.alloc_actor(), ActorId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_actor(), ActorId(0));
    }

    #[test]
    fn reserve_skips_imported_ids() {
        let mut alloc = IdAllocator::new();
        alloc.reserve_through(ActorId(4));
        assert_eq!(alloc.alloc_actor(), ActorId(5));
    }
}
