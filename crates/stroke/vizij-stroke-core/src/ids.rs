//! Identifiers and simple allocators for scheduler entities.

use serde::{Deserialize, Serialize};

/// Opaque handle returned by `Scheduler::add_animation`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u32);

/// Fixed position in the record/transform buffers, in `[0, K)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot(pub u32);

impl Slot {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AnimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

/// Monotonic allocator for AnimationId.
/// IDs are never tied to slots; a slot is reused, an id is not.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_anim: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_anim(&mut self) -> AnimationId {
        let id = AnimationId(self.next_anim);
        self.next_anim = self.next_anim.wrapping_add(1);
        id
    }

    /// True if `id` was handed out by this allocator (ignoring wrap-around).
    #[inline]
    pub fn was_issued(&self, id: AnimationId) -> bool {
        id.0 < self.next_anim
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
