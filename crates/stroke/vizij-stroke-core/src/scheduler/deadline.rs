//! Min-heap of ACTIVE deadlines.
//!
//! Only used to answer "which animation finishes next" in O(log K); the tick
//! never relies on it for completion. Entries are removed lazily: stale ones
//! are discarded when they reach the top.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::ids::AnimationId;

#[derive(Debug, Clone, Copy)]
struct DeadlineKey {
    deadline: f64,
    id: AnimationId,
}

impl PartialEq for DeadlineKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DeadlineKey {}

impl PartialOrd for DeadlineKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeadlineKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .total_cmp(&other.deadline)
            .then(self.id.cmp(&other.id))
    }
}

#[derive(Debug, Default, Clone)]
pub struct DeadlineQueue {
    heap: BinaryHeap<Reverse<DeadlineKey>>,
}

impl DeadlineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: AnimationId, deadline: f64) {
        self.heap.push(Reverse(DeadlineKey { deadline, id }));
    }

    /// Earliest live deadline; `is_live` decides whether a heap entry still
    /// describes an ACTIVE animation.
    pub fn peek_live(&mut self, mut is_live: impl FnMut(AnimationId) -> bool) -> Option<(AnimationId, f64)> {
        while let Some(Reverse(top)) = self.heap.peek().copied() {
            if is_live(top.id) {
                return Some((top.id, top.deadline));
            }
            self.heap.pop();
        }
        None
    }

    /// Drop entries due at or before `now` that are no longer live.
    pub fn prune(&mut self, now: f64, mut is_live: impl FnMut(AnimationId) -> bool) {
        while let Some(Reverse(top)) = self.heap.peek().copied() {
            if top.deadline > now || is_live(top.id) {
                break;
            }
            self.heap.pop();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
