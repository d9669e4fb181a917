//! Fixed arena of `K` slots with explicit free-list management.
//!
//! A slot is claimed by exactly one animation while it is ACTIVE and goes
//! back on the free list the moment it is released, so it can be reclaimed
//! within the same tick.

use crate::ids::{AnimationId, Slot};

#[derive(Debug, Clone)]
pub struct SlotTable {
    occupants: Vec<Option<AnimationId>>,
    /// Stack of free slot indices; the top is handed out next.
    free: Vec<u32>,
}

impl SlotTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            occupants: vec![None; capacity],
            free: (0..capacity as u32).rev().collect(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.occupants.len()
    }

    #[inline]
    pub fn occupied(&self) -> usize {
        self.occupants.len() - self.free.len()
    }

    #[inline]
    pub fn has_free(&self) -> bool {
        !self.free.is_empty()
    }

    /// Bind `id` to the next free slot.
    pub fn claim(&mut self, id: AnimationId) -> Option<Slot> {
        let index = self.free.pop()?;
        debug_assert!(self.occupants[index as usize].is_none());
        self.occupants[index as usize] = Some(id);
        Some(Slot(index))
    }

    /// Free `slot`, returning its previous occupant.
    pub fn release(&mut self, slot: Slot) -> Option<AnimationId> {
        let prev = self.occupants.get_mut(slot.index())?.take();
        if prev.is_some() {
            self.free.push(slot.0);
        }
        prev
    }

    #[inline]
    pub fn occupant(&self, slot: Slot) -> Option<AnimationId> {
        self.occupants.get(slot.index()).copied().flatten()
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, AnimationId)> + '_ {
        self.occupants
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.map(|id| (Slot(i as u32), id)))
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.capacity());
    }
}
