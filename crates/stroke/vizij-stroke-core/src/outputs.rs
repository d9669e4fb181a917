//! Output contracts from the scheduler.
//!
//! The record buffer is the data output of a tick; `TickOutputs` carries the
//! semantic lifecycle events so launchers can react without diffing slots.

use serde::{Deserialize, Serialize};

use crate::ids::{AnimationId, Slot};

/// Discrete lifecycle signals emitted during `Scheduler::tick`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SchedulerEvent {
    /// Entry moved from PENDING to ACTIVE and claimed `slot`.
    Admitted {
        id: AnimationId,
        slot: Slot,
        start_time: f64,
    },
    /// Entry reached `phase = 1`; `slot` is free again.
    Completed { id: AnimationId, slot: Slot },
    /// A cancelled ACTIVE entry released its slot this tick.
    Cancelled { id: AnimationId, slot: Slot },
    /// `tick` was called with a time earlier than the previous tick.
    ClockRewound { requested: f64, kept: f64 },
}

/// Outputs returned by `Scheduler::tick()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TickOutputs {
    /// Scheduler clock after the tick (seconds).
    pub time: f64,
    /// Time advanced by this tick.
    pub delta: f64,
    #[serde(default)]
    pub events: Vec<SchedulerEvent>,
}

impl TickOutputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: SchedulerEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn completed(&self) -> impl Iterator<Item = AnimationId> + '_ {
        self.events.iter().filter_map(|e| match e {
            SchedulerEvent::Completed { id, .. } => Some(*id),
            _ => None,
        })
    }

    pub fn admitted(&self) -> impl Iterator<Item = (AnimationId, Slot)> + '_ {
        self.events.iter().filter_map(|e| match e {
            SchedulerEvent::Admitted { id, slot, .. } => Some((*id, *slot)),
            _ => None,
        })
    }
}
