//! Animation Scheduler: admits, advances and retires launch requests under a
//! hard bound of `K` ACTIVE entries, and rewrites the record buffer once per
//! tick.
//!
//! Lifecycle: `Pending -> Active -> Completed`, with `Cancelled` reachable
//! from either non-terminal state.
//!
//! Tick order:
//! 1) release slots of ACTIVE entries cancelled since the last tick
//! 2) advance elapsed time/phase of every ACTIVE entry; entries reaching
//!    `phase = 1` complete and free their slot immediately
//! 3) fill free slots from the pending queue in submission order
//! 4) serialize all `K` slots into the record buffer

pub mod deadline;
pub mod launch;
pub mod slots;

use std::collections::VecDeque;

use hashbrown::HashMap;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Result, StrokeError};
use crate::ids::{AnimationId, IdAllocator, Slot};
use crate::outputs::{SchedulerEvent, TickOutputs};
use crate::record::LaunchRecord;

pub use deadline::DeadlineQueue;
pub use launch::LaunchConfig;
pub use slots::SlotTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl AnimationState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Snapshot for launcher UIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    /// Occupied slots.
    pub active: usize,
    pub pending: usize,
    /// `K`.
    pub capacity: usize,
    pub max_pending: Option<usize>,
    /// `add_animation` would admit or queue rather than reject.
    pub can_accept: bool,
}

/// Live (PENDING or ACTIVE) entry.
#[derive(Debug, Clone)]
struct Entry {
    config: LaunchConfig,
    state: AnimationState,
    submitted_at: f64,
    start_time: f64,
    deadline: f64,
    elapsed: f64,
    phase: f32,
    slot: Option<Slot>,
    /// ACTIVE entry cancelled since the last tick; its slot is released at the
    /// next tick.
    cancel_requested: bool,
}

impl Entry {
    fn pending(config: LaunchConfig, submitted_at: f64) -> Self {
        Self {
            config,
            state: AnimationState::Pending,
            submitted_at,
            start_time: submitted_at,
            deadline: f64::INFINITY,
            elapsed: 0.0,
            phase: 0.0,
            slot: None,
            cancel_requested: false,
        }
    }

    fn activate(&mut self, slot: Slot, now: f64) {
        self.state = AnimationState::Active;
        self.slot = Some(slot);
        self.start_time = now - self.config.elapsed_time as f64;
        self.deadline = self.start_time + self.config.total_duration as f64;
        self.advance(now);
    }

    /// Recompute elapsed/phase at `now`; phase never moves backwards.
    fn advance(&mut self, now: f64) {
        self.elapsed = (now - self.start_time).max(0.0);
        let phase = (self.elapsed / self.config.total_duration as f64).clamp(0.0, 1.0) as f32;
        self.phase = self.phase.max(phase);
    }

    fn visible_state(&self) -> AnimationState {
        if self.cancel_requested {
            AnimationState::Cancelled
        } else {
            self.state
        }
    }

    fn is_live_active(&self) -> bool {
        self.state == AnimationState::Active && !self.cancel_requested
    }

    fn to_record(&self) -> LaunchRecord {
        let cfg = &self.config;
        LaunchRecord {
            stroke_a: cfg.stroke_a as f32,
            stroke_b: cfg.stroke_b as f32,
            interpolation_t: cfg.interpolation_t,
            total_duration: cfg.total_duration,
            elapsed_time: self.elapsed as f32,
            start_x: cfg.start_point[0],
            start_y: cfg.start_point[1],
            scale: cfg.scale,
            active: 1.0,
            phase: self.phase,
            reserved1: cfg.edge_width.unwrap_or(0.0),
            reserved2: 0.0,
        }
    }
}

enum SlotOutcome {
    Running,
    Completed,
    Cancelled,
}

#[derive(Debug)]
pub struct Scheduler {
    max_slots: usize,
    bank_capacity: usize,
    max_pending: Option<usize>,
    min_duration: f32,
    retain_finished: usize,

    now: f64,
    ids: IdAllocator,
    entries: HashMap<AnimationId, Entry>,
    pending: VecDeque<AnimationId>,
    slots: SlotTable,
    deadlines: Option<DeadlineQueue>,

    finished: HashMap<AnimationId, AnimationState>,
    finished_order: VecDeque<AnimationId>,

    // Per-tick outputs
    records: Vec<LaunchRecord>,
    staged: Vec<SchedulerEvent>,
    outputs: TickOutputs,
}

impl Scheduler {
    /// Fails when `cfg` does not pass [`Config::validate`].
    pub fn new(cfg: &Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            max_slots: cfg.max_slots,
            bank_capacity: cfg.bank_capacity,
            max_pending: cfg.max_pending,
            min_duration: cfg.min_duration,
            retain_finished: cfg.retain_finished,
            now: 0.0,
            ids: IdAllocator::new(),
            entries: HashMap::with_capacity(cfg.max_slots),
            pending: VecDeque::new(),
            slots: SlotTable::new(cfg.max_slots),
            deadlines: cfg.track_deadlines.then(DeadlineQueue::new),
            finished: HashMap::new(),
            finished_order: VecDeque::new(),
            records: vec![LaunchRecord::INACTIVE; cfg.max_slots],
            staged: Vec::new(),
            outputs: TickOutputs::default(),
        })
    }

    /// Scheduler clock: time of the latest tick (seconds).
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// `K`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_slots
    }

    /// Submit a launch. Admits it into a free slot right away, queues it
    /// behind earlier submissions, or rejects it when the pending bound is
    /// reached. A rejected call leaves the scheduler untouched.
    pub fn add_animation(&mut self, config: LaunchConfig) -> Result<AnimationId> {
        let config = config.validated(self.bank_capacity, self.min_duration)?;

        let admit_now = self.pending.is_empty() && self.slots.has_free();
        if !admit_now {
            if let Some(limit) = self.max_pending {
                if self.pending.len() >= limit {
                    return Err(StrokeError::CapacityExceeded {
                        active: self.slots.occupied(),
                        pending: self.pending.len(),
                        limit,
                    });
                }
            }
        }

        let id = self.ids.alloc_anim();
        let mut entry = Entry::pending(config, self.now);
        if admit_now {
            if let Some(slot) = self.slots.claim(id) {
                entry.activate(slot, self.now);
                debug!("scheduler: {id} admitted into slot {}", slot.0);
                self.staged.push(SchedulerEvent::Admitted {
                    id,
                    slot,
                    start_time: entry.start_time,
                });
                if entry.phase >= 1.0 {
                    self.slots.release(slot);
                    self.retire(id, AnimationState::Completed);
                    debug!("scheduler: {id} completed on admission");
                    self.staged.push(SchedulerEvent::Completed { id, slot });
                    return Ok(id);
                }
                self.push_deadline(id, entry.deadline);
            }
        }
        if entry.state == AnimationState::Pending {
            debug!("scheduler: {id} queued ({} pending)", self.pending.len() + 1);
            self.pending.push_back(id);
        }
        self.entries.insert(id, entry);
        Ok(id)
    }

    /// Cancel an entry. PENDING entries leave the queue at once; ACTIVE ones
    /// keep their slot until the next tick. Returns `false` when the entry had
    /// already finished or was already cancelled.
    pub fn cancel(&mut self, id: AnimationId) -> Result<bool> {
        let Some(entry) = self.entries.get_mut(&id) else {
            return if self.ids.was_issued(id) {
                Ok(false)
            } else {
                Err(StrokeError::UnknownAnimation { id })
            };
        };
        let state = entry.state;
        match state {
            AnimationState::Pending => {
                if let Some(pos) = self.pending.iter().position(|p| *p == id) {
                    self.pending.remove(pos);
                }
                self.entries.remove(&id);
                self.retire(id, AnimationState::Cancelled);
                debug!("scheduler: {id} cancelled while pending");
                Ok(true)
            }
            AnimationState::Active if !entry.cancel_requested => {
                entry.cancel_requested = true;
                debug!("scheduler: {id} cancelled, slot released next tick");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Cancel every live entry; returns how many changed state.
    pub fn cancel_all(&mut self) -> usize {
        let ids: Vec<AnimationId> = self.entries.keys().copied().collect();
        ids.into_iter()
            .filter(|id| matches!(self.cancel(*id), Ok(true)))
            .count()
    }

    /// Advance to `current_time` and rewrite the record buffer.
    pub fn tick(&mut self, current_time: f64) -> &TickOutputs {
        self.outputs.clear();
        self.outputs.events.append(&mut self.staged);

        let mut now = current_time;
        if !now.is_finite() || now < self.now {
            warn!(
                "scheduler: tick({current_time}) is behind the clock at {}; holding time",
                self.now
            );
            self.outputs.push_event(SchedulerEvent::ClockRewound {
                requested: current_time,
                kept: self.now,
            });
            now = self.now;
        }
        self.outputs.delta = now - self.now;
        self.outputs.time = now;
        self.now = now;

        // 1) + 2) release cancelled slots, advance and complete.
        for index in 0..self.max_slots {
            let slot = Slot(index as u32);
            let Some(id) = self.slots.occupant(slot) else {
                continue;
            };
            let outcome = match self.entries.get_mut(&id) {
                Some(entry) if entry.cancel_requested => SlotOutcome::Cancelled,
                Some(entry) => {
                    entry.advance(now);
                    if entry.phase >= 1.0 {
                        SlotOutcome::Completed
                    } else {
                        SlotOutcome::Running
                    }
                }
                // Orphaned slot; cannot happen through the public API.
                None => SlotOutcome::Cancelled,
            };
            match outcome {
                SlotOutcome::Running => {}
                SlotOutcome::Completed => {
                    self.slots.release(slot);
                    self.entries.remove(&id);
                    self.retire(id, AnimationState::Completed);
                    debug!("scheduler: {id} completed, slot {index} free");
                    self.outputs
                        .push_event(SchedulerEvent::Completed { id, slot });
                }
                SlotOutcome::Cancelled => {
                    self.slots.release(slot);
                    self.entries.remove(&id);
                    self.retire(id, AnimationState::Cancelled);
                    self.outputs
                        .push_event(SchedulerEvent::Cancelled { id, slot });
                }
            }
        }

        // 3) admit pending entries in FIFO order.
        while self.slots.has_free() {
            let Some(id) = self.pending.pop_front() else {
                break;
            };
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            let Some(slot) = self.slots.claim(id) else {
                self.pending.push_front(id);
                break;
            };
            entry.activate(slot, now);
            let (start_time, deadline, waited, phase) = (
                entry.start_time,
                entry.deadline,
                now - entry.submitted_at,
                entry.phase,
            );
            debug!(
                "scheduler: {id} admitted into slot {} after {waited:.3}s pending",
                slot.0
            );
            self.outputs.push_event(SchedulerEvent::Admitted {
                id,
                slot,
                start_time,
            });
            // Elapsed offset already covers the whole duration: complete now
            // so the entry is never serialized, and offer the slot onwards.
            if phase >= 1.0 {
                self.slots.release(slot);
                self.entries.remove(&id);
                self.retire(id, AnimationState::Completed);
                debug!("scheduler: {id} completed on admission, slot {} free", slot.0);
                self.outputs
                    .push_event(SchedulerEvent::Completed { id, slot });
                continue;
            }
            self.push_deadline(id, deadline);
        }

        if let Some(deadlines) = self.deadlines.as_mut() {
            let entries = &self.entries;
            deadlines.prune(now, |id| entries.get(&id).is_some_and(Entry::is_live_active));
        }

        // 4) serialize every slot.
        self.serialize_records();

        trace!(
            "scheduler: tick t={now:.4} active={} pending={} events={}",
            self.slots.occupied(),
            self.pending.len(),
            self.outputs.events.len()
        );
        &self.outputs
    }

    fn serialize_records(&mut self) {
        for (index, record) in self.records.iter_mut().enumerate() {
            *record = self
                .slots
                .occupant(Slot(index as u32))
                .and_then(|id| self.entries.get(&id))
                .map(Entry::to_record)
                .unwrap_or(LaunchRecord::INACTIVE);
        }
    }

    fn push_deadline(&mut self, id: AnimationId, deadline: f64) {
        if let Some(deadlines) = self.deadlines.as_mut() {
            deadlines.push(id, deadline);
        }
    }

    fn retire(&mut self, id: AnimationId, state: AnimationState) {
        if self.retain_finished == 0 {
            return;
        }
        self.finished.insert(id, state);
        self.finished_order.push_back(id);
        while self.finished_order.len() > self.retain_finished {
            if let Some(old) = self.finished_order.pop_front() {
                self.finished.remove(&old);
            }
        }
    }

    /// Lifecycle state; `None` for unknown ids and for finished entries
    /// evicted from the retained history.
    pub fn state(&self, id: AnimationId) -> Option<AnimationState> {
        self.entries
            .get(&id)
            .map(Entry::visible_state)
            .or_else(|| self.finished.get(&id).copied())
    }

    /// Slot currently held by `id`.
    pub fn slot_of(&self, id: AnimationId) -> Option<Slot> {
        self.entries.get(&id).and_then(|e| e.slot)
    }

    /// Phase as of the latest tick (or admission).
    pub fn phase_of(&self, id: AnimationId) -> Option<f32> {
        self.entries.get(&id).map(|e| e.phase)
    }

    /// Occupied slots in slot order.
    pub fn active_slots(&self) -> impl Iterator<Item = (Slot, AnimationId)> + '_ {
        self.slots.iter()
    }

    /// Earliest deadline among live ACTIVE entries.
    pub fn next_deadline(&mut self) -> Option<(AnimationId, f64)> {
        let entries = &self.entries;
        match self.deadlines.as_mut() {
            Some(deadlines) => {
                deadlines.peek_live(|id| entries.get(&id).is_some_and(Entry::is_live_active))
            }
            None => entries
                .iter()
                .filter(|(_, e)| e.is_live_active())
                .map(|(id, e)| (*id, e.deadline))
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))),
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        let active = self.slots.occupied();
        let pending = self.pending.len();
        let can_accept = (pending == 0 && self.slots.has_free())
            || self.max_pending.map_or(true, |limit| pending < limit);
        SchedulerStatus {
            active,
            pending,
            capacity: self.max_slots,
            max_pending: self.max_pending,
            can_accept,
        }
    }

    /// Record buffer as of the latest tick, one record per slot.
    #[inline]
    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    #[inline]
    pub fn records_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    /// Outputs of the latest tick.
    #[inline]
    pub fn outputs(&self) -> &TickOutputs {
        &self.outputs
    }

    /// Drop every entry and restart the clock at zero.
    pub fn reset(&mut self) {
        self.now = 0.0;
        self.ids.reset();
        self.entries.clear();
        self.pending.clear();
        self.slots.clear();
        if let Some(deadlines) = self.deadlines.as_mut() {
            deadlines.clear();
        }
        self.finished.clear();
        self.finished_order.clear();
        self.records.fill(LaunchRecord::INACTIVE);
        self.staged.clear();
        self.outputs = TickOutputs::default();
    }
}
