//! Reveal/Interpolation Kernel.
//!
//! One unit of work per `(slot, point)` pair, `global = slot * N + point`.
//! Units share no mutable state; each reads its slot's record and two bank
//! rows and writes exactly one `InstanceTransform`.
//!
//! Per unit:
//! - inactive slot -> culled
//! - `progress = point / N`
//! - `reveal = clamp(phaser(phase, lead, e), 0, max_reveal)` where `lead` is
//!   `1 - progress` (FromStart) or `progress` (FromEnd)
//! - `reveal <= epsilon` -> culled
//! - blend bank rows A/B at `progress` by `interpolation_t`, place at
//!   `start + p * scale`, map to device space, size marker by `reveal`

use rayon::prelude::*;

use crate::bank::StrokeBank;
use crate::config::{Config, Execution, KernelConfig, RevealDirection};
use crate::error::{Result, StrokeError};
use crate::interp::lerp_vec2;
use crate::record::{FrameParams, InstanceTransform, LaunchRecord};

/// Soft reveal wavefront.
///
/// `phase` is the animation phase, `progress` the point's position along the
/// wavefront and `edge` the wavefront width. Nondecreasing in `phase` and
/// `progress`; `phaser(1, p, e) == 1` for every `p` in [0,1].
#[inline]
pub fn phaser(phase: f32, progress: f32, edge: f32) -> f32 {
    ((progress - 1.0 + phase * (1.0 + edge)) / edge).clamp(0.0, 1.0)
}

/// Drawing-space (pixels, Y down) to device space ([-1,1], Y up).
#[inline]
pub fn canvas_to_device(point: [f32; 2], width: f32, height: f32) -> [f32; 2] {
    let w = if width > 0.0 { width } else { 1.0 };
    let h = if height > 0.0 { height } else { 1.0 };
    [point[0] / w * 2.0 - 1.0, 1.0 - point[1] / h * 2.0]
}

/// Inverse of [`canvas_to_device`].
#[inline]
pub fn device_to_canvas(point: [f32; 2], width: f32, height: f32) -> [f32; 2] {
    let w = if width > 0.0 { width } else { 1.0 };
    let h = if height > 0.0 { height } else { 1.0 };
    [(point[0] + 1.0) * 0.5 * w, (1.0 - point[1]) * 0.5 * h]
}

#[derive(Debug, Clone)]
pub struct RevealKernel {
    cfg: KernelConfig,
    point_count: usize,
    max_slots: usize,
}

impl RevealKernel {
    pub fn new(cfg: &Config) -> Result<Self> {
        cfg.kernel.validate()?;
        Ok(Self {
            cfg: cfg.kernel.clone(),
            point_count: cfg.point_count,
            max_slots: cfg.max_slots,
        })
    }

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.cfg
    }

    /// `K * N`.
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.max_slots * self.point_count
    }

    /// Initialization-time check that the bank rows are `N` wide.
    pub fn check_bank(&self, bank: &StrokeBank) -> Result<()> {
        if bank.point_count() != self.point_count {
            return Err(StrokeError::ConfigMismatch {
                what: "point_count",
                left: self.point_count,
                right: bank.point_count(),
            });
        }
        Ok(())
    }

    /// Evaluate a single unit by its global index.
    pub fn evaluate(
        &self,
        global_index: usize,
        records: &[LaunchRecord],
        bank: &StrokeBank,
        params: &FrameParams,
    ) -> InstanceTransform {
        let slot = global_index / self.point_count;
        let point = global_index % self.point_count;
        self.evaluate_point(&records[slot], point, bank, params)
    }

    #[inline]
    fn evaluate_point(
        &self,
        record: &LaunchRecord,
        point_index: usize,
        bank: &StrokeBank,
        params: &FrameParams,
    ) -> InstanceTransform {
        if !record.is_active() {
            return InstanceTransform::CULLED;
        }
        let progress = point_index as f32 / self.point_count as f32;
        let lead = match self.cfg.direction {
            RevealDirection::FromStart => 1.0 - progress,
            RevealDirection::FromEnd => progress,
        };
        let edge = record.edge_width().unwrap_or(self.cfg.edge_width);
        let reveal = phaser(record.phase, lead, edge).clamp(0.0, self.cfg.max_reveal);
        if reveal <= self.cfg.reveal_epsilon {
            return InstanceTransform::CULLED;
        }

        let a = bank.sample(record.stroke_a as usize, progress);
        let b = bank.sample(record.stroke_b as usize, progress);
        let p = lerp_vec2(a, b, record.interpolation_t);
        let canvas = [
            record.start_x + p[0] * record.scale,
            record.start_y + p[1] * record.scale,
        ];
        let [x, y] = canvas_to_device(canvas, params.canvas_width, params.canvas_height);
        let size = self.cfg.marker_size * reveal;
        InstanceTransform::placed(x, y, size / params.aspect(), size)
    }

    fn fill_slot(
        &self,
        record: &LaunchRecord,
        row: &mut [InstanceTransform],
        bank: &StrokeBank,
        params: &FrameParams,
    ) {
        if !record.is_active() {
            row.fill(InstanceTransform::CULLED);
            return;
        }
        for (point, out) in row.iter_mut().enumerate() {
            *out = self.evaluate_point(record, point, bank, params);
        }
    }

    /// Run every unit, writing `out[slot * N + point]`. `records` must hold
    /// `K` entries and `out` `K * N`.
    pub fn dispatch(
        &self,
        params: &FrameParams,
        records: &[LaunchRecord],
        bank: &StrokeBank,
        out: &mut [InstanceTransform],
    ) {
        debug_assert_eq!(records.len(), self.max_slots);
        debug_assert_eq!(out.len(), self.unit_count());
        debug_assert_eq!(bank.point_count(), self.point_count);

        match self.cfg.execution {
            Execution::Parallel => out
                .par_chunks_mut(self.point_count)
                .zip(records.par_iter())
                .for_each(|(row, record)| self.fill_slot(record, row, bank, params)),
            Execution::Serial => out
                .chunks_mut(self.point_count)
                .zip(records)
                .for_each(|(row, record)| self.fill_slot(record, row, bank, params)),
        }
    }
}
