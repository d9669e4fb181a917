//! Frame driver: tick → serialize → dispatch.
//!
//! `StrokeAnimator` owns the bank, scheduler and kernel and runs the three
//! host-side phases strictly in order. Uploads and launches take `&mut self`,
//! so they can never interleave with a dispatch.

use log::warn;

use crate::bank::{StrokeBank, UploadReport};
use crate::config::Config;
use crate::error::Result;
use crate::ids::AnimationId;
use crate::kernel::RevealKernel;
use crate::normalize::normalize_stroke_with_epsilon;
use crate::outputs::TickOutputs;
use crate::record::{FrameParams, InstanceTransform, LaunchRecord};
use crate::scheduler::{AnimationState, LaunchConfig, Scheduler, SchedulerStatus};
use crate::stroke::Stroke;

/// Drawing-space extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

/// Borrowed view of one frame's buffers.
#[derive(Debug)]
pub struct Frame<'a> {
    pub params: FrameParams,
    pub records: &'a [LaunchRecord],
    pub transforms: &'a [InstanceTransform],
    pub outputs: &'a TickOutputs,
}

impl<'a> Frame<'a> {
    pub fn params_as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.params)
    }

    pub fn records_as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.records)
    }

    pub fn transforms_as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.transforms)
    }

    /// Instances that are not culled.
    pub fn visible_count(&self) -> usize {
        self.transforms.iter().filter(|t| !t.is_culled()).count()
    }
}

#[derive(Debug)]
pub struct StrokeAnimator {
    cfg: Config,
    bank: StrokeBank,
    scheduler: Scheduler,
    kernel: RevealKernel,
    transforms: Vec<InstanceTransform>,
    params: FrameParams,
    canvas: Canvas,
}

impl StrokeAnimator {
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        let bank = StrokeBank::from_config(&cfg);
        let kernel = RevealKernel::new(&cfg)?;
        kernel.check_bank(&bank)?;
        let scheduler = Scheduler::new(&cfg)?;
        let transforms = vec![InstanceTransform::CULLED; kernel.unit_count()];
        Ok(Self {
            cfg,
            bank,
            scheduler,
            kernel,
            transforms,
            params: FrameParams::default(),
            canvas: Canvas::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn bank(&self) -> &StrokeBank {
        &self.bank
    }

    /// Direct bank access, e.g. draining dirty rows for a GPU upload.
    pub fn bank_mut(&mut self) -> &mut StrokeBank {
        &mut self.bank
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn set_canvas(&mut self, width: f32, height: f32) {
        self.canvas = Canvas { width, height };
    }

    /// Normalize `stroke` and store it in row `index`. On any error the row
    /// keeps its previous contents.
    pub fn load_stroke(&mut self, index: usize, stroke: &Stroke) -> Result<()> {
        let normalized =
            normalize_stroke_with_epsilon(stroke, self.cfg.point_count, self.cfg.degenerate_epsilon)?;
        self.bank.upload_normalized(index, &normalized)
    }

    /// Batch form of [`load_stroke`](Self::load_stroke). Strokes that fail to
    /// normalize are reported alongside upload failures.
    pub fn load_strokes<'s, I>(&mut self, strokes: I) -> UploadReport
    where
        I: IntoIterator<Item = (usize, &'s Stroke)>,
    {
        let mut skipped = Vec::new();
        let mut rows = Vec::new();
        for (index, stroke) in strokes {
            match normalize_stroke_with_epsilon(
                stroke,
                self.cfg.point_count,
                self.cfg.degenerate_epsilon,
            ) {
                Ok(normalized) => rows.push((index, normalized.to_xy())),
                Err(err) => {
                    warn!("animator: stroke for row {index} skipped: {err}");
                    skipped.push((index, err));
                }
            }
        }
        let mut report = self
            .bank
            .upload_strokes(rows.iter().map(|(i, pts)| (*i, pts.as_slice())));
        report.skipped.extend(skipped);
        report.skipped.sort_by_key(|(i, _)| *i);
        report
    }

    pub fn add_animation(&mut self, config: LaunchConfig) -> Result<AnimationId> {
        self.scheduler.add_animation(config)
    }

    pub fn cancel(&mut self, id: AnimationId) -> Result<bool> {
        self.scheduler.cancel(id)
    }

    pub fn state(&self, id: AnimationId) -> Option<AnimationState> {
        self.scheduler.state(id)
    }

    pub fn status(&self) -> SchedulerStatus {
        self.scheduler.status()
    }

    /// Run one frame at `current_time` (seconds).
    pub fn frame(&mut self, current_time: f64) -> Frame<'_> {
        let (time, delta) = {
            let out = self.scheduler.tick(current_time);
            (out.time, out.delta)
        };
        self.params = FrameParams {
            current_time: time as f32,
            canvas_width: self.canvas.width,
            canvas_height: self.canvas.height,
            max_slots: self.cfg.max_slots as f32,
            delta_time: delta as f32,
            _padding: [0.0; 3],
        };
        self.kernel.dispatch(
            &self.params,
            self.scheduler.records(),
            &self.bank,
            &mut self.transforms,
        );
        Frame {
            params: self.params,
            records: self.scheduler.records(),
            transforms: &self.transforms,
            outputs: self.scheduler.outputs(),
        }
    }

    /// Transforms from the latest frame.
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Drop every animation and restart the clock. Bank rows are kept.
    pub fn reset(&mut self) {
        self.scheduler.reset();
        self.transforms.fill(InstanceTransform::CULLED);
        self.params = FrameParams::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrokeError;

    fn small() -> Config {
        Config {
            point_count: 8,
            bank_capacity: 2,
            max_slots: 2,
            ..Config::default()
        }
    }

    #[test]
    fn degenerate_load_leaves_row_untouched() {
        let mut anim = StrokeAnimator::new(small()).unwrap();
        let line = Stroke::from_xy([[0.0, 0.0], [1.0, 0.0]]).unwrap();
        anim.load_stroke(0, &line).unwrap();
        let before = anim.bank().get_stroke_data(0).unwrap().to_vec();

        let dot = Stroke::from_xy([[0.5, 0.5], [0.5, 0.5]]).unwrap();
        let err = anim.load_stroke(0, &dot).unwrap_err();
        assert!(matches!(err, StrokeError::DegenerateStroke { .. }));
        assert_eq!(anim.bank().get_stroke_data(0).unwrap(), before.as_slice());
    }

    #[test]
    fn idle_frame_is_fully_culled() {
        let mut anim = StrokeAnimator::new(small()).unwrap();
        let frame = anim.frame(0.0);
        assert_eq!(frame.transforms.len(), 16);
        assert_eq!(frame.visible_count(), 0);
        assert_eq!(frame.transforms_as_bytes().len(), 16 * 64);
    }
}
