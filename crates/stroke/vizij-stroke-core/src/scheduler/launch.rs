//! Launch parameters as collected by a launcher.
//!
//! The launcher gathers and passes every parameter explicitly; the scheduler
//! never reads ambient state. Runtime fields (`active`, `phase`) live on the
//! scheduler entry and in the serialized record.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrokeError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Bank row blended from (`interpolation_t = 0`).
    pub stroke_a: usize,
    /// Bank row blended to (`interpolation_t = 1`).
    pub stroke_b: usize,
    pub interpolation_t: f32,
    /// Seconds; non-positive values are clamped to `Config::min_duration`.
    pub total_duration: f32,
    /// Seconds already elapsed at admission.
    #[serde(default)]
    pub elapsed_time: f32,
    /// Drawing-space origin the stroke is placed at.
    pub start_point: [f32; 2],
    pub scale: f32,
    /// Per-launch wavefront edge width; `None` uses the kernel default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_width: Option<f32>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            stroke_a: 0,
            stroke_b: 0,
            interpolation_t: 0.0,
            total_duration: 1.0,
            elapsed_time: 0.0,
            start_point: [0.0, 0.0],
            scale: 1.0,
            edge_width: None,
        }
    }
}

fn invalid(reason: impl Into<String>) -> StrokeError {
    StrokeError::InvalidLaunchConfig {
        reason: reason.into(),
    }
}

impl LaunchConfig {
    /// Morph `stroke_a` into `stroke_b` at `interpolation_t`, drawn over
    /// `total_duration` seconds at `start_point`.
    pub fn new(stroke_a: usize, stroke_b: usize, interpolation_t: f32, total_duration: f32) -> Self {
        Self {
            stroke_a,
            stroke_b,
            interpolation_t,
            total_duration,
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.start_point = [x, y];
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_elapsed(mut self, elapsed_time: f32) -> Self {
        self.elapsed_time = elapsed_time;
        self
    }

    pub fn with_edge_width(mut self, edge_width: f32) -> Self {
        self.edge_width = Some(edge_width);
        self
    }

    /// Check every field against its domain, clamping only the duration.
    /// Stroke indices are validated here because the kernel never checks them.
    pub fn validated(mut self, bank_capacity: usize, min_duration: f32) -> Result<Self> {
        for index in [self.stroke_a, self.stroke_b] {
            if index >= bank_capacity {
                return Err(StrokeError::InvalidStrokeIndex {
                    index,
                    capacity: bank_capacity,
                });
            }
        }
        if !self.interpolation_t.is_finite() || !(0.0..=1.0).contains(&self.interpolation_t) {
            return Err(invalid(format!(
                "interpolation_t {} outside [0,1]",
                self.interpolation_t
            )));
        }
        if self.total_duration.is_nan() || self.total_duration.is_infinite() {
            return Err(invalid(format!(
                "total_duration {} is not finite",
                self.total_duration
            )));
        }
        if self.total_duration <= 0.0 {
            warn!(
                "launch: total_duration {} clamped to {min_duration}",
                self.total_duration
            );
            self.total_duration = min_duration;
        }
        if !self.elapsed_time.is_finite() || self.elapsed_time < 0.0 {
            return Err(invalid(format!(
                "elapsed_time {} must be finite and >= 0",
                self.elapsed_time
            )));
        }
        if !self.start_point.iter().all(|c| c.is_finite()) {
            return Err(invalid("start_point must be finite"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid(format!("scale {} must be finite and > 0", self.scale)));
        }
        if let Some(e) = self.edge_width {
            if !e.is_finite() || e <= 0.0 {
                return Err(invalid(format!("edge_width {e} must be finite and > 0")));
            }
        }
        Ok(self)
    }
}
