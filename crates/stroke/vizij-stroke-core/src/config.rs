//! Core configuration for vizij-stroke-core.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrokeError};

/// Sizing and tuning shared by the normalizer, bank, scheduler and kernel.
/// `point_count` is the single source of `N` for every collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Points per normalized stroke (`N`).
    pub point_count: usize,
    /// Stroke bank rows (`C`).
    pub bank_capacity: usize,
    /// Concurrent animation slots (`K`).
    pub max_slots: usize,
    /// Optional bound on the pending admission queue.
    pub max_pending: Option<usize>,

    /// Durations at or below zero are clamped up to this (seconds).
    pub min_duration: f32,
    /// Consecutive stroke points closer than this collapse into one.
    pub degenerate_epsilon: f32,

    /// Terminal entries kept around for `Scheduler::state` lookups.
    pub retain_finished: usize,
    /// Maintain the deadline min-heap for `next_deadline` lookups.
    pub track_deadlines: bool,

    pub kernel: KernelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            point_count: 1024,
            bank_capacity: 64,
            max_slots: 1024,
            max_pending: None,
            min_duration: 1e-3,
            degenerate_epsilon: 1e-6,
            retain_finished: 1024,
            track_deadlines: true,
            kernel: KernelConfig::default(),
        }
    }
}

/// Which end of the stroke the reveal wavefront starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealDirection {
    /// Points near the stroke start appear first.
    #[default]
    FromStart,
    /// Points near the stroke end appear first.
    FromEnd,
}

/// How `RevealKernel::dispatch` spreads work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// One rayon task per slot row.
    #[default]
    Parallel,
    /// Single-threaded loop over every unit.
    Serial,
}

/// Reveal/interpolation kernel tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Wavefront edge width `e` used when a launch does not override it.
    pub edge_width: f32,
    /// Reveal values at or below this are culled.
    pub reveal_epsilon: f32,
    /// Upper clamp applied to the reveal value.
    pub max_reveal: f32,
    /// Marker size in device units at full reveal.
    pub marker_size: f32,
    pub direction: RevealDirection,
    pub execution: Execution,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            edge_width: 1.0,
            reveal_epsilon: 1e-4,
            max_reveal: 0.9999,
            marker_size: 0.005,
            direction: RevealDirection::FromStart,
            execution: Execution::Parallel,
        }
    }
}

fn invalid(reason: impl Into<String>) -> StrokeError {
    StrokeError::InvalidConfig {
        reason: reason.into(),
    }
}

fn positive(name: &str, v: f32) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite and > 0, got {v}")))
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.point_count < 2 {
            return Err(invalid(format!(
                "point_count must be >= 2, got {}",
                self.point_count
            )));
        }
        if self.bank_capacity == 0 {
            return Err(invalid("bank_capacity must be >= 1"));
        }
        if self.max_slots == 0 {
            return Err(invalid("max_slots must be >= 1"));
        }
        if u32::try_from(self.max_slots).is_err() {
            return Err(invalid("max_slots must fit in u32"));
        }
        positive("min_duration", self.min_duration)?;
        positive("degenerate_epsilon", self.degenerate_epsilon)?;
        self.kernel.validate()
    }
}

impl KernelConfig {
    pub fn validate(&self) -> Result<()> {
        positive("kernel.edge_width", self.edge_width)?;
        positive("kernel.marker_size", self.marker_size)?;
        positive("kernel.max_reveal", self.max_reveal)?;
        if !(self.reveal_epsilon.is_finite() && self.reveal_epsilon >= 0.0) {
            return Err(invalid("kernel.reveal_epsilon must be finite and >= 0"));
        }
        if self.reveal_epsilon >= self.max_reveal || self.max_reveal > 1.0 {
            return Err(invalid(format!(
                "kernel reveal range must satisfy epsilon < max_reveal <= 1, got {} / {}",
                self.reveal_epsilon, self.max_reveal
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.point_count, 1024);
        assert_eq!(cfg.bank_capacity, 64);
        assert_eq!(cfg.max_slots, 1024);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = Config::from_json(r#"{ "max_slots": 8, "kernel": { "direction": "from_end" } }"#)
            .expect("config parses");
        assert_eq!(cfg.max_slots, 8);
        assert_eq!(cfg.point_count, 1024);
        assert_eq!(cfg.kernel.direction, RevealDirection::FromEnd);
        assert_eq!(cfg.kernel.edge_width, 1.0);
    }

    #[test]
    fn rejects_single_point_budget() {
        let cfg = Config {
            point_count: 1,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(StrokeError::InvalidConfig { .. })
        ));
    }
}
