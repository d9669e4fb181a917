//! Stroke data model.
//!
//! A `Stroke` is whatever the generator produced; a `NormalizedStroke` has
//! exactly `N` points evenly spaced by arc length and is the only shape the
//! bank and kernel accept.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrokeError};

/// One sample of a stroke in drawing-space coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
    /// Normalized parameter in [0,1].
    #[serde(default)]
    pub t: f32,
}

impl StrokePoint {
    #[inline]
    pub fn new(x: f32, y: f32, t: f32) -> Self {
        Self { x, y, t }
    }

    #[inline]
    pub fn xy(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    #[inline]
    pub fn distance(&self, other: &StrokePoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Immutable raw stroke as supplied by a generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<StrokePoint>,
}

fn invalid(reason: impl Into<String>) -> StrokeError {
    StrokeError::InvalidStroke {
        reason: reason.into(),
    }
}

impl Stroke {
    /// Validate and wrap points: coordinates finite, `t` finite, in [0,1]
    /// and nondecreasing.
    pub fn new(points: Vec<StrokePoint>) -> Result<Self> {
        let mut last = f32::NEG_INFINITY;
        for (i, p) in points.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(invalid(format!("point {i} has non-finite coordinates")));
            }
            if !p.t.is_finite() || !(0.0..=1.0).contains(&p.t) {
                return Err(invalid(format!("point {i} has t={} outside [0,1]", p.t)));
            }
            if p.t < last {
                return Err(invalid(format!("t decreases at point {i}")));
            }
            last = p.t;
        }
        Ok(Self { points })
    }

    /// Build from bare coordinates, assigning `t = i/(n-1)`.
    pub fn from_xy<I>(coords: I) -> Result<Self>
    where
        I: IntoIterator<Item = [f32; 2]>,
    {
        let coords: Vec<[f32; 2]> = coords.into_iter().collect();
        let last = coords.len().saturating_sub(1).max(1) as f32;
        let points = coords
            .iter()
            .enumerate()
            .map(|(i, [x, y])| StrokePoint::new(*x, *y, i as f32 / last))
            .collect();
        Self::new(points)
    }

    #[inline]
    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Stroke resampled to exactly `N` points with `t = i/(N-1)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedStroke {
    points: Vec<StrokePoint>,
}

impl NormalizedStroke {
    /// Wrap points that already satisfy the normalized postcondition.
    pub fn from_points(points: Vec<StrokePoint>, point_count: usize) -> Result<Self> {
        crate::normalize::validate_normalized_stroke(&points, point_count)?;
        Ok(Self { points })
    }

    pub(crate) fn from_points_unchecked(points: Vec<StrokePoint>) -> Self {
        Self { points }
    }

    /// Every point sits at `(x, y)`. This is the explicit fallback a loader
    /// substitutes after `DegenerateStroke`.
    pub fn single_point(x: f32, y: f32, point_count: usize) -> Self {
        let last = point_count.saturating_sub(1).max(1) as f32;
        let points = (0..point_count)
            .map(|i| StrokePoint::new(x, y, i as f32 / last))
            .collect();
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Coordinates only, in the layout the bank stores.
    pub fn to_xy(&self) -> Vec<[f32; 2]> {
        self.points.iter().map(StrokePoint::xy).collect()
    }

    pub fn into_points(self) -> Vec<StrokePoint> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_xy_assigns_uniform_t() {
        let s = Stroke::from_xy([[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]).unwrap();
        let ts: Vec<f32> = s.points().iter().map(|p| p.t).collect();
        assert_eq!(ts, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn rejects_decreasing_t() {
        let err = Stroke::new(vec![
            StrokePoint::new(0.0, 0.0, 0.5),
            StrokePoint::new(1.0, 0.0, 0.2),
        ])
        .unwrap_err();
        assert!(matches!(err, StrokeError::InvalidStroke { .. }));
    }

    #[test]
    fn rejects_nan_coordinates() {
        assert!(Stroke::from_xy([[f32::NAN, 0.0], [1.0, 1.0]]).is_err());
    }
}
