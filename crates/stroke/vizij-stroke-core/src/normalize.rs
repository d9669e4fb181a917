//! Stroke Normalizer.
//!
//! Model:
//! - Consecutive points within `epsilon` of each other collapse into one.
//! - Cumulative arc length `L_i` is computed over the cleaned polyline.
//! - Output sample `j` sits at arc length `j/(N-1) * L_total`, located in its
//!   bracketing source segment and evaluated with a Catmull-Rom fit through the
//!   four nearest source points (neighbours wrap on closed strokes and are
//!   reflected at open ends).
//! - Output `t_j = j/(N-1)`.
//!
//! `interpolate_strokes` blends two normalized strokes by index. It relies on
//! both strokes sharing the same point budget and is not shape-aware.

use crate::error::{Result, StrokeError};
use crate::interp::{catmull_rom_vec2, lerp_f32};
use crate::stroke::{NormalizedStroke, Stroke, StrokePoint};

/// Default collapse distance, matches `Config::default().degenerate_epsilon`.
pub const DEFAULT_DEGENERATE_EPSILON: f32 = 1e-6;

/// Tolerance for the `t` endpoints in `validate_normalized_stroke`.
const T_ENDPOINT_EPS: f32 = 1e-5;

/// Resample `stroke` to `point_count` points evenly spaced by arc length.
pub fn normalize_stroke(stroke: &Stroke, point_count: usize) -> Result<NormalizedStroke> {
    normalize_stroke_with_epsilon(stroke, point_count, DEFAULT_DEGENERATE_EPSILON)
}

/// `normalize_stroke` with an explicit collapse distance.
pub fn normalize_stroke_with_epsilon(
    stroke: &Stroke,
    point_count: usize,
    epsilon: f32,
) -> Result<NormalizedStroke> {
    if point_count < 2 {
        return Err(StrokeError::InvalidConfig {
            reason: format!("point_count must be >= 2, got {point_count}"),
        });
    }

    let cleaned = collapse_duplicates(stroke.points(), epsilon);
    let lengths = cumulative_lengths(&cleaned);
    let total = lengths.last().copied().unwrap_or(0.0);
    if cleaned.len() < 2 || total <= epsilon {
        return Err(StrokeError::DegenerateStroke {
            points: cleaned.len(),
            length: total,
        });
    }

    let closed = is_closed(&cleaned, epsilon);
    let denom = (point_count - 1) as f32;
    let mut out = Vec::with_capacity(point_count);
    for j in 0..point_count {
        let t = j as f32 / denom;
        let [x, y] = if j + 1 == point_count {
            cleaned[cleaned.len() - 1]
        } else {
            sample_at_length(&cleaned, &lengths, t * total, closed)
        };
        out.push(StrokePoint::new(x, y, t));
    }

    validate_normalized_stroke(&out, point_count)?;
    Ok(NormalizedStroke::from_points_unchecked(out))
}

/// Postcondition check: exactly `point_count` points, finite coordinates,
/// `t` nondecreasing from 0 to 1.
pub fn validate_normalized_stroke(points: &[StrokePoint], point_count: usize) -> Result<()> {
    if points.len() != point_count {
        return Err(StrokeError::PointCountMismatch {
            expected: point_count,
            actual: points.len(),
        });
    }
    let invalid = |reason: String| StrokeError::InvalidNormalizedStroke { reason };

    let mut last = f32::NEG_INFINITY;
    for (i, p) in points.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() || !p.t.is_finite() {
            return Err(invalid(format!("point {i} is not finite")));
        }
        if p.t < last {
            return Err(invalid(format!("t decreases at point {i}")));
        }
        last = p.t;
    }
    if let (Some(first), Some(end)) = (points.first(), points.last()) {
        if first.t.abs() > T_ENDPOINT_EPS {
            return Err(invalid(format!("first t is {}, expected 0", first.t)));
        }
        if (end.t - 1.0).abs() > T_ENDPOINT_EPS {
            return Err(invalid(format!("last t is {}, expected 1", end.t)));
        }
    }
    Ok(())
}

/// Index-wise linear blend of two normalized strokes; `t = 0` is `a`,
/// `t = 1` is `b`.
pub fn interpolate_strokes(
    a: &NormalizedStroke,
    b: &NormalizedStroke,
    t: f32,
) -> Result<Vec<StrokePoint>> {
    if a.len() != b.len() {
        return Err(StrokeError::PointCountMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    if !t.is_finite() || !(0.0..=1.0).contains(&t) {
        return Err(StrokeError::InvalidStroke {
            reason: format!("blend factor {t} outside [0,1]"),
        });
    }
    Ok(a.points()
        .iter()
        .zip(b.points())
        .map(|(pa, pb)| {
            StrokePoint::new(
                lerp_f32(pa.x, pb.x, t),
                lerp_f32(pa.y, pb.y, t),
                lerp_f32(pa.t, pb.t, t),
            )
        })
        .collect())
}

fn collapse_duplicates(points: &[StrokePoint], epsilon: f32) -> Vec<[f32; 2]> {
    let mut cleaned: Vec<[f32; 2]> = Vec::with_capacity(points.len());
    for p in points {
        match cleaned.last() {
            Some(&[lx, ly]) if distance([lx, ly], p.xy()) <= epsilon => {}
            _ => cleaned.push(p.xy()),
        }
    }
    cleaned
}

#[inline]
fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

fn cumulative_lengths(points: &[[f32; 2]]) -> Vec<f32> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut acc = 0.0f64;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            acc += distance(points[i - 1], *p) as f64;
        }
        lengths.push(acc as f32);
    }
    lengths
}

fn is_closed(points: &[[f32; 2]], epsilon: f32) -> bool {
    points.len() > 3 && distance(points[0], points[points.len() - 1]) <= epsilon.max(1e-4)
}

#[inline]
fn reflect(about: [f32; 2], other: [f32; 2]) -> [f32; 2] {
    [2.0 * about[0] - other[0], 2.0 * about[1] - other[1]]
}

/// Position at arc length `u` along the cleaned polyline.
fn sample_at_length(points: &[[f32; 2]], lengths: &[f32], u: f32, closed: bool) -> [f32; 2] {
    let last = points.len() - 1;
    // Segment i such that lengths[i] <= u < lengths[i + 1].
    let i = lengths
        .partition_point(|&l| l <= u)
        .saturating_sub(1)
        .min(last - 1);
    let seg_len = (lengths[i + 1] - lengths[i]).max(f32::EPSILON);
    let s = ((u - lengths[i]) / seg_len).clamp(0.0, 1.0);

    let p1 = points[i];
    let p2 = points[i + 1];
    let p0 = if i > 0 {
        points[i - 1]
    } else if closed {
        points[last - 1]
    } else {
        reflect(p1, p2)
    };
    let p3 = if i + 2 <= last {
        points[i + 2]
    } else if closed {
        points[1]
    } else {
        reflect(p2, p1)
    };
    catmull_rom_vec2(p0, p1, p2, p3, s)
}
