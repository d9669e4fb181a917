//! Stored stroke JSON interchange.

use serde::Deserialize;

use crate::error::{Result, StrokeError};
use crate::stroke::{Stroke, StrokePoint};

/// Public API: parse stored stroke JSON into a validated [`Stroke`].
///
/// Accepted shape:
/// `{ "name"?: string, "points": [[x, y], ...] | [{ "x", "y", "t"? }, ...] }`
///
/// Notes:
/// - Bare `[x, y]` pairs get `t = i/(n-1)`.
/// - Object points keep their `t` only when every point carries one;
///   otherwise the whole stroke falls back to index-uniform `t`.
/// - Mixing the two point shapes in one stroke is rejected.
pub fn parse_stored_stroke_json(s: &str) -> Result<Stroke> {
    let stored: StoredStroke = serde_json::from_str(s)?;
    stored.into_stroke()
}

#[derive(Debug, Deserialize)]
struct StoredStroke {
    points: Vec<RawPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Pair([f32; 2]),
    Object { x: f32, y: f32, t: Option<f32> },
}

impl StoredStroke {
    fn into_stroke(self) -> Result<Stroke> {
        let pairs = self
            .points
            .iter()
            .filter(|p| matches!(p, RawPoint::Pair(_)))
            .count();
        if pairs == self.points.len() {
            return Stroke::from_xy(self.points.into_iter().filter_map(|p| match p {
                RawPoint::Pair(xy) => Some(xy),
                RawPoint::Object { .. } => None,
            }));
        }
        if pairs != 0 {
            return Err(StrokeError::InvalidStroke {
                reason: "mixed [x, y] and {x, y} points".into(),
            });
        }

        let all_timed = self
            .points
            .iter()
            .all(|p| matches!(p, RawPoint::Object { t: Some(_), .. }));
        if !all_timed {
            return Stroke::from_xy(self.points.into_iter().filter_map(|p| match p {
                RawPoint::Object { x, y, .. } => Some([x, y]),
                RawPoint::Pair(_) => None,
            }));
        }
        let points = self
            .points
            .into_iter()
            .filter_map(|p| match p {
                RawPoint::Object { x, y, t } => Some(StrokePoint::new(x, y, t.unwrap_or(0.0))),
                RawPoint::Pair(_) => None,
            })
            .collect();
        Stroke::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_with_uniform_t() {
        let s = parse_stored_stroke_json(r#"{"name":"l","points":[[0,0],[1,0],[2,0]]}"#).unwrap();
        let t: Vec<f32> = s.points().iter().map(|p| p.t).collect();
        assert_eq!(t, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn keeps_explicit_t() {
        let s = parse_stored_stroke_json(
            r#"{"points":[{"x":0,"y":0,"t":0},{"x":1,"y":0,"t":0.25},{"x":2,"y":0,"t":1}]}"#,
        )
        .unwrap();
        assert_eq!(s.points()[1].t, 0.25);
    }

    #[test]
    fn rejects_mixed_and_malformed() {
        let err = parse_stored_stroke_json(r#"{"points":[[0,0],{"x":1,"y":0}]}"#).unwrap_err();
        assert!(matches!(err, StrokeError::InvalidStroke { .. }));
        let err = parse_stored_stroke_json("{\"points\": 3}").unwrap_err();
        assert!(matches!(err, StrokeError::Json { .. }));
    }
}
