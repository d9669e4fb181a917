//! Shared stroke fixtures for tests and benches.
//!
//! JSON strokes are listed in `fixtures/manifest.json` at the workspace root;
//! `procedural` builds reference shapes with exactly known geometry.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    strokes: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a String> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod strokes {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.strokes.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.strokes, "stroke", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse stroke fixture {name}"))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.strokes, "stroke", name)?;
        Ok(resolve_path(rel))
    }
}

/// Reference shapes as bare `[x, y]` coordinates.
pub mod procedural {
    use std::f32::consts::TAU;

    /// `samples` points on a circle, first point repeated at the end so the
    /// stroke closes.
    pub fn circle(center: [f32; 2], radius: f32, samples: usize) -> Vec<[f32; 2]> {
        let n = samples.max(3);
        (0..=n)
            .map(|i| {
                let a = TAU * (i % n) as f32 / n as f32;
                [center[0] + radius * a.cos(), center[1] + radius * a.sin()]
            })
            .collect()
    }

    /// Closed axis-aligned square starting at the top-left corner, corners
    /// only.
    pub fn square(origin: [f32; 2], side: f32) -> Vec<[f32; 2]> {
        let [x, y] = origin;
        vec![
            [x, y],
            [x + side, y],
            [x + side, y + side],
            [x, y + side],
            [x, y],
        ]
    }

    /// Lemniscate of Gerono, closed.
    pub fn figure_eight(center: [f32; 2], size: f32, samples: usize) -> Vec<[f32; 2]> {
        let n = samples.max(4);
        (0..=n)
            .map(|i| {
                let a = TAU * (i % n) as f32 / n as f32;
                [center[0] + size * a.sin(), center[1] + size * a.sin() * a.cos()]
            })
            .collect()
    }

    /// Open polyline from `from` to `to` with `samples` evenly spaced points.
    pub fn line(from: [f32; 2], to: [f32; 2], samples: usize) -> Vec<[f32; 2]> {
        let n = samples.max(2);
        (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                [from[0] + (to[0] - from[0]) * t, from[1] + (to[1] - from[1]) * t]
            })
            .collect()
    }
}
