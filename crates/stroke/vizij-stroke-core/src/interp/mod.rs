//! Interpolation helpers shared by the normalizer and the kernel.
//!
//! Linear blends drive stroke morphing and bank column filtering; the
//! Catmull-Rom segment evaluator keeps curvature when resampling.

pub mod functions;

pub use functions::{catmull_rom_vec2, lerp_f32, lerp_vec2};
