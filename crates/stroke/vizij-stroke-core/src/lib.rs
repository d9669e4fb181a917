//! Vizij Stroke Core (engine-agnostic)
//!
//! Morphs and progressively reveals hand-drawn strokes across up to `K`
//! concurrent animation slots. The crate is split along the frame pipeline:
//!
//! - [`normalize`]: arc-length resampling of raw strokes to `N` points and
//!   index-wise blending of normalized strokes.
//! - [`bank`]: fixed-capacity, row-major store of normalized strokes.
//! - [`scheduler`]: admission/lifecycle of launch requests under a hard slot
//!   bound, serialized every tick into the fixed-layout record buffer.
//! - [`kernel`]: the per-(slot, point) reveal/interpolation pass producing one
//!   instance transform per point.
//! - [`animator`]: frame driver running tick → serialize → dispatch.
//!
//! Rendering the instance transforms is left to the host adapter.

pub mod animator;
pub mod bank;
pub mod config;
pub mod error;
pub mod ids;
pub mod interp;
pub mod kernel;
pub mod normalize;
pub mod outputs;
pub mod record;
pub mod scheduler;
pub mod stored_stroke;
pub mod stroke;

// Re-exports for consumers (adapters)
pub use animator::{Canvas, Frame, StrokeAnimator};
pub use bank::{StrokeBank, UploadReport};
pub use config::{Config, Execution, KernelConfig, RevealDirection};
pub use error::{Result, StrokeError};
pub use ids::{AnimationId, IdAllocator, Slot};
pub use kernel::{phaser, RevealKernel};
pub use normalize::{interpolate_strokes, normalize_stroke, validate_normalized_stroke};
pub use outputs::{SchedulerEvent, TickOutputs};
pub use record::{FrameParams, InstanceTransform, LaunchRecord};
pub use scheduler::{AnimationState, LaunchConfig, Scheduler, SchedulerStatus};
pub use stored_stroke::parse_stored_stroke_json;
pub use stroke::{NormalizedStroke, Stroke, StrokePoint};
