//! Error types for stroke loading, bank uploads and animation admission.

use crate::ids::AnimationId;

/// Every fallible operation in the crate returns this error.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum StrokeError {
    /// All points of the stroke collapse within the degenerate epsilon.
    #[error("Degenerate stroke: {points} distinct point(s), arc length {length}")]
    DegenerateStroke { points: usize, length: f32 },

    /// Raw stroke data violates the Stroke invariants.
    #[error("Invalid stroke: {reason}")]
    InvalidStroke { reason: String },

    /// A normalized stroke failed its postcondition check.
    #[error("Invalid normalized stroke: {reason}")]
    InvalidNormalizedStroke { reason: String },

    /// Stroke bank row index outside `[0, capacity)`.
    #[error("Stroke bank index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// Point count differs from the configured `N`.
    #[error("Point count mismatch: expected {expected}, got {actual}")]
    PointCountMismatch { expected: usize, actual: usize },

    /// Launch references a stroke index outside the bank.
    #[error("Invalid stroke index {index} (bank capacity {capacity})")]
    InvalidStrokeIndex { index: usize, capacity: usize },

    /// Launch parameters outside their documented domain.
    #[error("Invalid launch config: {reason}")]
    InvalidLaunchConfig { reason: String },

    /// Every slot is busy and the pending queue is full.
    #[error("Capacity exceeded: {active} active, {pending} pending (limit {limit})")]
    CapacityExceeded {
        active: usize,
        pending: usize,
        limit: usize,
    },

    /// Identifier never issued by this scheduler.
    #[error("Unknown animation: {id}")]
    UnknownAnimation { id: AnimationId },

    /// Configuration value outside its domain.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Two collaborators disagree on a shared dimension (e.g. `N`).
    #[error("Config mismatch on {what}: {left} vs {right}")]
    ConfigMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    /// JSON (de)serialization failure.
    #[error("JSON error: {reason}")]
    Json { reason: String },
}

impl StrokeError {
    /// Capacity errors clear up once slots free; everything else needs the
    /// caller to change its input.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// Error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DegenerateStroke { .. } => "geometry",
            Self::InvalidStroke { .. }
            | Self::InvalidNormalizedStroke { .. }
            | Self::IndexOutOfRange { .. }
            | Self::PointCountMismatch { .. }
            | Self::InvalidStrokeIndex { .. }
            | Self::InvalidLaunchConfig { .. }
            | Self::UnknownAnimation { .. } => "validation",
            Self::CapacityExceeded { .. } => "capacity",
            Self::InvalidConfig { .. } | Self::ConfigMismatch { .. } => "config",
            Self::Json { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for StrokeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}

/// Crate result type
pub type Result<T> = std::result::Result<T, StrokeError>;
