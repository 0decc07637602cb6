//! Engine error taxonomy.
//!
//! Every variant is recoverable at the caller boundary - none should abort
//! the process. Numeric edge cases (NaN thresholds, zero-variance features)
//! are resolved with local fallback values and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("insufficient samples: need at least {required}, got {got}")]
    InsufficientSamples { required: usize, got: usize },

    /// Every feature has identical values across all samples, so min == max
    /// for the whole vector and nothing can be learned.
    #[error("degenerate feature set: all samples are identical")]
    DegenerateFeatureSet,

    /// Training-time length mismatch between samples. Authentication never
    /// raises this; short/long live vectors are padded/truncated instead.
    #[error("dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("empty frame set: no audio frames to aggregate")]
    EmptyFrameSet,

    #[error("missing MFCC means: voice profile carries no MFCC data")]
    MissingMfcc,

    #[error("no model enrolled for identity '{0}'")]
    ModelNotFound(String),

    #[error("unknown model type '{0}'")]
    UnknownModelType(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
