//! Feature Normalization
//!
//! Per-feature min/max scaling plus the augmentation used to synthesize
//! extra enrollment samples. Foundation for everything downstream.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::features::vector::FeatureVector;

/// Per-feature scaling bounds learned from a sample set.
///
/// Invariant: `max[i] >= min[i]` for all i. When they are equal the feature
/// is degenerate and normalizes to exactly 0 (a defined value, not a
/// division).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl NormalizationParams {
    pub fn dim(&self) -> usize {
        self.min.len()
    }

    /// True when every feature is degenerate (max == min across the board)
    pub fn is_fully_degenerate(&self) -> bool {
        self.min
            .iter()
            .zip(self.max.iter())
            .all(|(lo, hi)| lo == hi)
    }
}

/// Compute per-feature min/max over all provided samples.
pub fn fit(samples: &[FeatureVector]) -> Result<NormalizationParams, EngineError> {
    let first = samples.first().ok_or(EngineError::InsufficientSamples {
        required: 1,
        got: 0,
    })?;
    let dim = first.len();

    let mut min = vec![f64::INFINITY; dim];
    let mut max = vec![f64::NEG_INFINITY; dim];

    for sample in samples {
        if sample.len() != dim {
            return Err(EngineError::DimensionMismatch {
                expected: dim,
                got: sample.len(),
            });
        }
        for (i, &v) in sample.values.iter().enumerate() {
            if v < min[i] {
                min[i] = v;
            }
            if v > max[i] {
                max[i] = v;
            }
        }
    }

    Ok(NormalizationParams { min, max })
}

/// Map each feature to `(v - min) / (max - min)`, or 0 for a degenerate
/// feature. Pure - no side effects, no clamping.
pub fn transform(sample: &FeatureVector, params: &NormalizationParams) -> FeatureVector {
    let values = sample
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let lo = params.min.get(i).copied().unwrap_or(0.0);
            let hi = params.max.get(i).copied().unwrap_or(0.0);
            if hi > lo {
                (v - lo) / (hi - lo)
            } else {
                0.0
            }
        })
        .collect();
    FeatureVector::from_values(values)
}

/// Synthesize a noisy variant: each feature gets `uniform(-1,1) * noise_level
/// * value` added, then is clamped to be non-negative. Non-deterministic by
/// design; pass a seeded rng for reproducible training.
pub fn augment(sample: &FeatureVector, noise_level: f64, rng: &mut StdRng) -> FeatureVector {
    let values = sample
        .values
        .iter()
        .map(|&v| {
            let noise = rng.gen_range(-1.0..1.0) * noise_level * v;
            (v + noise).max(0.0)
        })
        .collect();
    FeatureVector::from_values(values)
}
