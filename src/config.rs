//! Engine Configuration
//!
//! Immutable configuration structs passed into Trainer/Authenticator
//! constructors. Never read from ambient/global state.

use serde::{Deserialize, Serialize};

/// Training configuration for the keystroke autoencoder pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Minimum number of enrollment samples required
    pub min_samples: usize,

    /// Noisy variants synthesized per original sample
    pub augmentation_factor: usize,

    /// Relative noise amplitude for augmentation (fraction of each value)
    pub noise_level: f64,

    /// Training epochs
    pub epochs: usize,

    /// Gradient step size
    pub learning_rate: f64,

    /// Autoencoder hidden layer width
    pub hidden_size: usize,

    /// Autoencoder bottleneck width
    pub bottleneck_size: usize,

    /// Floor for the calibrated decision threshold, and the fallback when
    /// calibration yields NaN or a non-positive value
    pub default_threshold: f64,

    /// Percentile of original-sample reconstruction errors used for
    /// calibration
    pub threshold_percentile: f64,

    /// Safety margin applied to the calibrated percentile value. Biases
    /// enrollment toward false-accepts over false-rejects.
    pub threshold_margin: f64,

    /// Seed for weight initialization and augmentation noise. `None` draws
    /// from entropy; set it to make training reproducible.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            augmentation_factor: 3,
            noise_level: 0.1,
            epochs: 200,
            learning_rate: 0.01,
            hidden_size: 16,
            bottleneck_size: 8,
            default_threshold: 0.05,
            threshold_percentile: 0.95,
            threshold_margin: 1.2,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Stricter enrollment (more samples, tighter threshold floor)
    pub fn strict() -> Self {
        Self {
            min_samples: 8,
            default_threshold: 0.02,
            ..Default::default()
        }
    }

    /// Looser enrollment (fewer samples, wider threshold floor)
    pub fn lenient() -> Self {
        Self {
            min_samples: 3,
            default_threshold: 0.1,
            ..Default::default()
        }
    }
}

/// Voice matching configuration.
///
/// The matcher itself never makes the accept decision; `match_threshold` is
/// carried here for callers comparing the overall similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceMatchConfig {
    pub match_threshold: f64,
}

impl Default for VoiceMatchConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.65,
        }
    }
}

impl VoiceMatchConfig {
    pub fn strict() -> Self {
        Self {
            match_threshold: 0.75,
        }
    }

    pub fn lenient() -> Self {
        Self {
            match_threshold: 0.55,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub training: TrainingConfig,
    pub voice: VoiceMatchConfig,
    /// Number of leading features reported in the per-decision deviation
    /// vector (visualization only)
    pub deviation_features: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            training: TrainingConfig::default(),
            voice: VoiceMatchConfig::default(),
            deviation_features: DEVIATION_FEATURES,
        }
    }
}

impl EngineConfig {
    pub fn new(training: TrainingConfig, voice: VoiceMatchConfig) -> Self {
        Self {
            training,
            voice,
            deviation_features: DEVIATION_FEATURES,
        }
    }
}

/// Default deviation vector length.
pub const DEVIATION_FEATURES: usize = 10;
