//! Authenticator - verification against an enrolled model
//!
//! Normalizes a live sample, reconstructs it, and compares the
//! reconstruction error to the model's calibrated threshold. Dispatches on
//! the model variant; a length mismatch between the live vector and the
//! model is tolerated (zero-padded or truncated), never an error.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::autoencoder::reconstruction_error;
use super::types::{AutoencoderModel, Model, StatisticalModel};
use crate::config::EngineConfig;
use crate::features::normalizer;
use crate::features::vector::FeatureVector;

/// Outcome of one authentication attempt. Produced fresh per attempt and
/// never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub attempt_id: String,
    pub accepted: bool,
    /// Reconstruction error (autoencoder) or deviation score (statistical)
    pub score: f64,
    pub threshold: f64,
    /// Heuristic in [0,1] - NOT a calibrated probability
    pub confidence: f64,
    pub reason: String,
    /// Leading normalized features, absolute and clamped to [0,1];
    /// visualization only
    pub deviations: Vec<f64>,
    pub model_type: String,
    pub evaluated_at: String,
}

pub struct Authenticator {
    deviation_features: usize,
}

impl Authenticator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            deviation_features: config.deviation_features,
        }
    }

    /// Verify a live sample against a model. Total: always yields a usable
    /// Decision; failures to find/parse a model are the caller's errors.
    pub fn authenticate(&self, model: &Model, live: &FeatureVector) -> Decision {
        let decision = match model {
            Model::Autoencoder(m) => self.authenticate_autoencoder(m, live),
            Model::Statistical(m) => self.authenticate_statistical(m, live),
        };

        log::debug!(
            "authentication {}: score {:.6} vs threshold {:.6} (confidence {:.3})",
            if decision.accepted { "PASS" } else { "FAIL" },
            decision.score,
            decision.threshold,
            decision.confidence
        );

        decision
    }

    fn authenticate_autoencoder(&self, model: &AutoencoderModel, live: &FeatureVector) -> Decision {
        let resized = live.resized(model.input_dim);
        let normalized = normalizer::transform(&resized, &model.normalization_params);
        let output = model.autoencoder.predict(normalized.as_slice());
        let error = reconstruction_error(normalized.as_slice(), &output);

        let accepted = error <= model.threshold;

        let denom = (2.0 * model.training_stats.max_error.max(model.threshold * 2.0))
            .max(f64::EPSILON);
        let confidence = (1.0 - error / denom).clamp(0.0, 1.0);

        let deviations = normalized
            .values
            .iter()
            .take(self.deviation_features)
            .map(|v| v.abs().clamp(0.0, 1.0))
            .collect();

        let reason = if accepted {
            format!(
                "reconstruction error {:.6} within threshold {:.6}",
                error, model.threshold
            )
        } else {
            format!(
                "reconstruction error {:.6} exceeds threshold {:.6}",
                error, model.threshold
            )
        };

        Decision {
            attempt_id: Uuid::new_v4().to_string(),
            accepted,
            score: error,
            threshold: model.threshold,
            confidence,
            reason,
            deviations,
            model_type: "autoencoder".to_string(),
            evaluated_at: Utc::now().to_rfc3339(),
        }
    }

    fn authenticate_statistical(&self, model: &StatisticalModel, live: &FeatureVector) -> Decision {
        let score = model.score(live);
        let accepted = score <= model.threshold;

        let denom = (4.0 * model.threshold).max(f64::EPSILON);
        let confidence = (1.0 - score / denom).clamp(0.0, 1.0);

        let reason = if accepted {
            format!(
                "behavioral deviation {:.4} within threshold {:.4}",
                score, model.threshold
            )
        } else {
            format!(
                "behavioral deviation {:.4} exceeds threshold {:.4}",
                score, model.threshold
            )
        };

        Decision {
            attempt_id: Uuid::new_v4().to_string(),
            accepted,
            score,
            threshold: model.threshold,
            confidence,
            reason,
            deviations: model.deviations(live, self.deviation_features),
            model_type: "statistical".to_string(),
            evaluated_at: Utc::now().to_rfc3339(),
        }
    }
}
