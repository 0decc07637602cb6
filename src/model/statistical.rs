//! Legacy Statistical Model
//!
//! The pre-autoencoder authentication path: per-feature mean/std learned
//! from enrollment samples, scored by mean squared z-score, thresholded at a
//! calibrated percentile. Kept alive so identities enrolled under the old
//! scheme still authenticate.

use chrono::Utc;

use super::trainer::calibrate_threshold;
use super::types::StatisticalModel;
use crate::config::TrainingConfig;
use crate::error::EngineError;
use crate::features::vector::FeatureVector;

impl StatisticalModel {
    /// Learn per-feature mean/std and calibrate the threshold on the
    /// training scores, using the same percentile/margin/floor routine as
    /// the autoencoder path.
    pub fn fit(
        samples: &[FeatureVector],
        config: &TrainingConfig,
    ) -> Result<StatisticalModel, EngineError> {
        if samples.len() < config.min_samples {
            return Err(EngineError::InsufficientSamples {
                required: config.min_samples,
                got: samples.len(),
            });
        }

        let dim = samples[0].len();
        for sample in samples {
            if sample.len() != dim {
                return Err(EngineError::DimensionMismatch {
                    expected: dim,
                    got: sample.len(),
                });
            }
        }

        let n = samples.len() as f64;
        let mut mean = vec![0.0; dim];
        for sample in samples {
            for (m, &v) in mean.iter_mut().zip(sample.values.iter()) {
                *m += v / n;
            }
        }

        let mut std = vec![0.0; dim];
        for sample in samples {
            for (i, &v) in sample.values.iter().enumerate() {
                std[i] += (v - mean[i]).powi(2) / n;
            }
        }
        for s in std.iter_mut() {
            *s = s.sqrt();
        }

        if std.iter().all(|&s| s == 0.0) {
            return Err(EngineError::DegenerateFeatureSet);
        }

        let mut model = StatisticalModel {
            input_dim: dim,
            mean,
            std,
            threshold: config.default_threshold,
            created_at: Utc::now().to_rfc3339(),
        };

        let scores: Vec<f64> = samples.iter().map(|s| model.score(s)).collect();
        model.threshold = calibrate_threshold(&scores, config);

        Ok(model)
    }

    /// Mean squared z-score of a sample against the learned distribution.
    /// Zero-variance features contribute through an epsilon-floored std.
    pub fn score(&self, sample: &FeatureVector) -> f64 {
        let resized = sample.resized(self.input_dim);
        if self.input_dim == 0 {
            return 0.0;
        }
        resized
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let z = (v - self.mean[i]) / self.std[i].max(f64::EPSILON);
                z * z
            })
            .sum::<f64>()
            / self.input_dim as f64
    }

    /// Per-feature |z|, clamped to [0,1], for the decision deviation vector
    pub fn deviations(&self, sample: &FeatureVector, limit: usize) -> Vec<f64> {
        let resized = sample.resized(self.input_dim);
        resized
            .values
            .iter()
            .enumerate()
            .take(limit)
            .map(|(i, &v)| {
                let z = (v - self.mean[i]) / self.std[i].max(f64::EPSILON);
                z.abs().clamp(0.0, 1.0)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;

    fn spread_samples() -> Vec<FeatureVector> {
        vec![
            FeatureVector::from_values(vec![10.0, 1.0]),
            FeatureVector::from_values(vec![11.0, 1.1]),
            FeatureVector::from_values(vec![9.0, 0.9]),
            FeatureVector::from_values(vec![10.5, 1.05]),
            FeatureVector::from_values(vec![9.5, 0.95]),
        ]
    }

    #[test]
    fn test_fit_learns_distribution() {
        let model = StatisticalModel::fit(&spread_samples(), &TrainingConfig::default()).unwrap();
        assert_eq!(model.input_dim, 2);
        assert!((model.mean[0] - 10.0).abs() < 1e-9);
        assert!(model.std[0] > 0.0);
        assert!(model.threshold >= TrainingConfig::default().default_threshold);
    }

    #[test]
    fn test_fit_rejects_insufficient() {
        let few = spread_samples()[..3].to_vec();
        assert!(matches!(
            StatisticalModel::fit(&few, &TrainingConfig::default()),
            Err(EngineError::InsufficientSamples { required: 5, got: 3 })
        ));
    }

    #[test]
    fn test_fit_rejects_identical_samples() {
        let constant = vec![FeatureVector::from_values(vec![1.0, 2.0]); 5];
        assert!(matches!(
            StatisticalModel::fit(&constant, &TrainingConfig::default()),
            Err(EngineError::DegenerateFeatureSet)
        ));
    }

    #[test]
    fn test_score_centered_sample_is_low() {
        let model = StatisticalModel::fit(&spread_samples(), &TrainingConfig::default()).unwrap();
        let center = FeatureVector::from_values(vec![10.0, 1.0]);
        let outlier = FeatureVector::from_values(vec![100.0, 50.0]);
        assert!(model.score(&center) < model.score(&outlier));
    }

    #[test]
    fn test_deviations_bounded() {
        let model = StatisticalModel::fit(&spread_samples(), &TrainingConfig::default()).unwrap();
        let outlier = FeatureVector::from_values(vec![1000.0, -1000.0]);
        let devs = model.deviations(&outlier, 10);
        assert_eq!(devs.len(), 2);
        assert!(devs.iter().all(|&d| (0.0..=1.0).contains(&d)));
    }
}
