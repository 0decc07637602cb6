//! Trainer - enrollment pipeline
//!
//! Orchestrates augmentation, normalization, autoencoder training,
//! reconstruction-error statistics, and threshold calibration into one
//! persistable model per identity.
//!
//! # Pipeline
//! 1. Reject under-sized enrollments
//! 2. Augment: k noisy variants per original, originals kept verbatim
//! 3. Fit min/max on the augmented set, normalize it
//! 4. Train the autoencoder on the normalized augmented set
//! 5. Measure reconstruction error on the normalized *original* samples
//!    (generalization from augmented training onto real data)
//! 6. Calibrate the threshold at the 95th percentile of those errors

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::autoencoder::{reconstruction_error, Autoencoder};
use super::types::{AutoencoderModel, Model, TrainingStats};
use crate::config::TrainingConfig;
use crate::error::EngineError;
use crate::features::normalizer;
use crate::features::vector::{FeatureVector, TrainingSample};

/// Everything a training run produces. Only `model` is persisted; the loss
/// history tail and per-sample errors are for the enrollment UI/logs.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub model: Model,
    pub loss_history: Vec<f64>,
    /// Reconstruction error of each original (non-augmented) sample
    pub sample_errors: Vec<f64>,
}

pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train from enrollment samples (metadata ignored by the math).
    pub fn train(&self, samples: &[TrainingSample]) -> Result<TrainingReport, EngineError> {
        let vectors: Vec<FeatureVector> = samples.iter().map(|s| s.features.clone()).collect();
        self.train_features(&vectors)
    }

    /// Core path: train from bare feature vectors.
    pub fn train_features(&self, samples: &[FeatureVector]) -> Result<TrainingReport, EngineError> {
        if samples.len() < self.config.min_samples {
            return Err(EngineError::InsufficientSamples {
                required: self.config.min_samples,
                got: samples.len(),
            });
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Each original immediately followed by its variants. Training is
        // order-sensitive, so this ordering is part of the pipeline's
        // reproducible behavior.
        let mut augmented = Vec::with_capacity(samples.len() * (1 + self.config.augmentation_factor));
        for sample in samples {
            augmented.push(sample.clone());
            for _ in 0..self.config.augmentation_factor {
                augmented.push(normalizer::augment(sample, self.config.noise_level, &mut rng));
            }
        }

        let params = normalizer::fit(&augmented)?;
        if params.is_fully_degenerate() {
            return Err(EngineError::DegenerateFeatureSet);
        }

        let normalized: Vec<FeatureVector> = augmented
            .iter()
            .map(|s| normalizer::transform(s, &params))
            .collect();

        let input_dim = params.dim();
        log::info!(
            "training autoencoder: {} samples ({} augmented), dim {}, {} epochs",
            samples.len(),
            augmented.len(),
            input_dim,
            self.config.epochs
        );

        let mut autoencoder = Autoencoder::new(
            input_dim,
            self.config.hidden_size,
            self.config.bottleneck_size,
            &mut rng,
        );
        let loss_history =
            autoencoder.train(&normalized, self.config.epochs, self.config.learning_rate);

        // Errors are measured on the originals, normalized with the same
        // params the augmented set was fitted on.
        let sample_errors: Vec<f64> = samples
            .iter()
            .map(|s| {
                let n = normalizer::transform(s, &params);
                let out = autoencoder.predict(n.as_slice());
                reconstruction_error(n.as_slice(), &out)
            })
            .collect();

        let threshold = calibrate_threshold(&sample_errors, &self.config);

        let stats = TrainingStats {
            samples: samples.len(),
            augmented_samples: augmented.len(),
            mean_error: mean(&sample_errors),
            max_error: fold_max(&sample_errors),
            min_error: fold_min(&sample_errors),
            final_loss: loss_history.last().copied().unwrap_or(0.0),
        };

        log::info!(
            "training complete: threshold {:.6}, mean error {:.6}, final loss {:.6}",
            threshold,
            stats.mean_error,
            stats.final_loss
        );

        let model = Model::Autoencoder(AutoencoderModel {
            input_dim,
            normalization_params: params,
            threshold,
            autoencoder,
            training_stats: stats,
            created_at: Utc::now().to_rfc3339(),
        });

        Ok(TrainingReport {
            model,
            loss_history,
            sample_errors,
        })
    }
}

/// Percentile calibration with the documented fallbacks.
///
/// Sorted ascending, the value at `floor(percentile * n)` becomes the
/// candidate. An empty list, NaN, or a non-positive candidate falls back to
/// the configured default. The final threshold is
/// `max(default, candidate * margin)` - the margin deliberately biases
/// enrollment toward false-accepts over false-rejects.
pub(crate) fn calibrate_threshold(errors: &[f64], config: &TrainingConfig) -> f64 {
    if errors.is_empty() {
        return config.default_threshold;
    }

    let mut sorted = errors.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let idx = ((config.threshold_percentile * sorted.len() as f64).floor() as usize)
        .min(sorted.len() - 1);
    let candidate = sorted[idx];

    if !candidate.is_finite() || candidate <= 0.0 {
        log::debug!(
            "threshold calibration fell back to default {} (candidate {})",
            config.default_threshold,
            candidate
        );
        return config.default_threshold;
    }

    config
        .default_threshold
        .max(candidate * config.threshold_margin)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

fn fold_min(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_seed() -> TrainingConfig {
        TrainingConfig {
            seed: Some(1234),
            ..Default::default()
        }
    }

    #[test]
    fn test_calibrate_percentile_with_margin() {
        let errors = vec![0.2, 0.1, 0.3, 0.4, 0.5];
        let config = TrainingConfig::default();
        // floor(0.95 * 5) = 4 -> 0.5; 0.5 * 1.2 = 0.6
        assert!((calibrate_threshold(&errors, &config) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_calibrate_falls_back_on_empty() {
        let config = TrainingConfig::default();
        assert_eq!(calibrate_threshold(&[], &config), config.default_threshold);
    }

    #[test]
    fn test_calibrate_falls_back_on_nan() {
        let config = TrainingConfig::default();
        assert_eq!(
            calibrate_threshold(&[f64::NAN, f64::NAN, f64::NAN], &config),
            config.default_threshold
        );
    }

    #[test]
    fn test_calibrate_falls_back_on_non_positive() {
        let config = TrainingConfig::default();
        assert_eq!(
            calibrate_threshold(&[0.0, 0.0, 0.0], &config),
            config.default_threshold
        );
        assert_eq!(
            calibrate_threshold(&[-1.0, -2.0], &config),
            config.default_threshold
        );
    }

    #[test]
    fn test_calibrate_respects_floor() {
        let config = TrainingConfig::default();
        // Tiny but positive percentile value: margin applies, floor wins
        let tiny = vec![1e-9; 5];
        assert_eq!(calibrate_threshold(&tiny, &config), config.default_threshold);
    }

    #[test]
    fn test_insufficient_samples_rejected() {
        let trainer = Trainer::new(config_with_seed());
        let samples = vec![FeatureVector::from_values(vec![1.0; 34]); 3];
        match trainer.train_features(&samples) {
            Err(EngineError::InsufficientSamples { required, got }) => {
                assert_eq!(required, 5);
                assert_eq!(got, 3);
            }
            other => panic!("expected InsufficientSamples, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_all_zero_samples_are_degenerate() {
        // Relative augmentation noise cannot spread all-zero features, so
        // every min == max and nothing can be learned
        let trainer = Trainer::new(config_with_seed());
        let samples = vec![FeatureVector::from_values(vec![0.0; 34]); 5];
        assert!(matches!(
            trainer.train_features(&samples),
            Err(EngineError::DegenerateFeatureSet)
        ));
    }

    #[test]
    fn test_training_produces_model_and_history() {
        let trainer = Trainer::new(config_with_seed());
        let samples: Vec<FeatureVector> = (0..5)
            .map(|i| FeatureVector::from_values(vec![1.0 + i as f64 * 0.01; 34]))
            .collect();

        let report = trainer.train_features(&samples).unwrap();
        assert_eq!(report.loss_history.len(), 200);
        assert_eq!(report.sample_errors.len(), 5);

        match &report.model {
            Model::Autoencoder(m) => {
                assert_eq!(m.input_dim, 34);
                assert_eq!(m.training_stats.samples, 5);
                assert_eq!(m.training_stats.augmented_samples, 20);
                assert!(m.threshold >= trainer.config().default_threshold);
                assert!(m.training_stats.max_error >= m.training_stats.min_error);
            }
            Model::Statistical(_) => panic!("trainer must produce an autoencoder model"),
        }
    }

    #[test]
    fn test_training_reproducible_with_seed() {
        let samples: Vec<FeatureVector> = (0..5)
            .map(|i| FeatureVector::from_values(vec![1.0 + i as f64 * 0.01; 34]))
            .collect();

        let a = Trainer::new(config_with_seed()).train_features(&samples).unwrap();
        let b = Trainer::new(config_with_seed()).train_features(&samples).unwrap();

        assert_eq!(a.loss_history, b.loss_history);
        assert_eq!(a.sample_errors, b.sample_errors);
        assert_eq!(a.model.threshold(), b.model.threshold());
    }
}
