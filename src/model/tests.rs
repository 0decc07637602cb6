//! Integration tests for the training + authentication pipeline.

use crate::config::{EngineConfig, TrainingConfig};
use crate::features::vector::FeatureVector;
use crate::model::authenticator::Authenticator;
use crate::model::trainer::Trainer;
use crate::model::types::Model;

fn seeded_config(seed: u64) -> TrainingConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    TrainingConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

/// Typed samples of one person: a stable base rhythm with small jitter
fn enrollment_samples(n: usize) -> Vec<FeatureVector> {
    (0..n)
        .map(|i| {
            let wobble = (i as f64 * 0.7).sin() * 0.03;
            let values = (0..34)
                .map(|f| 1.0 + f as f64 * 0.1 + wobble)
                .collect::<Vec<f64>>();
            FeatureVector::from_values(values)
        })
        .collect()
}

#[test]
fn test_identical_ones_scenario() {
    // Five identical 34-element vectors of all 1.0s, default config:
    // training succeeds, threshold sits at or above the floor, and the same
    // vector authenticates with near-zero reconstruction error.
    let config = seeded_config(7);
    let report = Trainer::new(config.clone())
        .train_features(&vec![FeatureVector::from_values(vec![1.0; 34]); 5])
        .unwrap();

    assert!(report.model.threshold() >= config.default_threshold);

    let auth = Authenticator::new(&EngineConfig::default());
    let decision = auth.authenticate(&report.model, &FeatureVector::from_values(vec![1.0; 34]));

    assert!(decision.accepted, "reason: {}", decision.reason);
    assert!(
        decision.score < config.default_threshold,
        "reconstruction error {} should be near zero",
        decision.score
    );
}

#[test]
fn test_enrolled_samples_reaccepted() {
    // Percentile calibration guarantees at least 95% of the original
    // enrollment samples re-authenticate successfully.
    let samples = enrollment_samples(8);
    let report = Trainer::new(seeded_config(21))
        .train_features(&samples)
        .unwrap();

    let auth = Authenticator::new(&EngineConfig::default());
    let accepted = samples
        .iter()
        .filter(|s| auth.authenticate(&report.model, s).accepted)
        .count();

    assert!(
        accepted as f64 / samples.len() as f64 >= 0.95,
        "only {}/{} enrolled samples re-accepted",
        accepted,
        samples.len()
    );
}

#[test]
fn test_model_json_contract_field_names() {
    let report = Trainer::new(seeded_config(3))
        .train_features(&enrollment_samples(5))
        .unwrap();

    let json = report.model.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["modelType"], "autoencoder");
    assert!(value["inputDim"].is_u64());
    assert!(value["threshold"].is_f64());
    assert!(value["normalizationParams"]["min"].is_array());
    assert!(value["normalizationParams"]["max"].is_array());
    assert!(value["createdAt"].is_string());

    let ae = &value["autoencoder"];
    assert_eq!(ae["inputSize"], 34);
    assert_eq!(ae["hiddenSize"], 16);
    assert_eq!(ae["bottleneckSize"], 8);
    for key in ["weights1", "weights2", "weights3"] {
        assert!(ae[key].is_array(), "{} missing", key);
        assert!(ae[key][0].is_array(), "{} must be 2-D", key);
    }
    for key in ["biases1", "biases2", "biases3"] {
        assert!(ae[key].is_array(), "{} missing", key);
        assert!(ae[key][0].is_f64(), "{} must be 1-D", key);
    }

    let stats = &value["trainingStats"];
    for key in [
        "samples",
        "augmentedSamples",
        "meanError",
        "maxError",
        "minError",
        "finalLoss",
    ] {
        assert!(!stats[key].is_null(), "trainingStats.{} missing", key);
    }
}

#[test]
fn test_model_round_trip_preserves_decisions() {
    let report = Trainer::new(seeded_config(11))
        .train_features(&enrollment_samples(5))
        .unwrap();

    let restored = Model::from_json(&report.model.to_json().unwrap()).unwrap();

    let auth = Authenticator::new(&EngineConfig::default());
    let probe = FeatureVector::from_values(vec![1.5; 34]);

    let before = auth.authenticate(&report.model, &probe);
    let after = auth.authenticate(&restored, &probe);

    assert_eq!(before.accepted, after.accepted);
    assert_eq!(before.score, after.score);
    assert_eq!(before.confidence, after.confidence);
}

#[test]
fn test_retraining_is_wholesale() {
    // A second enrollment produces a complete, self-consistent new model
    // rather than an incremental update of the first.
    let first = Trainer::new(seeded_config(31))
        .train_features(&enrollment_samples(5))
        .unwrap();

    let shifted: Vec<FeatureVector> = enrollment_samples(5)
        .into_iter()
        .map(|s| FeatureVector::from_values(s.values.iter().map(|v| v * 3.0).collect()))
        .collect();
    let second = Trainer::new(seeded_config(31)).train_features(&shifted).unwrap();

    let auth = Authenticator::new(&EngineConfig::default());
    let probe = &shifted[0];
    assert!(auth.authenticate(&second.model, probe).accepted);

    // The old model knows nothing about the new scale
    match (&first.model, &second.model) {
        (Model::Autoencoder(a), Model::Autoencoder(b)) => {
            assert_ne!(
                a.normalization_params.max, b.normalization_params.max,
                "scaling bounds must be recomputed"
            );
        }
        _ => panic!("both trainings must produce autoencoder models"),
    }
}
