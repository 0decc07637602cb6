//! Engine Facade - the external boundary
//!
//! One `AuthEngine` owns an immutable configuration and the per-identity
//! model store. Training and authentication for different identities are
//! independent; for the same identity the store's entry lock serializes a
//! completing trainer against concurrent readers. All operations are
//! synchronous and CPU-bound - any I/O happens strictly before/after these
//! calls, in collaborator code.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::features::vector::{FeatureVector, TrainingSample};
use crate::model::authenticator::{Authenticator, Decision};
use crate::model::trainer::{Trainer, TrainingReport};
use crate::model::types::Model;
use crate::store::ModelStore;
use crate::voice::aggregator;
use crate::voice::matcher::{VoiceMatchResult, VoiceMatcher};
use crate::voice::types::{VoiceFrameFeatures, VoiceSessionProfile};

pub struct AuthEngine {
    config: EngineConfig,
    store: ModelStore,
}

impl AuthEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            store: ModelStore::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Enroll (or re-enroll) an identity from its training samples.
    ///
    /// With `privacy_mode` enabled the raw event traces are dropped once the
    /// model is built; otherwise the samples are retained in the store for
    /// collaborator audit. The trained model is identical either way.
    pub fn train(
        &self,
        identity: &str,
        samples: Vec<TrainingSample>,
        privacy_mode: bool,
    ) -> Result<Model, EngineError> {
        let report = Trainer::new(self.config.training.clone()).train(&samples)?;

        let retained = if privacy_mode { None } else { Some(samples) };
        self.store.put(identity, report.model.clone(), retained);

        log::info!(
            "identity '{}' enrolled: threshold {:.6} ({} model)",
            identity,
            report.model.threshold(),
            report.model.model_type()
        );

        Ok(report.model)
    }

    /// Convenience wrapper over [`AuthEngine::train`] for collaborators that
    /// only have bare feature vectors.
    pub fn train_vectors(
        &self,
        identity: &str,
        vectors: Vec<FeatureVector>,
        privacy_mode: bool,
    ) -> Result<Model, EngineError> {
        let samples = vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| TrainingSample::keystroke(i, v))
            .collect();
        self.train(identity, samples, privacy_mode)
    }

    /// Run the full training pipeline without touching the store; the
    /// caller owns persisting the report's model.
    pub fn train_detached(&self, samples: &[TrainingSample]) -> Result<TrainingReport, EngineError> {
        Trainer::new(self.config.training.clone()).train(samples)
    }

    /// Verify a live sample against the identity's stored model.
    pub fn authenticate(
        &self,
        identity: &str,
        live: &FeatureVector,
    ) -> Result<Decision, EngineError> {
        let model = self.store.get(identity)?;
        Ok(self.authenticate_with_model(&model, live))
    }

    /// Verify against an explicit model (storage-agnostic path).
    pub fn authenticate_with_model(&self, model: &Model, live: &FeatureVector) -> Decision {
        Authenticator::new(&self.config).authenticate(model, live)
    }

    /// Reduce one recording's frames into a session profile.
    pub fn aggregate(
        &self,
        frames: &[VoiceFrameFeatures],
    ) -> Result<VoiceSessionProfile, EngineError> {
        aggregator::aggregate(frames)
    }

    /// Score two session profiles. The accept decision is the caller's,
    /// against `config.voice.match_threshold`.
    pub fn match_voice(
        &self,
        enrolled: &VoiceSessionProfile,
        live: &VoiceSessionProfile,
    ) -> Result<VoiceMatchResult, EngineError> {
        VoiceMatcher::new(self.config.voice.clone()).match_profiles(enrolled, live)
    }
}

impl Default for AuthEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;

    fn engine() -> AuthEngine {
        AuthEngine::new(EngineConfig {
            training: TrainingConfig {
                seed: Some(2024),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn vectors() -> Vec<FeatureVector> {
        (0..5)
            .map(|i| FeatureVector::from_values(vec![3.0 + i as f64 * 0.02; 34]))
            .collect()
    }

    #[test]
    fn test_train_then_authenticate() {
        let engine = engine();
        engine.train_vectors("alice", vectors(), true).unwrap();

        let decision = engine
            .authenticate("alice", &FeatureVector::from_values(vec![3.0; 34]))
            .unwrap();
        assert!(decision.accepted, "reason: {}", decision.reason);
    }

    #[test]
    fn test_unenrolled_identity_not_found() {
        let engine = engine();
        let result = engine.authenticate("ghost", &FeatureVector::new(34));
        assert!(matches!(result, Err(EngineError::ModelNotFound(id)) if id == "ghost"));
    }

    #[test]
    fn test_insufficient_samples_leave_no_model() {
        let engine = engine();
        let result = engine.train_vectors("bob", vectors()[..3].to_vec(), true);
        assert!(matches!(
            result,
            Err(EngineError::InsufficientSamples { required: 5, got: 3 })
        ));
        assert!(!engine.store().contains("bob"));
    }

    #[test]
    fn test_privacy_mode_controls_retention() {
        let engine = engine();

        engine.train_vectors("private", vectors(), true).unwrap();
        assert!(engine.store().retained_samples("private").is_none());

        engine.train_vectors("audited", vectors(), false).unwrap();
        assert_eq!(engine.store().retained_samples("audited").unwrap().len(), 5);
    }

    #[test]
    fn test_detached_training_skips_store() {
        let engine = engine();
        let samples: Vec<TrainingSample> = vectors()
            .into_iter()
            .enumerate()
            .map(|(i, v)| TrainingSample::keystroke(i, v))
            .collect();

        let report = engine.train_detached(&samples).unwrap();
        assert!(report.model.threshold() > 0.0);
        assert!(engine.store().identities().is_empty());
    }

    #[test]
    fn test_voice_path_through_facade() {
        let engine = engine();
        let frames: Vec<_> = (0..10)
            .map(|_| VoiceFrameFeatures {
                mfcc: vec![1.0, 2.0, 3.0],
                rms: 0.4,
                ..Default::default()
            })
            .collect();

        let profile = engine.aggregate(&frames).unwrap();
        let result = engine.match_voice(&profile, &profile.clone()).unwrap();

        assert!(result.overall_similarity > engine.config().voice.match_threshold);
    }
}
