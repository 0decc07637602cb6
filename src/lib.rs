//! Behavioral Biometric Authentication - Core Engine
//!
//! Authenticates a person by comparing a freshly observed behavioral sample
//! (typing rhythm, or a spoken passphrase) against a previously learned
//! profile.
//!
//! # Architecture
//! - `features/` - feature vectors, keystroke layout/extraction, min/max
//!   normalization and augmentation
//! - `model/` - autoencoder (train + infer), trainer pipeline, threshold
//!   calibration, authenticator, persisted-model contract
//! - `voice/` - session-profile aggregation and multi-metric similarity
//!   matching
//! - `store` - per-identity model registry with writer-excludes-readers
//!   locking
//! - `engine` - the external facade (train / authenticate / aggregate /
//!   match)
//!
//! The engine is synchronous and CPU-bound; capture, UI, persistence media,
//! and transport are collaborator responsibilities. It hands collaborators
//! serialized models in a fixed JSON shape and structured decisions that
//! always carry a human-readable reason.

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod model;
pub mod store;
pub mod voice;

// Re-export the boundary types
pub use config::{EngineConfig, TrainingConfig, VoiceMatchConfig};
pub use engine::AuthEngine;
pub use error::EngineError;
pub use features::{FeatureVector, KeyEvent, KeystrokeFeatures, NormalizationParams, TrainingSample};
pub use model::{Decision, Model, Trainer, TrainingReport, TrainingStats};
pub use store::ModelStore;
pub use voice::{VoiceFrameFeatures, VoiceMatchResult, VoiceMatcher, VoiceSessionProfile};
