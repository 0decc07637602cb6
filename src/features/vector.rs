//! Feature Vector - Core data structure for model input
//!
//! A feature vector's length is fixed per modality (34 for keystroke) and
//! constant across all samples belonging to one trained model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::keystroke::KeyEvent;
use super::layout::{layout_hash, FEATURE_VERSION};

/// Ordered sequence of floating-point features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Create a zeroed vector of the given length
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Copy into a vector of exactly `dim` features: missing trailing
    /// features become 0, extra trailing features are ignored. This is the
    /// authentication-time tolerance - a length mismatch is never an error.
    pub fn resized(&self, dim: usize) -> FeatureVector {
        let mut values = vec![0.0; dim];
        for (slot, v) in values.iter_mut().zip(self.values.iter()) {
            *slot = *v;
        }
        Self { values }
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}

/// Trait for feature extractors
pub trait FeatureExtractor {
    /// Extract features and update the vector
    fn extract(&self, vector: &mut FeatureVector);
}

/// One enrollment observation: a feature vector plus capture metadata.
///
/// Owned by the enrollment flow until folded into a model. The raw event
/// trace survives training only when privacy mode is disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Position within the enrollment session
    pub index: usize,

    /// Feature layout contract of `features`
    pub feature_version: u8,
    pub layout_hash: u32,

    pub features: FeatureVector,
    pub captured_at: DateTime<Utc>,

    /// Raw key events the vector was derived from, if retained
    pub raw_events: Option<Vec<KeyEvent>>,
}

impl TrainingSample {
    /// Build a keystroke sample stamped with the current layout contract.
    pub fn keystroke(index: usize, features: FeatureVector) -> Self {
        Self {
            index,
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            features,
            captured_at: Utc::now(),
            raw_events: None,
        }
    }

    pub fn with_raw_events(mut self, events: Vec<KeyEvent>) -> Self {
        self.raw_events = Some(events);
        self
    }

    /// Drop the raw trace (privacy mode)
    pub fn strip_raw_events(&mut self) {
        self.raw_events = None;
    }
}
