//! Model Types - persisted model contract
//!
//! The serialized JSON shape is a compatibility contract with existing
//! stored profiles: field names and nesting must not change. A storage
//! collaborator persists/retrieves these blobs verbatim; the engine only
//! produces and consumes them.

use serde::{Deserialize, Serialize};

use super::autoencoder::Autoencoder;
use crate::error::EngineError;
use crate::features::normalizer::NormalizationParams;

/// Summary statistics captured at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStats {
    /// Original enrollment samples
    pub samples: usize,
    /// Size of the training set after augmentation
    pub augmented_samples: usize,
    pub mean_error: f64,
    pub max_error: f64,
    pub min_error: f64,
    /// Average loss of the last training epoch
    pub final_loss: f64,
}

/// Primary model variant: autoencoder weights + scaling + calibrated
/// threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoencoderModel {
    pub input_dim: usize,
    pub normalization_params: NormalizationParams,
    pub threshold: f64,
    pub autoencoder: Autoencoder,
    pub training_stats: TrainingStats,
    /// ISO-8601 creation timestamp
    pub created_at: String,
}

/// Legacy variant: per-feature mean/std plus a percentile threshold.
/// Still loadable and authenticatable so old stored profiles keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalModel {
    pub input_dim: usize,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub threshold: f64,
    pub created_at: String,
}

/// One enrolled identity's model, tagged by `modelType`.
///
/// The authenticator dispatches on the variant rather than assuming one
/// shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "modelType")]
pub enum Model {
    #[serde(rename = "autoencoder")]
    Autoencoder(AutoencoderModel),
    #[serde(rename = "statistical")]
    Statistical(StatisticalModel),
}

impl Model {
    pub fn model_type(&self) -> &'static str {
        match self {
            Model::Autoencoder(_) => "autoencoder",
            Model::Statistical(_) => "statistical",
        }
    }

    pub fn input_dim(&self) -> usize {
        match self {
            Model::Autoencoder(m) => m.input_dim,
            Model::Statistical(m) => m.input_dim,
        }
    }

    pub fn threshold(&self) -> f64 {
        match self {
            Model::Autoencoder(m) => m.threshold,
            Model::Statistical(m) => m.threshold,
        }
    }

    pub fn created_at(&self) -> &str {
        match self {
            Model::Autoencoder(m) => &m.created_at,
            Model::Statistical(m) => &m.created_at,
        }
    }

    /// Serialize to the persisted JSON contract.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a persisted blob. The `modelType` tag is checked first so an
    /// unrecognized variant reports `UnknownModelType` instead of a generic
    /// parse failure.
    pub fn from_json(data: &str) -> Result<Model, EngineError> {
        let value: serde_json::Value = serde_json::from_str(data)?;
        match value.get("modelType").and_then(|t| t.as_str()) {
            Some("autoencoder") | Some("statistical") => Ok(serde_json::from_value(value)?),
            Some(other) => Err(EngineError::UnknownModelType(other.to_string())),
            None => Err(EngineError::UnknownModelType("<missing>".to_string())),
        }
    }
}
