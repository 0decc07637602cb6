//! Voice Types - per-frame features and session profiles

use serde::{Deserialize, Serialize};

/// Features of one audio frame, extracted upstream by an audio-feature
/// collaborator. The engine never touches raw audio buffers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceFrameFeatures {
    /// Mel-frequency cepstral coefficients
    pub mfcc: Vec<f64>,

    pub spectral_centroid: f64,
    pub spectral_flatness: f64,
    pub spectral_rolloff: f64,
    pub zero_crossing_rate: f64,
    pub rms: f64,
    pub energy: f64,
    pub perceptual_spread: f64,
    pub perceptual_sharpness: f64,

    /// Fundamental frequency estimate for this frame, when the upstream
    /// extractor produced one
    pub pitch: Option<f64>,
}

/// Mean and biased population variance of one feature across a recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStat {
    pub mean: f64,
    pub variance: f64,
}

/// Session-level statistical profile of one recording.
///
/// Created once per recording; two profiles (stored vs. live) are only ever
/// compared, never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSessionProfile {
    /// Number of frames the profile was aggregated from
    pub frames: usize,

    /// Per-coefficient MFCC means/variances
    pub mfcc_mean: Vec<f64>,
    pub mfcc_variance: Vec<f64>,

    pub spectral_centroid: FeatureStat,
    pub spectral_flatness: FeatureStat,
    pub spectral_rolloff: FeatureStat,
    pub zero_crossing_rate: FeatureStat,
    pub rms: FeatureStat,
    pub energy: FeatureStat,
    pub perceptual_spread: FeatureStat,
    pub perceptual_sharpness: FeatureStat,

    /// Optional prosody scalars (approximate stand-in estimates)
    pub pitch_mean: Option<f64>,
    pub jitter: Option<f64>,
    pub shimmer: Option<f64>,
    pub speaking_rate: Option<f64>,
}

impl VoiceSessionProfile {
    /// True when the profile carries MFCC data usable for matching
    pub fn has_mfcc(&self) -> bool {
        !self.mfcc_mean.is_empty()
    }
}
