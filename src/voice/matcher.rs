//! Voice Matching - weighted multi-metric profile comparison
//!
//! Scores how alike two session profiles sound. MFCC distance dominates the
//! blend by design; the remaining metrics mostly guard against trivial
//! spoofs that happen to match the spectral envelope. The matcher never
//! makes the accept decision - callers compare `overall_similarity` against
//! their configured threshold.

use serde::{Deserialize, Serialize};

use super::types::VoiceSessionProfile;
use crate::config::VoiceMatchConfig;
use crate::error::EngineError;

// ============================================================================
// METRIC WEIGHTS & SCALES
// ============================================================================

const MFCC_WEIGHT: f64 = 0.6;
const SPECTRAL_WEIGHT: f64 = 0.25;
const VOICE_QUALITY_WEIGHT: f64 = 0.1;
const TEMPORAL_WEIGHT: f64 = 0.03;
const PITCH_WEIGHT: f64 = 0.02;

const MFCC_SCALE: f64 = 2.0;

const CENTROID_SUB_WEIGHT: f64 = 0.4;
const FLATNESS_SUB_WEIGHT: f64 = 0.3;
const ROLLOFF_SUB_WEIGHT: f64 = 0.3;
const CENTROID_SCALE: f64 = 1.0;
const FLATNESS_SCALE: f64 = 0.3;
const ROLLOFF_SCALE: f64 = 1.0;

const JITTER_SUB_WEIGHT: f64 = 0.5;
const SHIMMER_SUB_WEIGHT: f64 = 0.5;
const JITTER_SCALE: f64 = 0.3;
const SHIMMER_SCALE: f64 = 0.3;

const RATE_SUB_WEIGHT: f64 = 0.6;
const ZCR_SUB_WEIGHT: f64 = 0.4;
const RATE_SCALE: f64 = 0.5;
const ZCR_SCALE: f64 = 1.0;

const PITCH_SCALE: f64 = 0.5;
/// Similarity credited to pitch when either profile lacks it
const DEFAULT_PITCH_SIMILARITY: f64 = 0.5;

/// Output of one profile comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceMatchResult {
    pub overall_similarity: f64,
    /// `max(0, 1 - 2 * variance)` over the five sub-scores: high agreement
    /// between metrics yields high confidence
    pub confidence: f64,

    pub mfcc_distance: f64,
    pub mfcc_similarity: f64,
    pub spectral_similarity: f64,
    pub voice_quality_similarity: f64,
    pub temporal_similarity: f64,
    pub pitch_similarity: f64,

    // Raw auxiliary distances, informational only
    pub energy_distance: f64,
    pub spread_distance: f64,
    pub sharpness_distance: f64,
}

pub struct VoiceMatcher {
    config: VoiceMatchConfig,
}

impl VoiceMatcher {
    pub fn new(config: VoiceMatchConfig) -> Self {
        Self { config }
    }

    /// The caller-side accept threshold carried in the configuration
    pub fn match_threshold(&self) -> f64 {
        self.config.match_threshold
    }

    /// Compare an enrolled profile against a live one.
    pub fn match_profiles(
        &self,
        enrolled: &VoiceSessionProfile,
        live: &VoiceSessionProfile,
    ) -> Result<VoiceMatchResult, EngineError> {
        if !enrolled.has_mfcc() || !live.has_mfcc() {
            return Err(EngineError::MissingMfcc);
        }

        // Three independent normalization passes; each touches only the
        // fields it targets
        let a = normalize_gain(&normalize_zcr(&normalize_prosody(enrolled)));
        let b = normalize_gain(&normalize_zcr(&normalize_prosody(live)));

        let mfcc_distance = mfcc_distance(&a.mfcc_mean, &b.mfcc_mean);
        let mfcc_similarity = similarity(mfcc_distance, MFCC_SCALE);

        let spectral_similarity = CENTROID_SUB_WEIGHT
            * similarity(
                (a.spectral_centroid.mean - b.spectral_centroid.mean).abs(),
                CENTROID_SCALE,
            )
            + FLATNESS_SUB_WEIGHT
                * similarity(
                    (a.spectral_flatness.mean - b.spectral_flatness.mean).abs(),
                    FLATNESS_SCALE,
                )
            + ROLLOFF_SUB_WEIGHT
                * similarity(
                    (a.spectral_rolloff.mean - b.spectral_rolloff.mean).abs(),
                    ROLLOFF_SCALE,
                );

        let voice_quality_similarity = JITTER_SUB_WEIGHT
            * similarity(
                (a.jitter.unwrap_or(0.0) - b.jitter.unwrap_or(0.0)).abs(),
                JITTER_SCALE,
            )
            + SHIMMER_SUB_WEIGHT
                * similarity(
                    (a.shimmer.unwrap_or(0.0) - b.shimmer.unwrap_or(0.0)).abs(),
                    SHIMMER_SCALE,
                );

        let temporal_similarity = RATE_SUB_WEIGHT
            * similarity(
                (a.speaking_rate.unwrap_or(0.0) - b.speaking_rate.unwrap_or(0.0)).abs(),
                RATE_SCALE,
            )
            + ZCR_SUB_WEIGHT
                * similarity(
                    (a.zero_crossing_rate.mean - b.zero_crossing_rate.mean).abs(),
                    ZCR_SCALE,
                );

        let pitch_similarity = match (a.pitch_mean, b.pitch_mean) {
            (Some(pa), Some(pb)) => similarity((pa - pb).abs(), PITCH_SCALE),
            _ => DEFAULT_PITCH_SIMILARITY,
        };

        let overall_similarity = MFCC_WEIGHT * mfcc_similarity
            + SPECTRAL_WEIGHT * spectral_similarity
            + VOICE_QUALITY_WEIGHT * voice_quality_similarity
            + TEMPORAL_WEIGHT * temporal_similarity
            + PITCH_WEIGHT * pitch_similarity;

        let sub_scores = [
            mfcc_similarity,
            spectral_similarity,
            voice_quality_similarity,
            temporal_similarity,
            pitch_similarity,
        ];
        let confidence = (1.0 - 2.0 * population_variance(&sub_scores)).max(0.0);

        log::debug!(
            "voice match: overall {:.4} (mfcc {:.4}, spectral {:.4}), confidence {:.4}",
            overall_similarity,
            mfcc_similarity,
            spectral_similarity,
            confidence
        );

        Ok(VoiceMatchResult {
            overall_similarity,
            confidence,
            mfcc_distance,
            mfcc_similarity,
            spectral_similarity,
            voice_quality_similarity,
            temporal_similarity,
            pitch_similarity,
            energy_distance: (a.energy.mean - b.energy.mean).abs(),
            spread_distance: (a.perceptual_spread.mean - b.perceptual_spread.mean).abs(),
            sharpness_distance: (a.perceptual_sharpness.mean - b.perceptual_sharpness.mean).abs(),
        })
    }
}

// ============================================================================
// NORMALIZATION PASSES
// ============================================================================

/// Pitch and speaking rate compare perceptually, i.e. on a relative scale
fn normalize_prosody(profile: &VoiceSessionProfile) -> VoiceSessionProfile {
    let mut p = profile.clone();
    p.pitch_mean = p.pitch_mean.map(f64::ln_1p);
    p.speaking_rate = p.speaking_rate.map(f64::ln_1p);
    p
}

/// Zero-crossing rate is heavy-tailed; compress it
fn normalize_zcr(profile: &VoiceSessionProfile) -> VoiceSessionProfile {
    let mut p = profile.clone();
    p.zero_crossing_rate.mean = p.zero_crossing_rate.mean.ln_1p();
    p
}

/// Volume / recording-gain invariance for the level-dependent features
fn normalize_gain(profile: &VoiceSessionProfile) -> VoiceSessionProfile {
    let mut p = profile.clone();
    p.rms.mean = p.rms.mean.ln_1p();
    p.energy.mean = p.energy.mean.ln_1p();
    p.spectral_centroid.mean = p.spectral_centroid.mean.ln_1p();
    p
}

// ============================================================================
// METRIC HELPERS
// ============================================================================

/// RMS distance over the coefficient overlap of two MFCC mean vectors
fn mfcc_distance(a: &[f64], b: &[f64]) -> f64 {
    let overlap = a.len().min(b.len());
    if overlap == 0 {
        return 0.0;
    }
    let sq_sum: f64 = a
        .iter()
        .zip(b.iter())
        .take(overlap)
        .map(|(x, y)| (x - y).powi(2))
        .sum();
    (sq_sum / overlap as f64).sqrt()
}

/// Bounded similarity: `max(0, 1 - distance / scale)`
fn similarity(distance: f64, scale: f64) -> f64 {
    (1.0 - distance / scale).max(0.0)
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mfcc_rejected() {
        let with = VoiceSessionProfile {
            mfcc_mean: vec![1.0, 2.0],
            ..Default::default()
        };
        let without = VoiceSessionProfile::default();
        let matcher = VoiceMatcher::new(VoiceMatchConfig::default());

        assert!(matches!(
            matcher.match_profiles(&with, &without),
            Err(EngineError::MissingMfcc)
        ));
        assert!(matches!(
            matcher.match_profiles(&without, &with),
            Err(EngineError::MissingMfcc)
        ));
    }

    #[test]
    fn test_mfcc_distance_overlap() {
        assert_eq!(mfcc_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0]), 0.0);
        let d = mfcc_distance(&[0.0, 0.0], &[3.0, 4.0]);
        // sqrt((9 + 16) / 2)
        assert!((d - (12.5f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity(0.0, 2.0), 1.0);
        assert_eq!(similarity(2.0, 2.0), 0.0);
        assert_eq!(similarity(100.0, 2.0), 0.0);
        assert!((similarity(1.0, 2.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalization_passes_only_touch_targets() {
        let profile = VoiceSessionProfile {
            mfcc_mean: vec![1.0],
            pitch_mean: Some(100.0),
            speaking_rate: Some(2.0),
            ..Default::default()
        };

        let prosody = normalize_prosody(&profile);
        assert!((prosody.pitch_mean.unwrap() - 101.0f64.ln()).abs() < 1e-12);
        assert_eq!(prosody.mfcc_mean, profile.mfcc_mean);
        assert_eq!(prosody.rms, profile.rms);

        let gain = normalize_gain(&profile);
        assert_eq!(gain.pitch_mean, profile.pitch_mean);
        assert_eq!(gain.spectral_flatness, profile.spectral_flatness);
    }

    #[test]
    fn test_pitch_defaults_when_absent() {
        let a = VoiceSessionProfile {
            mfcc_mean: vec![1.0],
            ..Default::default()
        };
        let matcher = VoiceMatcher::new(VoiceMatchConfig::default());
        let result = matcher.match_profiles(&a, &a.clone()).unwrap();
        assert_eq!(result.pitch_similarity, DEFAULT_PITCH_SIMILARITY);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total = MFCC_WEIGHT + SPECTRAL_WEIGHT + VOICE_QUALITY_WEIGHT + TEMPORAL_WEIGHT + PITCH_WEIGHT;
        assert!((total - 1.0).abs() < 1e-12);
        assert!((CENTROID_SUB_WEIGHT + FLATNESS_SUB_WEIGHT + ROLLOFF_SUB_WEIGHT - 1.0).abs() < 1e-12);
        assert!((RATE_SUB_WEIGHT + ZCR_SUB_WEIGHT - 1.0).abs() < 1e-12);
    }
}
