//! Voice Feature Aggregation
//!
//! Reduces a sequence of per-frame features into one session-level profile.
//! Variances are the biased population form `E[X^2] - E[X]^2` - the exact
//! formula matters for compatibility with stored profiles, so no Bessel
//! correction.

use super::prosody;
use super::types::{FeatureStat, VoiceFrameFeatures, VoiceSessionProfile};
use crate::error::EngineError;

/// Aggregate all frames of one recording into a session profile.
pub fn aggregate(frames: &[VoiceFrameFeatures]) -> Result<VoiceSessionProfile, EngineError> {
    if frames.is_empty() {
        return Err(EngineError::EmptyFrameSet);
    }

    let n = frames.len() as f64;

    // MFCC is vector-valued: mean/variance per coefficient, over the
    // coefficient count every frame actually has
    let coeffs = frames.iter().map(|f| f.mfcc.len()).min().unwrap_or(0);
    let mut mfcc_sum = vec![0.0; coeffs];
    let mut mfcc_sq_sum = vec![0.0; coeffs];
    for frame in frames {
        for i in 0..coeffs {
            mfcc_sum[i] += frame.mfcc[i];
            mfcc_sq_sum[i] += frame.mfcc[i] * frame.mfcc[i];
        }
    }
    let mfcc_mean: Vec<f64> = mfcc_sum.iter().map(|s| s / n).collect();
    let mfcc_variance: Vec<f64> = mfcc_sq_sum
        .iter()
        .zip(mfcc_mean.iter())
        .map(|(sq, m)| sq / n - m * m)
        .collect();

    let prosody = prosody::estimate(frames);

    log::debug!(
        "aggregated {} frames into profile ({} MFCC coefficients)",
        frames.len(),
        coeffs
    );

    Ok(VoiceSessionProfile {
        frames: frames.len(),
        mfcc_mean,
        mfcc_variance,
        spectral_centroid: stat_of(frames, |f| f.spectral_centroid),
        spectral_flatness: stat_of(frames, |f| f.spectral_flatness),
        spectral_rolloff: stat_of(frames, |f| f.spectral_rolloff),
        zero_crossing_rate: stat_of(frames, |f| f.zero_crossing_rate),
        rms: stat_of(frames, |f| f.rms),
        energy: stat_of(frames, |f| f.energy),
        perceptual_spread: stat_of(frames, |f| f.perceptual_spread),
        perceptual_sharpness: stat_of(frames, |f| f.perceptual_sharpness),
        pitch_mean: prosody.pitch_mean,
        jitter: prosody.jitter,
        shimmer: prosody.shimmer,
        speaking_rate: prosody.speaking_rate,
    })
}

/// Running mean + `E[X^2] - E[X]^2` variance of one scalar feature
fn stat_of(frames: &[VoiceFrameFeatures], pick: impl Fn(&VoiceFrameFeatures) -> f64) -> FeatureStat {
    let n = frames.len() as f64;
    let mut sum = 0.0;
    let mut sq_sum = 0.0;
    for frame in frames {
        let v = pick(frame);
        sum += v;
        sq_sum += v * v;
    }
    let mean = sum / n;
    FeatureStat {
        mean,
        variance: sq_sum / n - mean * mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frames_rejected() {
        assert!(matches!(aggregate(&[]), Err(EngineError::EmptyFrameSet)));
    }

    #[test]
    fn test_scalar_mean_and_population_variance() {
        let frames = vec![
            VoiceFrameFeatures {
                energy: 2.0,
                ..Default::default()
            },
            VoiceFrameFeatures {
                energy: 4.0,
                ..Default::default()
            },
        ];
        let profile = aggregate(&frames).unwrap();

        assert_eq!(profile.energy.mean, 3.0);
        // Population variance of {2, 4}: E[X^2] - E[X]^2 = 10 - 9 = 1
        // (Bessel-corrected would be 2)
        assert_eq!(profile.energy.variance, 1.0);
    }

    #[test]
    fn test_mfcc_per_coefficient() {
        let frames = vec![
            VoiceFrameFeatures {
                mfcc: vec![1.0, 10.0],
                ..Default::default()
            },
            VoiceFrameFeatures {
                mfcc: vec![3.0, 10.0],
                ..Default::default()
            },
        ];
        let profile = aggregate(&frames).unwrap();

        assert_eq!(profile.mfcc_mean, vec![2.0, 10.0]);
        assert_eq!(profile.mfcc_variance[0], 1.0);
        assert_eq!(profile.mfcc_variance[1], 0.0);
    }

    #[test]
    fn test_mfcc_uses_common_coefficient_count() {
        let frames = vec![
            VoiceFrameFeatures {
                mfcc: vec![1.0, 2.0, 3.0],
                ..Default::default()
            },
            VoiceFrameFeatures {
                mfcc: vec![5.0, 6.0],
                ..Default::default()
            },
        ];
        let profile = aggregate(&frames).unwrap();
        assert_eq!(profile.mfcc_mean.len(), 2);
        assert_eq!(profile.mfcc_mean, vec![3.0, 4.0]);
    }

    #[test]
    fn test_prosody_filled_when_present() {
        let frames: Vec<_> = (0..5)
            .map(|_| VoiceFrameFeatures {
                mfcc: vec![1.0],
                rms: 0.5,
                pitch: Some(120.0),
                ..Default::default()
            })
            .collect();
        let profile = aggregate(&frames).unwrap();

        assert_eq!(profile.pitch_mean, Some(120.0));
        assert_eq!(profile.jitter, Some(0.0));
        assert_eq!(profile.shimmer, Some(0.0));
        assert_eq!(profile.frames, 5);
    }
}
