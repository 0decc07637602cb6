//! Prosody Scalars - approximate stand-in estimators
//!
//! Jitter, shimmer, and speaking rate derived from the frame sequence's
//! pitch and RMS tracks. These are rough heuristics standing in for real
//! signal-processing estimators; their approximate behavior is part of the
//! engine's contract and is reproduced, not improved.

use super::types::VoiceFrameFeatures;

/// Energy must rise past this fraction of the mean RMS to count as an onset
const ONSET_RMS_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct ProsodyEstimate {
    pub pitch_mean: Option<f64>,
    pub jitter: Option<f64>,
    pub shimmer: Option<f64>,
    pub speaking_rate: Option<f64>,
}

/// Derive the optional prosody scalars from a frame sequence.
pub fn estimate(frames: &[VoiceFrameFeatures]) -> ProsodyEstimate {
    let mut estimate = ProsodyEstimate::default();

    // Pitch mean + jitter over the voiced frames
    let pitch_track: Vec<f64> = frames.iter().filter_map(|f| f.pitch).collect();
    if !pitch_track.is_empty() {
        let mean = pitch_track.iter().sum::<f64>() / pitch_track.len() as f64;
        estimate.pitch_mean = Some(mean);

        if pitch_track.len() >= 2 && mean > 0.0 {
            // Mean absolute cycle-to-cycle change, relative to the mean pitch
            let delta_sum: f64 = pitch_track.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
            estimate.jitter = Some(delta_sum / (pitch_track.len() - 1) as f64 / mean);
        }
    }

    // Shimmer over the RMS track
    if frames.len() >= 2 {
        let rms_track: Vec<f64> = frames.iter().map(|f| f.rms).collect();
        let rms_mean = rms_track.iter().sum::<f64>() / rms_track.len() as f64;
        if rms_mean > 0.0 {
            let delta_sum: f64 = rms_track.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
            estimate.shimmer = Some(delta_sum / (rms_track.len() - 1) as f64 / rms_mean);

            // Speaking rate: energy onsets per frame (rough estimate)
            let cutoff = rms_mean * ONSET_RMS_FACTOR;
            let mut onsets = 0usize;
            for pair in rms_track.windows(2) {
                if pair[0] < cutoff && pair[1] >= cutoff {
                    onsets += 1;
                }
            }
            estimate.speaking_rate = Some(onsets as f64 / frames.len() as f64);
        }
    }

    estimate
}
