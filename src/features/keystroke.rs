//! Keystroke Feature Extraction
//!
//! Folds a raw key-event trace (press/release timestamps) into the 34-feature
//! vector defined by `layout.rs`. Capturing the events from an OS or browser
//! is a collaborator concern; this module only does the arithmetic.

use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;
use super::vector::{FeatureExtractor, FeatureVector};

/// Flight times above this cutoff count as pauses (ms)
pub const PAUSE_THRESHOLD_MS: f64 = 500.0;

/// One captured key press/release pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key label as reported by the capture layer ("a", "Shift", "Backspace")
    pub key: String,
    /// Press timestamp, ms from an arbitrary origin
    pub press_ms: f64,
    /// Release timestamp, ms from the same origin
    pub release_ms: f64,
}

impl KeyEvent {
    pub fn new(key: &str, press_ms: f64, release_ms: f64) -> Self {
        Self {
            key: key.to_string(),
            press_ms,
            release_ms,
        }
    }

    /// Duration the key was held down (dwell/hold time)
    pub fn dwell(&self) -> f64 {
        self.release_ms - self.press_ms
    }

    fn is_backspace(&self) -> bool {
        self.key == "Backspace"
    }

    /// Multi-character labels are control/modifier keys
    fn is_special(&self) -> bool {
        self.key.chars().count() > 1
    }
}

/// Summary statistics over one timing series.
#[derive(Debug, Clone, Default)]
pub struct SeriesStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub iqr: f64,
}

impl SeriesStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            mean,
            std: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: percentile_sorted(&sorted, 0.5),
            iqr: percentile_sorted(&sorted, 0.75) - percentile_sorted(&sorted, 0.25),
        }
    }

    fn write(&self, vector: &mut FeatureVector, base: usize) {
        vector.values[base] = self.mean;
        vector.values[base + 1] = self.std;
        vector.values[base + 2] = self.min;
        vector.values[base + 3] = self.max;
        vector.values[base + 4] = self.median;
        vector.values[base + 5] = self.iqr;
    }
}

/// Nearest-rank percentile over an already sorted series
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * p).floor() as usize;
    sorted[idx]
}

/// Keystroke timing features for one typed sample.
#[derive(Debug, Clone, Default)]
pub struct KeystrokeFeatures {
    dwells: Vec<f64>,
    flights: Vec<f64>,
    dd_latencies: Vec<f64>,
    uu_latencies: Vec<f64>,
    total_duration_ms: f64,
    event_count: usize,
    backspace_count: usize,
    special_count: usize,
}

impl KeystrokeFeatures {
    /// Derive the timing series from a trace. Events are assumed ordered by
    /// press time; out-of-order traces are sorted first.
    pub fn from_events(events: &[KeyEvent]) -> Self {
        let mut ordered = events.to_vec();
        ordered.sort_by(|a, b| {
            a.press_ms
                .partial_cmp(&b.press_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut features = Self {
            event_count: ordered.len(),
            ..Default::default()
        };

        for event in &ordered {
            features.dwells.push(event.dwell());
            if event.is_backspace() {
                features.backspace_count += 1;
            } else if event.is_special() {
                features.special_count += 1;
            }
        }

        for pair in ordered.windows(2) {
            features.flights.push(pair[1].press_ms - pair[0].release_ms);
            features.dd_latencies.push(pair[1].press_ms - pair[0].press_ms);
            features
                .uu_latencies
                .push(pair[1].release_ms - pair[0].release_ms);
        }

        if let (Some(first), Some(last)) = (ordered.first(), ordered.last()) {
            features.total_duration_ms = last.release_ms - first.press_ms;
        }

        features
    }

    /// Keys per second over the whole trace
    pub fn typing_speed(&self) -> f64 {
        if self.total_duration_ms > 0.0 {
            self.event_count as f64 / (self.total_duration_ms / 1000.0)
        } else {
            0.0
        }
    }

    /// Fraction of flights above the pause cutoff
    pub fn pause_rate(&self) -> f64 {
        ratio(
            self.flights
                .iter()
                .filter(|&&f| f > PAUSE_THRESHOLD_MS)
                .count(),
            self.flights.len(),
        )
    }

    /// Paused time over total trace duration
    pub fn pause_ratio(&self) -> f64 {
        if self.total_duration_ms <= 0.0 {
            return 0.0;
        }
        let paused: f64 = self
            .flights
            .iter()
            .filter(|&&f| f > PAUSE_THRESHOLD_MS)
            .sum();
        paused / self.total_duration_ms
    }

    /// 1/(1+cv) of flight times; 1.0 means perfectly even tempo
    pub fn rhythm_consistency(&self) -> f64 {
        let stats = SeriesStats::from_values(&self.flights);
        if stats.mean > 0.0 {
            1.0 / (1.0 + stats.std / stats.mean)
        } else {
            0.0
        }
    }

    /// Fraction of negative flights (next key pressed before release)
    pub fn rollover_rate(&self) -> f64 {
        ratio(
            self.flights.iter().filter(|&&f| f < 0.0).count(),
            self.flights.len(),
        )
    }

    /// Mean overlap duration across rolled-over key pairs
    pub fn overlap_mean(&self) -> f64 {
        let overlaps: Vec<f64> = self
            .flights
            .iter()
            .filter(|&&f| f < 0.0)
            .map(|f| -f)
            .collect();
        if overlaps.is_empty() {
            0.0
        } else {
            overlaps.iter().sum::<f64>() / overlaps.len() as f64
        }
    }

    /// Late-half flight mean minus early-half flight mean; positive values
    /// mean the typist slowed down over the sample
    pub fn tempo_drift(&self) -> f64 {
        if self.flights.len() < 2 {
            return 0.0;
        }
        let mid = self.flights.len() / 2;
        let early = &self.flights[..mid];
        let late = &self.flights[mid..];
        let early_mean = early.iter().sum::<f64>() / early.len() as f64;
        let late_mean = late.iter().sum::<f64>() / late.len() as f64;
        late_mean - early_mean
    }

    pub fn backspace_rate(&self) -> f64 {
        ratio(self.backspace_count, self.event_count)
    }

    pub fn special_key_rate(&self) -> f64 {
        ratio(self.special_count, self.event_count)
    }

    /// Convenience: extract the full 34-feature vector from a trace
    pub fn vector_from_events(events: &[KeyEvent]) -> FeatureVector {
        let mut vector = FeatureVector::new(FEATURE_COUNT);
        Self::from_events(events).extract(&mut vector);
        vector
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 / total as f64
    } else {
        0.0
    }
}

impl FeatureExtractor for KeystrokeFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        // Layout indices, see layout.rs
        SeriesStats::from_values(&self.dwells).write(vector, 0);
        let flight_stats = SeriesStats::from_values(&self.flights);
        flight_stats.write(vector, 6);
        SeriesStats::from_values(&self.dd_latencies).write(vector, 12);
        SeriesStats::from_values(&self.uu_latencies).write(vector, 18);

        vector.values[24] = self.typing_speed();
        vector.values[25] = self.pause_rate();
        vector.values[26] = self.pause_ratio();
        vector.values[27] = self.rhythm_consistency();
        vector.values[28] = if flight_stats.mean > 0.0 {
            SeriesStats::from_values(&self.dwells).mean / flight_stats.mean
        } else {
            0.0
        };
        vector.values[29] = self.backspace_rate();
        vector.values[30] = self.special_key_rate();
        vector.values[31] = self.rollover_rate();
        vector.values[32] = self.overlap_mean();
        vector.values[33] = self.tempo_drift();
    }
}
