//! Keystroke Feature Layout - Centralized Feature Definition
//!
//! **This file controls the keystroke feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature -> increment FEATURE_VERSION
//! 2. Change order -> increment FEATURE_VERSION
//! 3. Remove feature -> increment FEATURE_VERSION
//!
//! ## Why versioning matters:
//! - Enrolled model compatibility
//! - Stored-sample replay
//! - Cross-version migrations

use crc32fast::Hasher;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector.
/// This is the SINGLE SOURCE OF TRUTH for the keystroke layout.
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Dwell / hold times, ms (0-5) ===
    "dwell_mean",          // 0: Mean key hold duration
    "dwell_std",           // 1: Hold duration spread
    "dwell_min",           // 2
    "dwell_max",           // 3
    "dwell_median",        // 4
    "dwell_iqr",           // 5: Interquartile range of hold durations

    // === Flight times, ms (6-11) ===
    "flight_mean",         // 6: Mean release-to-next-press interval
    "flight_std",          // 7
    "flight_min",          // 8: Negative when keys overlap (rollover)
    "flight_max",          // 9
    "flight_median",       // 10
    "flight_iqr",          // 11

    // === Down-down digraph latencies, ms (12-17) ===
    "dd_latency_mean",     // 12: Press-to-next-press interval
    "dd_latency_std",      // 13
    "dd_latency_min",      // 14
    "dd_latency_max",      // 15
    "dd_latency_median",   // 16
    "dd_latency_iqr",      // 17

    // === Up-up latencies, ms (18-23) ===
    "uu_latency_mean",     // 18: Release-to-next-release interval
    "uu_latency_std",      // 19
    "uu_latency_min",      // 20
    "uu_latency_max",      // 21
    "uu_latency_median",   // 22
    "uu_latency_iqr",      // 23

    // === Rhythm / tempo (24-33) ===
    "typing_speed",        // 24: Keys per second over the whole trace
    "pause_rate",          // 25: Fraction of flights above the pause cutoff
    "pause_ratio",         // 26: Paused time over total trace duration
    "rhythm_consistency",  // 27: 1/(1+cv) of flight times
    "dwell_flight_ratio",  // 28: dwell_mean / flight_mean
    "backspace_rate",      // 29: Backspace presses per keystroke
    "special_key_rate",    // 30: Non-character keys per keystroke
    "rollover_rate",       // 31: Fraction of negative flights
    "overlap_mean",        // 32: Mean overlap duration when keys roll over
    "tempo_drift",         // 33: Late-half flight mean minus early-half
];

/// Total number of keystroke features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 34;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout.
/// Used to detect layout mismatches between stored samples and the engine.
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all feature names in order
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash (inputs are const, so the value never changes at runtime)
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

/// Look up a feature's index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Look up a feature's name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}
