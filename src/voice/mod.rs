//! Voice Module - Session Profiles & Similarity Matching
//!
//! - `types`: per-frame features + session profile
//! - `aggregator`: frames -> statistical profile
//! - `prosody`: approximate pitch/jitter/shimmer/rate stand-ins
//! - `matcher`: weighted multi-metric similarity scoring

pub mod aggregator;
pub mod matcher;
pub mod prosody;
pub mod types;


// Re-export common types
pub use aggregator::aggregate;
pub use matcher::{VoiceMatchResult, VoiceMatcher};
pub use types::{FeatureStat, VoiceFrameFeatures, VoiceSessionProfile};
