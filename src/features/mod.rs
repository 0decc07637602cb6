//! Features Module - Feature Vectors, Layout, Extraction, Normalization
//!
//! - `layout`: versioned 34-feature keystroke schema
//! - `keystroke`: raw key-event trace -> feature vector
//! - `vector`: FeatureVector / TrainingSample core types
//! - `normalizer`: min/max scaling + augmentation

pub mod keystroke;
pub mod layout;
pub mod normalizer;
pub mod vector;


// Re-export common types
pub use keystroke::{KeyEvent, KeystrokeFeatures};
pub use layout::{FEATURE_COUNT, FEATURE_VERSION};
pub use normalizer::NormalizationParams;
pub use vector::{FeatureExtractor, FeatureVector, TrainingSample};
