//! Model Module - Training & Authentication Engine
//!
//! - `autoencoder`: the reconstruction network (forward, backprop, serde)
//! - `trainer`: enrollment pipeline producing a persistable Model
//! - `statistical`: legacy mean/std model variant
//! - `authenticator`: verification + Decision assembly
//! - `types`: the persisted model contract

pub mod authenticator;
pub mod autoencoder;
pub mod statistical;
pub mod trainer;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export common types
pub use authenticator::{Authenticator, Decision};
pub use autoencoder::Autoencoder;
pub use trainer::{Trainer, TrainingReport};
pub use types::{AutoencoderModel, Model, StatisticalModel, TrainingStats};
