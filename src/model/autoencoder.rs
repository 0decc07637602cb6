//! Autoencoder - compact feed-forward reconstruction network
//!
//! Three dense layers (input -> hidden -> bottleneck -> output) with ReLU on
//! the encoder layers and a clamped sigmoid on the output. Training is
//! online (per-sample) gradient descent, so the order of samples affects the
//! learned weights; that order sensitivity is an explicit, reproducible
//! property of the engine.
//!
//! Canonical choices (implemented once, here):
//! - Xavier-style init scale `sqrt(2 / fan_in)`
//! - sigmoid input clamped to [-500, 500] to avoid overflow

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::features::vector::FeatureVector;

/// Span of the small uniform bias initialization
const BIAS_INIT_SPAN: f64 = 0.01;

/// How often the training loop reports progress
const EPOCH_LOG_INTERVAL: usize = 50;

/// Activations from one forward pass.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub hidden: Array1<f64>,
    pub bottleneck: Array1<f64>,
    pub output: Array1<f64>,
}

/// The network itself. Weight matrices are stored encoder-style:
/// `weights1` is input x hidden, `weights2` hidden x bottleneck,
/// `weights3` bottleneck x input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Autoencoder {
    pub input_size: usize,
    pub hidden_size: usize,
    pub bottleneck_size: usize,

    #[serde(with = "serde_matrix")]
    pub weights1: Array2<f64>,
    #[serde(with = "serde_matrix")]
    pub weights2: Array2<f64>,
    #[serde(with = "serde_matrix")]
    pub weights3: Array2<f64>,

    #[serde(with = "serde_vector")]
    pub biases1: Array1<f64>,
    #[serde(with = "serde_vector")]
    pub biases2: Array1<f64>,
    #[serde(with = "serde_vector")]
    pub biases3: Array1<f64>,
}

impl Autoencoder {
    /// Allocate a network with Xavier-scaled random weights and small random
    /// biases. All randomness comes from the injected rng.
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        bottleneck_size: usize,
        rng: &mut StdRng,
    ) -> Self {
        Self {
            input_size,
            hidden_size,
            bottleneck_size,
            weights1: xavier(input_size, hidden_size, rng),
            weights2: xavier(hidden_size, bottleneck_size, rng),
            weights3: xavier(bottleneck_size, input_size, rng),
            biases1: small_random(hidden_size, rng),
            biases2: small_random(bottleneck_size, rng),
            biases3: small_random(input_size, rng),
        }
    }

    /// Run the three dense layers. Deterministic given fixed weights.
    /// `input` must have exactly `input_size` elements.
    pub fn forward(&self, input: &[f64]) -> ForwardPass {
        debug_assert_eq!(input.len(), self.input_size);
        let x = ArrayView1::from(input);

        let mut hidden = x.dot(&self.weights1) + &self.biases1;
        hidden.mapv_inplace(relu);

        let mut bottleneck = hidden.dot(&self.weights2) + &self.biases2;
        bottleneck.mapv_inplace(relu);

        let mut output = bottleneck.dot(&self.weights3) + &self.biases3;
        output.mapv_inplace(sigmoid);

        ForwardPass {
            hidden,
            bottleneck,
            output,
        }
    }

    /// Reconstruction only; no mutation.
    pub fn predict(&self, input: &[f64]) -> Vec<f64> {
        self.forward(input).output.to_vec()
    }

    /// One pass over all samples with per-sample weight updates. Returns the
    /// average reconstruction loss across the epoch.
    pub fn train_epoch(&mut self, samples: &[FeatureVector], learning_rate: f64) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mut total_loss = 0.0;
        for sample in samples {
            total_loss += self.backprop(sample.as_slice(), learning_rate);
        }
        total_loss / samples.len() as f64
    }

    /// Full training run; one average-loss entry per epoch.
    pub fn train(
        &mut self,
        samples: &[FeatureVector],
        epochs: usize,
        learning_rate: f64,
    ) -> Vec<f64> {
        let mut loss_history = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let avg_loss = self.train_epoch(samples, learning_rate);
            loss_history.push(avg_loss);

            if (epoch + 1) % EPOCH_LOG_INTERVAL == 0 {
                log::debug!("epoch {}/{}: avg loss {:.6}", epoch + 1, epochs, avg_loss);
            }
        }
        loss_history
    }

    /// Forward, compute deltas against the pre-update weights, then apply
    /// one gradient step toward lower reconstruction error. Returns the
    /// sample's loss (measured before the update).
    fn backprop(&mut self, input: &[f64], learning_rate: f64) -> f64 {
        let x = ArrayView1::from(input);
        let pass = self.forward(input);

        let loss = input
            .iter()
            .zip(pass.output.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            / input.len().max(1) as f64;

        // Output layer: (target - output) * sigmoid'(output)
        let mut delta_out = Array1::<f64>::zeros(self.input_size);
        for j in 0..self.input_size {
            let o = pass.output[j];
            delta_out[j] = (x[j] - o) * o * (1.0 - o);
        }

        // Propagate through the encoder, gating by the ReLU derivative
        let mut delta_bottleneck = self.weights3.dot(&delta_out);
        for (d, &z) in delta_bottleneck.iter_mut().zip(pass.bottleneck.iter()) {
            if z <= 0.0 {
                *d = 0.0;
            }
        }

        let mut delta_hidden = self.weights2.dot(&delta_bottleneck);
        for (d, &h) in delta_hidden.iter_mut().zip(pass.hidden.iter()) {
            if h <= 0.0 {
                *d = 0.0;
            }
        }

        self.weights3
            .scaled_add(learning_rate, &outer(pass.bottleneck.view(), delta_out.view()));
        self.biases3.scaled_add(learning_rate, &delta_out);

        self.weights2
            .scaled_add(learning_rate, &outer(pass.hidden.view(), delta_bottleneck.view()));
        self.biases2.scaled_add(learning_rate, &delta_bottleneck);

        self.weights1
            .scaled_add(learning_rate, &outer(x, delta_hidden.view()));
        self.biases1.scaled_add(learning_rate, &delta_hidden);

        loss
    }
}

/// Mean-squared difference between an input and its reconstruction.
pub fn reconstruction_error(input: &[f64], output: &[f64]) -> f64 {
    if input.is_empty() {
        return 0.0;
    }
    input
        .iter()
        .zip(output.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        / input.len() as f64
}

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

fn sigmoid(x: f64) -> f64 {
    let x = x.clamp(-500.0, 500.0);
    1.0 / (1.0 + (-x).exp())
}

fn xavier(fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Array2<f64> {
    let scale = (2.0 / fan_in.max(1) as f64).sqrt();
    Array2::from_shape_fn((fan_in, fan_out), |_| rng.gen_range(-1.0..1.0) * scale)
}

fn small_random(len: usize, rng: &mut StdRng) -> Array1<f64> {
    Array1::from_shape_fn(len, |_| rng.gen_range(-BIAS_INIT_SPAN..BIAS_INIT_SPAN))
}

fn outer(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array2<f64> {
    let col = a.insert_axis(Axis(1));
    let row = b.insert_axis(Axis(0));
    col.dot(&row)
}

// ============================================================================
// SERDE - persisted weights are plain nested JSON arrays
// ============================================================================

mod serde_matrix {
    use ndarray::Array2;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(m: &Array2<f64>, s: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<f64>> = m.outer_iter().map(|r| r.to_vec()).collect();
        rows.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Array2<f64>, D::Error> {
        let rows: Vec<Vec<f64>> = Vec::deserialize(d)?;
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(D::Error::custom("ragged weight matrix"));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((nrows, ncols), flat).map_err(D::Error::custom)
    }
}

mod serde_vector {
    use ndarray::Array1;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Array1<f64>, s: S) -> Result<S::Ok, S::Error> {
        v.to_vec().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Array1<f64>, D::Error> {
        Ok(Array1::from_vec(Vec::deserialize(d)?))
    }
}
