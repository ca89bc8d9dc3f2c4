//! Discriminator network: probability that a sample is real.

use rand::Rng;

use crate::autograd::Tensor;
use crate::error::Result;
use crate::nn::{Linear, Module, Nonlinearity};

/// Hidden width for a training set of `n_samples`: ⌈√n⌉, at least 1.
#[must_use]
pub fn hidden_width(n_samples: usize) -> usize {
    let n = n_samples as u128;
    let mut h = (n_samples as f64).sqrt() as u128;
    // correct float rounding in either direction; u128 keeps h * h exact
    while h * h > n {
        h -= 1;
    }
    while h * h < n {
        h += 1;
    }
    usize::try_from(h).unwrap_or(usize::MAX).max(1)
}

/// `d → h` linear + `ReLU`, then `h → 1` linear + sigmoid.
///
/// Outputs lie strictly inside (0, 1).
#[derive(Debug, Clone)]
pub struct Discriminator {
    hidden: Linear,
    output: Linear,
}

impl Discriminator {
    /// Discriminator sized for a training set of `n_samples` rows of
    /// `n_features` columns.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(n_features: usize, n_samples: usize, rng: &mut R) -> Self {
        Self::with_hidden_width(n_features, hidden_width(n_samples), rng)
    }

    /// Discriminator with an explicit hidden width.
    ///
    /// The hidden stage is Kaiming-initialized for `ReLU`, the output
    /// stage for sigmoid.
    #[must_use]
    pub fn with_hidden_width<R: Rng + ?Sized>(n_features: usize, hidden: usize, rng: &mut R) -> Self {
        let hidden = hidden.max(1);
        Self {
            hidden: Linear::kaiming(n_features, hidden, Nonlinearity::Relu, rng),
            output: Linear::kaiming(hidden, 1, Nonlinearity::Sigmoid, rng),
        }
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.hidden.in_features()
    }

    #[must_use]
    pub fn hidden_width(&self) -> usize {
        self.hidden.out_features()
    }
}

impl Module for Discriminator {
    fn forward(&self, samples: &Tensor) -> Result<Tensor> {
        let h = self.hidden.forward(samples)?.relu();
        Ok(self.output.forward(&h)?.sigmoid())
    }

    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = self.hidden.parameters();
        params.extend(self.output.parameters());
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.hidden.parameters_mut();
        params.extend(self.output.parameters_mut());
        params
    }
}
