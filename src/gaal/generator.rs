//! Generator network: latent noise to synthetic samples.

use crate::autograd::Tensor;
use crate::error::Result;
use crate::nn::{Linear, Module};

/// Two `d → d` linear stages, each followed by `ReLU`.
///
/// Both stages start as the identity map with zero bias, so before any
/// training the generator returns `relu(latent)`.
///
/// # Examples
///
/// ```
/// use gaal::autograd::Tensor;
/// use gaal::gaal::Generator;
/// use gaal::nn::Module;
///
/// let generator = Generator::new(3);
/// let fake = generator.forward(&Tensor::zeros(&[4, 3])).expect("4x3 latent");
/// assert!(fake.data().iter().all(|&v| v == 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    hidden: Linear,
    output: Linear,
}

impl Generator {
    /// Identity-initialized generator for `n_features`-dimensional data.
    #[must_use]
    pub fn new(n_features: usize) -> Self {
        Self {
            hidden: Linear::identity(n_features),
            output: Linear::identity(n_features),
        }
    }

    /// Dimension of both the latent space and the generated samples.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.hidden.in_features()
    }
}

impl Module for Generator {
    fn forward(&self, latent: &Tensor) -> Result<Tensor> {
        let h = self.hidden.forward(latent)?.relu();
        Ok(self.output.forward(&h)?.relu())
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
