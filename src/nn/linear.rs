//! Fully connected (linear) layer.
//!
//! Implements the transformation y = xW^T + b.

use rand::Rng;

use super::init::{eye, fan_in_uniform, kaiming_normal, zeros, Nonlinearity};
use super::module::Module;
use crate::autograd::Tensor;
use crate::error::Result;

/// Fully connected layer: y = xW^T + b
///
/// # Shape
///
/// - Input: `(batch, in_features)`
/// - Output: `(batch, out_features)`
///
/// # Example
///
/// ```
/// use gaal::autograd::Tensor;
/// use gaal::nn::{Linear, Module};
///
/// let layer = Linear::identity(3);
/// let x = Tensor::new(&[1.0, -2.0, 3.0], &[1, 3]);
/// assert_eq!(layer.forward(&x).expect("1x3 input").data(), &[1.0, -2.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Linear {
    /// Weight matrix, shape: [out_features, in_features]
    weight: Tensor,

    /// Bias vector, shape: [out_features]
    bias: Tensor,

    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Square layer starting as the identity map: W = I, b = 0.
    #[must_use]
    pub fn identity(features: usize) -> Self {
        Self::from_parts(eye(features), zeros(&[features]))
    }

    /// Kaiming-normal weights (fan-in mode, gain for `nonlinearity`) and
    /// a U(-1/√in, 1/√in) bias.
    #[must_use]
    pub fn kaiming<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        nonlinearity: Nonlinearity,
        rng: &mut R,
    ) -> Self {
        let weight = kaiming_normal(&[out_features, in_features], in_features, nonlinearity, rng);
        let bias = fan_in_uniform(out_features, in_features, rng);
        Self::from_parts(weight, bias)
    }

    /// Build a layer from explicit parameters.
    ///
    /// # Panics
    ///
    /// Panics if `weight` is not 2D or `bias` length differs from the
    /// weight's row count.
    #[must_use]
    pub fn from_parts(weight: Tensor, bias: Tensor) -> Self {
        assert_eq!(weight.ndim(), 2, "Linear weight must be 2D");
        let (out_features, in_features) = (weight.shape()[0], weight.shape()[1]);
        assert_eq!(
            bias.shape(),
            &[out_features],
            "Linear bias must have shape [{out_features}]"
        );

        Self {
            weight: weight.detach().requires_grad(),
            bias: bias.detach().requires_grad(),
            in_features,
            out_features,
        }
    }

    /// Get the input feature dimension.
    #[must_use]
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Get the output feature dimension.
    #[must_use]
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// Get reference to weight tensor.
    #[must_use]
    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    /// Get reference to bias tensor.
    #[must_use]
    pub fn bias(&self) -> &Tensor {
        &self.bias
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        // W^T is rebuilt every pass: the optimizer edits W in place
        Ok(input
            .matmul(&self.weight.transpose())?
            .broadcast_add(&self.bias))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weight, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weight, &mut self.bias]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{clear_graph, get_grad};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_linear_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let layer = Linear::kaiming(10, 5, Nonlinearity::Relu, &mut rng);
        let x = Tensor::ones(&[32, 10]);
        let y = layer.forward(&x).expect("forward");

        assert_eq!(y.shape(), &[32, 5]);
        assert_eq!(layer.in_features(), 10);
        assert_eq!(layer.out_features(), 5);
    }

    #[test]
    fn test_identity_is_pass_through() {
        let layer = Linear::identity(2);
        let x = Tensor::new(&[1.5, -0.5, 0.0, 4.0], &[2, 2]);
        assert_eq!(layer.forward(&x).expect("forward").data(), x.data());
    }

    #[test]
    fn test_linear_parameters() {
        let layer = Linear::identity(4);
        let params = layer.parameters();

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].shape(), &[4, 4]);
        assert_eq!(params[1].shape(), &[4]);
        assert!(params.iter().all(|p| p.requires_grad_enabled()));
        assert_eq!(layer.num_parameters(), 20);
    }

    #[test]
    fn test_from_parts_computes_affine_map() {
        let layer = Linear::from_parts(
            Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]),
            Tensor::from_slice(&[0.5, -0.5]),
        );
        let x = Tensor::new(&[1.0, 0.0, -1.0], &[1, 3]);
        // [1 - 3 + 0.5, 4 - 6 - 0.5]
        assert_eq!(layer.forward(&x).expect("forward").data(), &[-1.5, -2.5]);
    }

    #[test]
    #[should_panic(expected = "Linear bias must have shape")]
    fn test_from_parts_rejects_bad_bias() {
        let _ = Linear::from_parts(Tensor::zeros(&[2, 3]), Tensor::zeros(&[3]));
    }

    #[test]
    fn test_gradients_reach_parameters() {
        clear_graph();
        let layer = Linear::identity(2);
        let x = Tensor::new(&[1.0, 2.0], &[1, 2]);
        layer.forward(&x).expect("forward").mean().backward();

        let gw = get_grad(layer.weight().id()).expect("weight grad");
        let gb = get_grad(layer.bias().id()).expect("bias grad");
        assert_eq!(gw.data(), &[0.5, 1.0, 0.5, 1.0]);
        assert_eq!(gb.data(), &[0.5, 0.5]);
    }

    #[test]
    fn test_kaiming_seeded_layers_match() {
        let a = Linear::kaiming(3, 4, Nonlinearity::Relu, &mut StdRng::seed_from_u64(9));
        let b = Linear::kaiming(3, 4, Nonlinearity::Relu, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
