//! Weight initialization functions.
//!
//! - Kaiming/He (He et al., 2015), fan-in mode, with the gain chosen by
//!   the nonlinearity that follows the layer
//! - Identity, for square layers that should start as a pass-through
//! - Fan-in bounded uniform, the customary bias initializer
//!
//! Every sampler draws from a caller-supplied RNG so that one seed can
//! drive a whole training run.
//!
//! # References
//!
//! - He, K., et al. (2015). Delving deep into rectifiers: Surpassing human-level
//!   performance on `ImageNet` classification. ICCV.

use crate::autograd::Tensor;
use rand::Rng;

/// Nonlinearity following a layer, used to pick the Kaiming gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nonlinearity {
    /// `ReLU`, gain √2
    Relu,
    /// Logistic sigmoid, gain 1
    Sigmoid,
}

impl Nonlinearity {
    /// Recommended gain for this nonlinearity.
    #[must_use]
    pub fn gain(self) -> f32 {
        match self {
            Nonlinearity::Sigmoid => 1.0,
            Nonlinearity::Relu => std::f32::consts::SQRT_2,
        }
    }
}

/// Kaiming normal initialization, fan-in mode.
///
/// Samples from N(0, std) with std = gain / sqrt(`fan_in`).
#[must_use]
pub fn kaiming_normal<R: Rng + ?Sized>(
    shape: &[usize],
    fan_in: usize,
    nonlinearity: Nonlinearity,
    rng: &mut R,
) -> Tensor {
    let std = nonlinearity.gain() / (fan_in.max(1) as f32).sqrt();
    normal(shape, 0.0, std, rng)
}

/// Uniform U(-1/sqrt(`fan_in`), 1/sqrt(`fan_in`)) for a bias of length `len`.
#[must_use]
pub fn fan_in_uniform<R: Rng + ?Sized>(len: usize, fan_in: usize, rng: &mut R) -> Tensor {
    let bound = 1.0 / (fan_in.max(1) as f32).sqrt();
    uniform(&[len], -bound, bound, rng)
}

/// `n × n` identity matrix.
#[must_use]
pub fn eye(n: usize) -> Tensor {
    let mut data = vec![0.0; n * n];
    for i in 0..n {
        data[i * n + i] = 1.0;
    }
    Tensor::from_vec(data, &[n, n])
}

/// Zeros initialization.
#[must_use]
pub fn zeros(shape: &[usize]) -> Tensor {
    Tensor::zeros(shape)
}

/// Uniform distribution initialization, U(low, high).
pub(crate) fn uniform<R: Rng + ?Sized>(shape: &[usize], low: f32, high: f32, rng: &mut R) -> Tensor {
    let numel: usize = shape.iter().product();
    let data = (0..numel).map(|_| rng.gen_range(low..high)).collect();
    Tensor::from_vec(data, shape)
}

/// Normal distribution initialization, N(mean, std).
pub(crate) fn normal<R: Rng + ?Sized>(shape: &[usize], mean: f32, std: f32, rng: &mut R) -> Tensor {
    let numel: usize = shape.iter().product();

    // Box-Muller transform
    let data = (0..numel)
        .map(|_| {
            let u1: f32 = rng.gen_range(0.0001_f32..1.0_f32);
            let u2: f32 = rng.gen_range(0.0_f32..1.0_f32);
            let z = (-2.0_f32 * u1.ln()).sqrt() * (2.0_f32 * std::f32::consts::PI * u2).cos();
            mean + std * z
        })
        .collect();

    Tensor::from_vec(data, shape)
}
