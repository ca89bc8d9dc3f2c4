//! Differentiable loss functions for adversarial training.
//!
//! # Example
//!
//! ```
//! use gaal::autograd::Tensor;
//! use gaal::nn::BCELoss;
//!
//! let criterion = BCELoss::new();
//! let probs = Tensor::new(&[0.5, 0.5], &[2, 1]).requires_grad();
//! let targets = Tensor::ones(&[2, 1]);
//! let loss = criterion.forward(&probs, &targets);
//! assert!((loss.item() - std::f32::consts::LN_2).abs() < 1e-6);
//! ```
//!
//! # References
//!
//! - Bishop, C. M. (2006). Pattern Recognition and Machine Learning. Springer.

use std::sync::Arc;

use crate::autograd::grad_fn::BinaryCrossEntropyBackward;
use crate::autograd::{record_op, Tensor};

/// Lower bound on each log term, so p = 0 or p = 1 yields a finite loss.
const LOG_CLAMP: f32 = -100.0;

/// Mean binary cross-entropy on probabilities.
///
/// Computes: BCE = −[y·log(p) + (1−y)·log(1−p)], each log clamped at −100,
/// averaged over all elements.
///
/// Gradient: ∂BCE/∂p = (p − y) / (p(1 − p)) / n.
#[derive(Debug, Clone, Copy, Default)]
pub struct BCELoss;

impl BCELoss {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Mean loss of `probs` against `targets`, as a one-element tensor.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    #[must_use]
    pub fn forward(&self, probs: &Tensor, targets: &Tensor) -> Tensor {
        assert_eq!(
            probs.shape(),
            targets.shape(),
            "BCELoss: probs shape {:?} must match targets shape {:?}",
            probs.shape(),
            targets.shape()
        );

        let total: f32 = probs
            .data()
            .iter()
            .zip(targets.data())
            .map(|(&p, &y)| {
                let log_p = p.ln().max(LOG_CLAMP);
                let log_1mp = (1.0 - p).ln().max(LOG_CLAMP);
                -(y * log_p + (1.0 - y) * log_1mp)
            })
            .sum();

        let n = probs.numel().max(1) as f32;
        let mut result = Tensor::new(&[total / n], &[1]);
        let grad_fn = Arc::new(BinaryCrossEntropyBackward {
            probs: probs.detach(),
            targets: targets.detach(),
            scale: 1.0 / n,
        });
        record_op(&mut result, &[probs], grad_fn);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{clear_graph, get_grad};

    #[test]
    fn test_bce_perfect_prediction_near_zero() {
        let criterion = BCELoss::new();
        let probs = Tensor::new(&[0.999_999, 0.000_001], &[2, 1]);
        let targets = Tensor::new(&[1.0, 0.0], &[2, 1]);
        assert!(criterion.forward(&probs, &targets).item() < 1e-4);
    }

    #[test]
    fn test_bce_clamps_saturated_logs() {
        let criterion = BCELoss::new();
        let probs = Tensor::new(&[0.0, 1.0], &[2, 1]);
        let targets = Tensor::new(&[1.0, 0.0], &[2, 1]);
        let loss = criterion.forward(&probs, &targets).item();
        assert!(loss.is_finite());
        assert!((loss - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_bce_averages_over_elements() {
        let targets = Tensor::zeros(&[4, 1]);
        let loss = BCELoss::new()
            .forward(&Tensor::full(&[4, 1], 0.5), &targets)
            .item();
        assert!((loss - std::f32::consts::LN_2).abs() < 1e-6);
    }

    #[test]
    fn test_bce_gradient() {
        clear_graph();
        let probs = Tensor::new(&[0.8, 0.25], &[2, 1]).requires_grad();
        let targets = Tensor::new(&[1.0, 0.0], &[2, 1]);
        BCELoss::new().forward(&probs, &targets).backward();

        let grad = get_grad(probs.id()).expect("probs tracked");
        // -1/p / n for y = 1, 1/(1-p) / n for y = 0
        assert!((grad.data()[0] + 0.625).abs() < 1e-5);
        assert!((grad.data()[1] - 2.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    #[should_panic(expected = "must match targets shape")]
    fn test_bce_shape_mismatch_panics() {
        let _ = BCELoss::new().forward(&Tensor::zeros(&[2, 1]), &Tensor::zeros(&[3, 1]));
    }
}
