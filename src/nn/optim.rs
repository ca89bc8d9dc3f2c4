//! Gradient-based optimizers for network training.
//!
//! Optimizers read gradients from the thread's computation graph by
//! parameter id and update the parameter tensors in place.
//!
//! # Example
//!
//! ```
//! use gaal::autograd::{clear_graph, Tensor};
//! use gaal::nn::{Linear, Module, Optimizer, SGD};
//!
//! let mut model = Linear::identity(2);
//! let mut optimizer = SGD::with_momentum(&model.parameters(), 0.1, 0.9);
//!
//! clear_graph();
//! let x = Tensor::new(&[1.0, 2.0], &[1, 2]);
//! model.forward(&x).expect("1x2 input").mean().backward();
//! optimizer.step(&mut model.parameters_mut());
//!
//! assert!(model.bias().data().iter().all(|&b| b < 0.0));
//! ```
//!
//! # References
//!
//! - Robbins, H., & Monro, S. (1951). A stochastic approximation method.
//! - Sutskever, I., et al. (2013). On the importance of initialization and
//!   momentum in deep learning. ICML.

use crate::autograd::{get_grad, Tensor, TensorId};

/// Common trait for all optimizers.
pub trait Optimizer {
    /// Apply one update to `params` using their accumulated gradients.
    ///
    /// Parameters without a gradient are left untouched.
    fn step(&mut self, params: &mut [&mut Tensor]);

    /// Get current learning rate.
    fn lr(&self) -> f32;
}

/// Stochastic Gradient Descent optimizer with momentum.
///
/// Update rule:
/// ```text
/// v_t = momentum * v_{t-1} + grad
/// param = param - lr * v_t
/// ```
#[derive(Debug, Clone)]
pub struct SGD {
    /// Parameter tensor IDs to optimize
    param_ids: Vec<TensorId>,
    lr: f32,
    /// Momentum factor (0 = no momentum)
    momentum: f32,
    /// Velocity buffers, one per parameter, allocated on first use
    velocities: Vec<Vec<f32>>,
}

impl SGD {
    /// SGD with momentum over `params`.
    #[must_use]
    pub fn with_momentum(params: &[&Tensor], lr: f32, momentum: f32) -> Self {
        Self {
            param_ids: params.iter().map(|p| p.id()).collect(),
            lr,
            momentum,
            velocities: vec![Vec::new(); params.len()],
        }
    }

    /// Get the momentum factor.
    #[must_use]
    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    fn update_param(&mut self, param: &mut Tensor, idx: usize) {
        let Some(grad) = get_grad(param.id()) else {
            return;
        };

        let param_data = param.data_mut();
        let velocity = &mut self.velocities[idx];
        if velocity.len() != param_data.len() {
            *velocity = vec![0.0; param_data.len()];
        }

        for ((p, v), &g) in param_data.iter_mut().zip(velocity.iter_mut()).zip(grad.data()) {
            if self.momentum == 0.0 {
                *p -= self.lr * g;
            } else {
                *v = self.momentum * *v + g;
                *p -= self.lr * *v;
            }
        }
    }
}

impl Optimizer for SGD {
    /// # Panics
    ///
    /// Panics if `params` does not line up with the parameters the
    /// optimizer was built over.
    fn step(&mut self, params: &mut [&mut Tensor]) {
        assert_eq!(
            params.len(),
            self.param_ids.len(),
            "SGD built over {} parameters, stepped with {}",
            self.param_ids.len(),
            params.len()
        );
        for (idx, param) in params.iter_mut().enumerate() {
            debug_assert_eq!(param.id(), self.param_ids[idx], "parameter order changed");
            self.update_param(param, idx);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::clear_graph;

    #[test]
    fn test_sgd_basic_step() {
        clear_graph();
        let mut w = Tensor::from_slice(&[1.0, 2.0]).requires_grad();
        let mut opt = SGD::with_momentum(&[&w], 0.5, 0.0);

        w.mean().backward();
        opt.step(&mut [&mut w]);

        // grad = 0.5 each
        assert_eq!(w.data(), &[0.75, 1.75]);
    }

    #[test]
    fn test_sgd_momentum_accumulates_velocity() {
        clear_graph();
        let mut w = Tensor::from_slice(&[0.0]).requires_grad();
        let mut opt = SGD::with_momentum(&[&w], 0.1, 0.9);

        // same gradient (1.0) twice: v1 = 1, v2 = 1.9
        w.mean().backward();
        opt.step(&mut [&mut w]);
        assert!((w.data()[0] + 0.1).abs() < 1e-6);

        clear_graph();
        w.mean().backward();
        opt.step(&mut [&mut w]);
        assert!((w.data()[0] + 0.29).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_skips_params_without_grad() {
        clear_graph();
        let mut w = Tensor::from_slice(&[3.0]).requires_grad();
        let mut opt = SGD::with_momentum(&[&w], 0.1, 0.9);
        opt.step(&mut [&mut w]);
        assert_eq!(w.data(), &[3.0]);
    }

    #[test]
    fn test_lr_accessors() {
        let w = Tensor::from_slice(&[0.0]);
        let opt = SGD::with_momentum(&[&w], 0.01, 0.9);
        assert_eq!(opt.lr(), 0.01);
        assert_eq!(opt.momentum(), 0.9);
    }

    #[test]
    #[should_panic(expected = "SGD built over 1 parameters")]
    fn test_step_with_wrong_param_count_panics() {
        let mut a = Tensor::from_slice(&[0.0]);
        let mut b = Tensor::from_slice(&[0.0]);
        let mut opt = SGD::with_momentum(&[&a], 0.1, 0.9);
        opt.step(&mut [&mut a, &mut b]);
    }
}
