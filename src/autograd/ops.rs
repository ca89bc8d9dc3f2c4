//! Differentiable operations for tensors.
//!
//! Each operation computes its forward result and, when gradient tracking
//! is on and any input requires gradients, records a [`GradFn`] on the tape.

use std::sync::Arc;

use super::grad_fn::{
    AddBackward, BroadcastAddBackward, GradFn, MatmulBackward, MeanBackward, ReluBackward,
    SigmoidBackward, TransposeBackward,
};
use super::tensor::Tensor;
use super::{is_grad_enabled, with_graph};
use crate::error::Result;

/// Smallest and largest `f32` strictly inside (0, 1).
const SIGMOID_FLOOR: f32 = f32::MIN_POSITIVE;
const SIGMOID_CEIL: f32 = 1.0 - f32::EPSILON / 2.0;

/// Attach `grad_fn` to `result` and put the op on the tape.
///
/// No-op unless tracking is enabled and some input requires gradients.
pub(crate) fn record_op(result: &mut Tensor, inputs: &[&Tensor], grad_fn: Arc<dyn GradFn>) {
    if !is_grad_enabled() || !inputs.iter().any(|t| t.requires_grad_enabled()) {
        return;
    }

    result.requires_grad_(true);
    result.mark_non_leaf();

    with_graph(|graph| {
        for input in inputs {
            graph.register_leaf(input);
        }
        graph.record(
            result.id(),
            grad_fn,
            inputs.iter().map(|t| t.id()).collect(),
        );
    });
}

impl Tensor {
    /// Element-wise addition of two same-shaped tensors.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    #[must_use]
    pub fn add(&self, other: &Tensor) -> Tensor {
        assert_eq!(self.shape(), other.shape(), "add requires matching shapes");
        let data = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(&a, &b)| a + b)
            .collect();
        let mut result = Tensor::from_vec(data, self.shape());
        record_op(&mut result, &[self, other], Arc::new(AddBackward));
        result
    }

    /// Mean of all elements, as a one-element tensor.
    #[must_use]
    pub fn mean(&self) -> Tensor {
        let mean = self.data().iter().sum::<f32>() / self.numel() as f32;
        let mut result = Tensor::new(&[mean], &[1]);
        record_op(
            &mut result,
            &[self],
            Arc::new(MeanBackward {
                input_shape: self.shape().to_vec(),
            }),
        );
        result
    }

    /// `ReLU` activation: max(0, x). NaN passes through unchanged.
    #[must_use]
    pub fn relu(&self) -> Tensor {
        let data = self
            .data()
            .iter()
            .map(|&a| if a < 0.0 { 0.0 } else { a })
            .collect();
        let mut result = Tensor::from_vec(data, self.shape());
        record_op(
            &mut result,
            &[self],
            Arc::new(ReluBackward { x: self.clone() }),
        );
        result
    }

    /// Logistic sigmoid, 1 / (1 + exp(−x)).
    ///
    /// Outputs are kept strictly inside (0, 1) even where `f32` rounding
    /// would saturate to exactly 0 or 1.
    #[must_use]
    pub fn sigmoid(&self) -> Tensor {
        let data = self
            .data()
            .iter()
            .map(|&a| (1.0 / (1.0 + (-a).exp())).clamp(SIGMOID_FLOOR, SIGMOID_CEIL))
            .collect();
        let mut result = Tensor::from_vec(data, self.shape());
        let grad_fn = Arc::new(SigmoidBackward {
            output: result.detach(),
        });
        record_op(&mut result, &[self], grad_fn);
        result
    }

    /// Matrix multiplication of 2D tensors: [m, k] @ [k, n] → [m, n].
    ///
    /// The product runs on `trueno`'s SIMD matmul. NaN and infinities in
    /// either operand propagate into the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the compute backend rejects the operands.
    ///
    /// # Panics
    ///
    /// Panics if either tensor is not 2D or the inner dimensions differ.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor> {
        assert_eq!(self.ndim(), 2, "matmul requires 2D tensors");
        assert_eq!(other.ndim(), 2, "matmul requires 2D tensors");

        let (m, k1) = (self.shape()[0], self.shape()[1]);
        let (k2, n) = (other.shape()[0], other.shape()[1]);
        assert_eq!(k1, k2, "matmul dimension mismatch: {k1} vs {k2}");

        let a = trueno::Matrix::from_vec(m, k1, self.data().to_vec())
            .map_err(|e| format!("matmul: invalid left operand {m}x{k1}: {e}"))?;
        let b = trueno::Matrix::from_vec(k2, n, other.data().to_vec())
            .map_err(|e| format!("matmul: invalid right operand {k2}x{n}: {e}"))?;
        let product = a
            .matmul(&b)
            .map_err(|e| format!("matmul failed: {e}"))?;

        let mut result = Tensor::new(product.as_slice(), &[m, n]);
        let grad_fn = Arc::new(MatmulBackward {
            x: self.clone(),
            y: other.clone(),
        });
        record_op(&mut result, &[self, other], grad_fn);
        Ok(result)
    }

    /// Transpose a 2D tensor.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is not 2D.
    #[must_use]
    pub fn transpose(&self) -> Tensor {
        assert_eq!(self.ndim(), 2, "transpose requires 2D tensor");

        let (rows, cols) = (self.shape()[0], self.shape()[1]);
        let src = self.data();
        let mut data = vec![0.0; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = src[i * cols + j];
            }
        }

        let mut result = Tensor::from_vec(data, &[cols, rows]);
        record_op(&mut result, &[self], Arc::new(TransposeBackward));
        result
    }

    /// Add a `[m]` vector to every row of a `[n, m]` matrix.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not 2D, `other` is not 1D, or the widths differ.
    #[must_use]
    pub fn broadcast_add(&self, other: &Tensor) -> Tensor {
        assert_eq!(self.ndim(), 2, "broadcast_add requires 2D matrix");
        assert_eq!(other.ndim(), 1, "broadcast_add requires 1D vector");
        let cols = self.shape()[1];
        assert_eq!(
            cols,
            other.shape()[0],
            "Matrix columns {} must match vector length {}",
            cols,
            other.shape()[0]
        );

        let bias = other.data();
        let data = self
            .data()
            .chunks_exact(cols.max(1))
            .flat_map(|row| row.iter().zip(bias).map(|(&x, &b)| x + b))
            .collect();

        let mut result = Tensor::from_vec(data, self.shape());
        record_op(
            &mut result,
            &[self, other],
            Arc::new(BroadcastAddBackward { cols }),
        );
        result
    }
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
