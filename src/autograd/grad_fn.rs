//! Gradient functions for the differentiable operations.
//!
//! Each op captures what its backward pass needs at forward time and
//! returns one gradient per input, in input order.

use super::tensor::Tensor;

/// Computes input gradients for one recorded operation.
///
/// For element-wise addition z = x + y, `backward(g)` returns `[g, g]`.
pub trait GradFn: Send + Sync {
    /// Gradients with respect to each input, given dL/d(output).
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor>;

    /// Human-readable name for debugging.
    fn name(&self) -> &'static str;
}

fn map_with(grad_output: &Tensor, saved: &Tensor, f: impl Fn(f32, f32) -> f32) -> Tensor {
    let data = grad_output
        .data()
        .iter()
        .zip(saved.data())
        .map(|(&g, &s)| f(g, s))
        .collect();
    Tensor::from_vec(data, grad_output.shape())
}

/// z = x + y (same shape)
pub(crate) struct AddBackward;

impl GradFn for AddBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![grad_output.clone(), grad_output.clone()]
    }

    fn name(&self) -> &'static str {
        "AddBackward"
    }
}

/// z = mean(x)
pub(crate) struct MeanBackward {
    pub(crate) input_shape: Vec<usize>,
}

impl GradFn for MeanBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        let numel: usize = self.input_shape.iter().product();
        let g = grad_output.item() / numel as f32;
        vec![Tensor::full(&self.input_shape, g)]
    }

    fn name(&self) -> &'static str {
        "MeanBackward"
    }
}

/// z = max(0, x)
pub(crate) struct ReluBackward {
    pub(crate) x: Tensor,
}

impl GradFn for ReluBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![map_with(grad_output, &self.x, |g, x| {
            if x > 0.0 {
                g
            } else {
                0.0
            }
        })]
    }

    fn name(&self) -> &'static str {
        "ReluBackward"
    }
}

/// z = σ(x); saves the output since σ' = σ(1 − σ).
pub(crate) struct SigmoidBackward {
    pub(crate) output: Tensor,
}

impl GradFn for SigmoidBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![map_with(grad_output, &self.output, |g, s| g * s * (1.0 - s))]
    }

    fn name(&self) -> &'static str {
        "SigmoidBackward"
    }
}

/// z = x @ y with x: [m, k], y: [k, n]
pub(crate) struct MatmulBackward {
    pub(crate) x: Tensor,
    pub(crate) y: Tensor,
}

impl GradFn for MatmulBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        let (m, k) = (self.x.shape()[0], self.x.shape()[1]);
        let n = self.y.shape()[1];
        let g = grad_output.data();
        let x = self.x.data();
        let y = self.y.data();

        // dx = g @ y^T
        let mut grad_x = vec![0.0; m * k];
        for i in 0..m {
            for p in 0..k {
                let mut acc = 0.0;
                for j in 0..n {
                    acc += g[i * n + j] * y[p * n + j];
                }
                grad_x[i * k + p] = acc;
            }
        }

        // dy = x^T @ g
        let mut grad_y = vec![0.0; k * n];
        for i in 0..m {
            for p in 0..k {
                let xv = x[i * k + p];
                for j in 0..n {
                    grad_y[p * n + j] += xv * g[i * n + j];
                }
            }
        }

        vec![
            Tensor::from_vec(grad_x, &[m, k]),
            Tensor::from_vec(grad_y, &[k, n]),
        ]
    }

    fn name(&self) -> &'static str {
        "MatmulBackward"
    }
}

/// z = x^T for 2D x
pub(crate) struct TransposeBackward;

impl GradFn for TransposeBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        let (rows, cols) = (grad_output.shape()[0], grad_output.shape()[1]);
        let g = grad_output.data();
        let mut data = vec![0.0; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = g[i * cols + j];
            }
        }
        vec![Tensor::from_vec(data, &[cols, rows])]
    }

    fn name(&self) -> &'static str {
        "TransposeBackward"
    }
}

/// z = x + b with x: [n, m] and b: [m] broadcast over rows
pub(crate) struct BroadcastAddBackward {
    pub(crate) cols: usize,
}

impl GradFn for BroadcastAddBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        let mut grad_b = vec![0.0; self.cols];
        for row in grad_output.data().chunks_exact(self.cols) {
            for (acc, &g) in grad_b.iter_mut().zip(row) {
                *acc += g;
            }
        }
        vec![grad_output.clone(), Tensor::from_vec(grad_b, &[self.cols])]
    }

    fn name(&self) -> &'static str {
        "BroadcastAddBackward"
    }
}

/// Mean binary cross-entropy over probabilities p against targets y.
///
/// dL/dp_i = (p_i − y_i) / max(p_i (1 − p_i), ε) / n
pub(crate) struct BinaryCrossEntropyBackward {
    pub(crate) probs: Tensor,
    pub(crate) targets: Tensor,
    pub(crate) scale: f32,
}

/// Floor on p(1 − p) in the BCE gradient.
pub(crate) const BCE_GRAD_EPS: f32 = 1e-12;

impl GradFn for BinaryCrossEntropyBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        let g = grad_output.item() * self.scale;
        let data = self
            .probs
            .data()
            .iter()
            .zip(self.targets.data())
            .map(|(&p, &y)| g * (p - y) / (p * (1.0 - p)).max(BCE_GRAD_EPS))
            .collect();
        vec![Tensor::from_vec(data, self.probs.shape())]
    }

    fn name(&self) -> &'static str {
        "BinaryCrossEntropyBackward"
    }
}
