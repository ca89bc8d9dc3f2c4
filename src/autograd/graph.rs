//! Tape recording and the backward sweep.

use std::collections::HashMap;
use std::sync::Arc;

use super::grad_fn::GradFn;
use super::tensor::{Tensor, TensorId};

/// One recorded operation.
#[derive(Clone)]
struct TapeEntry {
    output_id: TensorId,
    grad_fn: Arc<dyn GradFn>,
    input_ids: Vec<TensorId>,
}

/// Tape of recorded operations plus the gradient slots of tracked leaves.
///
/// Leaves are registered by id and shape only; their data stays with
/// whoever owns them (usually a layer), so an optimizer can update a
/// parameter in place and the next forward pass records against the
/// same id.
#[allow(missing_debug_implementations)]
pub struct ComputationGraph {
    tape: Vec<TapeEntry>,
    /// Shapes of leaves that require gradients
    leaves: HashMap<TensorId, Vec<usize>>,
    /// Gradients accumulated by `backward`, keyed by leaf id
    grads: HashMap<TensorId, Tensor>,
}

impl ComputationGraph {
    /// Create a new empty computation graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tape: Vec::new(),
            leaves: HashMap::new(),
            grads: HashMap::new(),
        }
    }

    /// Drop the tape, the leaf registry and all gradients.
    pub fn clear(&mut self) {
        self.tape.clear();
        self.leaves.clear();
        self.grads.clear();
    }

    /// Register a tensor as a gradient-receiving leaf.
    ///
    /// Non-leaves and tensors without `requires_grad` are ignored.
    pub fn register_leaf(&mut self, tensor: &Tensor) {
        if tensor.is_leaf() && tensor.requires_grad_enabled() {
            self.leaves
                .entry(tensor.id())
                .or_insert_with(|| tensor.shape().to_vec());
        }
    }

    /// Append an operation to the tape.
    pub fn record(
        &mut self,
        output_id: TensorId,
        grad_fn: Arc<dyn GradFn>,
        input_ids: Vec<TensorId>,
    ) {
        self.tape.push(TapeEntry {
            output_id,
            grad_fn,
            input_ids,
        });
    }

    /// Reverse sweep from `output_id` seeded with `grad_output`.
    ///
    /// The tape is in creation order, so by the time an entry is reached
    /// every consumer of its output has already contributed. Gradients
    /// reaching a registered leaf are added to that leaf's slot, so two
    /// `backward` calls without [`clear`](Self::clear) accumulate.
    pub fn backward(&mut self, output_id: TensorId, grad_output: Tensor) {
        let mut pending: HashMap<TensorId, Tensor> = HashMap::new();
        pending.insert(output_id, grad_output);

        for entry in self.tape.iter().rev() {
            let Some(grad_out) = pending.remove(&entry.output_id) else {
                continue;
            };

            let input_grads = entry.grad_fn.backward(&grad_out);
            debug_assert_eq!(
                input_grads.len(),
                entry.input_ids.len(),
                "{} returned the wrong number of gradients",
                entry.grad_fn.name()
            );

            for (input_id, input_grad) in entry.input_ids.iter().zip(input_grads) {
                match pending.get_mut(input_id) {
                    Some(existing) => add_into(existing, &input_grad),
                    None => {
                        pending.insert(*input_id, input_grad);
                    }
                }
            }
        }

        // Whatever is left pending has no producer on the tape: a leaf.
        for (id, grad) in pending {
            if !self.leaves.contains_key(&id) {
                continue;
            }
            match self.grads.get_mut(&id) {
                Some(existing) => add_into(existing, &grad),
                None => {
                    self.grads.insert(id, grad);
                }
            }
        }
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tape.len()
    }

    /// Check if the tape is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tape.is_empty()
    }

    /// Gradient accumulated for a leaf, if any.
    #[must_use]
    pub fn get_grad(&self, id: TensorId) -> Option<Tensor> {
        self.grads.get(&id).cloned()
    }
}

impl Default for ComputationGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn add_into(acc: &mut Tensor, grad: &Tensor) {
    for (a, g) in acc.data_mut().iter_mut().zip(grad.data()) {
        *a += g;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{clear_graph, get_grad};

    #[test]
    fn test_graph_creation() {
        let graph = ComputationGraph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }

    #[test]
    fn test_register_leaf_skips_untracked() {
        let mut graph = ComputationGraph::new();
        let tracked = Tensor::from_slice(&[1.0]).requires_grad();
        let plain = Tensor::from_slice(&[2.0]);

        graph.register_leaf(&tracked);
        graph.register_leaf(&plain);

        assert!(graph.leaves.contains_key(&tracked.id()));
        assert!(!graph.leaves.contains_key(&plain.id()));
    }

    #[test]
    fn test_clear_drops_everything() {
        clear_graph();
        let x = Tensor::from_slice(&[1.0, -2.0]).requires_grad();
        x.relu().mean().backward();
        assert!(get_grad(x.id()).is_some());

        clear_graph();
        assert!(get_grad(x.id()).is_none());
    }

    #[test]
    fn test_fan_out_accumulates() {
        clear_graph();
        // y = mean(x + x) => dy/dx_i = 2 / n
        let x = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0]).requires_grad();
        x.add(&x).mean().backward();

        let grad = get_grad(x.id()).expect("x is a tracked leaf");
        for &g in grad.data() {
            assert!((g - 0.5).abs() < 1e-6, "expected 0.5, got {g}");
        }
    }

    #[test]
    fn test_repeated_backward_accumulates() {
        clear_graph();
        let x = Tensor::from_slice(&[1.0, 1.0]).requires_grad();
        x.relu().mean().backward();
        x.relu().mean().backward();

        let grad = get_grad(x.id()).expect("tracked");
        assert_eq!(grad.data(), &[1.0, 1.0]);
    }
}
