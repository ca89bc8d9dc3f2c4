//! The `Module` trait shared by layers and networks.

use crate::autograd::Tensor;
use crate::error::Result;

/// A differentiable building block with learnable parameters.
///
/// Forward passes record onto the thread's tape whenever gradient
/// tracking is enabled, so `forward` takes `&self`; parameter updates go
/// through [`parameters_mut`](Module::parameters_mut).
pub trait Module {
    /// Forward pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the compute backend rejects an operand.
    fn forward(&self, input: &Tensor) -> Result<Tensor>;

    /// Learnable parameters, in a stable order.
    fn parameters(&self) -> Vec<&Tensor>;

    /// Mutable access to the learnable parameters, same order as
    /// [`parameters`](Module::parameters).
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// Total number of scalar parameters.
    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(|p| p.numel()).sum()
    }

    /// Copy of every parameter's values, for before/after comparisons.
    fn snapshot(&self) -> Vec<Vec<f32>> {
        self.parameters().iter().map(|p| p.data().to_vec()).collect()
    }
}
