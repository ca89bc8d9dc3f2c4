//! Tensor with automatic differentiation support.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::primitives::{Matrix, Vector};

use super::with_graph;

/// Unique identifier for tensors in the computation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TensorId(u64);

impl TensorId {
    /// Generate a new unique tensor ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        TensorId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TensorId {
    fn default() -> Self {
        Self::new()
    }
}

/// A dense `f32` tensor with optional gradient tracking.
///
/// Gradients do not live on the tensor itself: they accumulate in the
/// thread's [`ComputationGraph`](super::ComputationGraph) keyed by
/// [`TensorId`], which lets a model keep owning its parameters while
/// the tape refers to them by id only.
#[derive(Clone)]
pub struct Tensor {
    data: Vector<f32>,
    shape: Vec<usize>,
    requires_grad: bool,
    /// Created by the user rather than by an operation
    is_leaf: bool,
    id: TensorId,
}

impl Tensor {
    /// Create a new tensor from a slice with the given shape.
    ///
    /// Gradient tracking is disabled by default.
    ///
    /// # Panics
    ///
    /// Panics if the data length doesn't match the product of shape dimensions.
    #[must_use]
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Create a tensor taking ownership of `data`.
    ///
    /// # Panics
    ///
    /// Panics if the data length doesn't match the product of shape dimensions.
    #[must_use]
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Self {
        let expected_len: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected_len,
            "Data length {} doesn't match shape {:?} (expected {})",
            data.len(),
            shape,
            expected_len
        );

        Self {
            data: Vector::from_vec(data),
            shape: shape.to_vec(),
            requires_grad: false,
            is_leaf: true,
            id: TensorId::new(),
        }
    }

    /// Create a tensor from a 1D slice.
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self::new(data, &[data.len()])
    }

    /// Create a `[rows, cols]` tensor from a matrix.
    #[must_use]
    pub fn from_matrix(matrix: &Matrix<f32>) -> Self {
        Self::new(matrix.as_slice(), &[matrix.n_rows(), matrix.n_cols()])
    }

    /// Create a tensor filled with `value`.
    #[must_use]
    pub fn full(shape: &[usize], value: f32) -> Self {
        let len: usize = shape.iter().product();
        Self::from_vec(vec![value; len], shape)
    }

    /// Create a tensor filled with zeros.
    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, 0.0)
    }

    /// Create a tensor filled with ones.
    #[must_use]
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, 1.0)
    }

    /// Sample every element independently from U[0, 1).
    #[must_use]
    pub fn rand_uniform<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Self {
        let len: usize = shape.iter().product();
        let data = (0..len).map(|_| rng.gen::<f32>()).collect();
        Self::from_vec(data, shape)
    }

    /// Enable gradient tracking for this tensor.
    #[must_use]
    pub fn requires_grad(mut self) -> Self {
        self.requires_grad = true;
        self
    }

    /// Enable or disable gradient tracking (in-place).
    pub fn requires_grad_(&mut self, requires: bool) -> &mut Self {
        self.requires_grad = requires;
        self
    }

    /// Check if this tensor requires gradient computation.
    #[must_use]
    pub fn requires_grad_enabled(&self) -> bool {
        self.requires_grad
    }

    /// Check if this is a leaf tensor (not created by an operation).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub(crate) fn mark_non_leaf(&mut self) {
        self.is_leaf = false;
    }

    /// Get the tensor's unique identifier.
    #[must_use]
    pub fn id(&self) -> TensorId {
        self.id
    }

    /// Get the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Get the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Get a reference to the underlying data.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        self.data.as_slice()
    }

    /// Get a mutable reference to the underlying data.
    ///
    /// Used by optimizers to apply updates in place; the id is kept so
    /// the next forward pass still maps to the same gradient slot.
    pub fn data_mut(&mut self) -> &mut [f32] {
        self.data.as_mut_slice()
    }

    /// Copy the data out as a `[rows, cols]` matrix.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is not 2D.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix<f32> {
        assert_eq!(self.ndim(), 2, "to_matrix requires a 2D tensor");
        Matrix::from_vec(self.shape[0], self.shape[1], self.data().to_vec())
            .unwrap_or_else(|_| unreachable!("tensor length always matches its shape"))
    }

    /// Detach from the computation graph.
    ///
    /// Returns a new leaf with the same data and no gradient tracking.
    #[must_use]
    pub fn detach(&self) -> Tensor {
        Tensor::new(self.data(), &self.shape)
    }

    /// Get the value of a one-element tensor.
    ///
    /// # Panics
    ///
    /// Panics if the tensor has more than one element.
    #[must_use]
    pub fn item(&self) -> f32 {
        assert_eq!(
            self.numel(),
            1,
            "item() only works on tensors with exactly 1 element, got {}",
            self.numel()
        );
        self.data[0]
    }

    /// Backpropagate from this scalar through the recorded tape.
    ///
    /// # Panics
    ///
    /// Panics if called on a tensor with more than one element.
    pub fn backward(&self) {
        assert_eq!(
            self.numel(),
            1,
            "backward() requires scalar output, got shape {:?}",
            self.shape
        );
        let seed = Tensor::ones(&self.shape);
        with_graph(|graph| graph.backward(self.id, seed));
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("requires_grad", &self.requires_grad)
            .field("is_leaf", &self.is_leaf)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
