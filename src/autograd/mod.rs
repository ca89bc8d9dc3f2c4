//! Reverse-mode automatic differentiation for training the adversarial pair.
//!
//! Define-by-run tape in the style of Baydin et al. (2018):
//! - differentiable ops append a [`GradFn`] to a thread-local tape
//! - [`Tensor::backward`] walks the tape in reverse and accumulates
//!   gradients for every leaf that requires them
//! - optimizers read those gradients through [`get_grad`]
//!
//! Each thread owns its own graph, so independent training sessions on
//! separate threads never share a tape.
//!
//! # Example
//!
//! ```
//! use gaal::autograd::{clear_graph, get_grad, Tensor};
//!
//! clear_graph();
//! let w = Tensor::new(&[2.0, -1.0], &[1, 2]).requires_grad();
//! let x = Tensor::new(&[3.0, 4.0], &[2, 1]);
//! let y = w.matmul(&x).expect("1x2 @ 2x1").relu().mean();
//! y.backward();
//!
//! let grad = get_grad(w.id()).expect("w participates in y");
//! assert_eq!(grad.data(), &[3.0, 4.0]);
//! ```
//!
//! # References
//!
//! - Baydin, A. G., et al. (2018). Automatic differentiation in machine learning: a survey. JMLR.
//! - Griewank, A., & Walther, A. (2008). Evaluating derivatives. SIAM.

pub(crate) mod grad_fn;
mod graph;
mod ops;
mod tensor;

pub use grad_fn::GradFn;
pub(crate) use ops::record_op;
pub use graph::ComputationGraph;
pub use tensor::{Tensor, TensorId};

use std::cell::{Cell, RefCell};

thread_local! {
    /// Computation graph for the current thread.
    static GRAPH: RefCell<ComputationGraph> = RefCell::new(ComputationGraph::new());

    /// Gradient tracking switch (off inside [`no_grad`]).
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Execute a closure without gradient tracking.
///
/// Forward passes inside the closure record nothing on the tape. The
/// previous setting is restored on exit, so calls nest.
///
/// # Example
///
/// ```
/// use gaal::autograd::{is_grad_enabled, no_grad, Tensor};
///
/// let x = Tensor::from_slice(&[1.0, 2.0]).requires_grad();
/// let y = no_grad(|| x.relu());
/// assert!(!y.requires_grad_enabled());
/// assert!(is_grad_enabled());
/// ```
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    struct Restore(bool);

    impl Drop for Restore {
        fn drop(&mut self) {
            GRAD_ENABLED.with(|enabled| enabled.set(self.0));
        }
    }

    let _restore = Restore(GRAD_ENABLED.with(|enabled| enabled.replace(false)));
    f()
}

/// Check if gradient tracking is currently enabled.
#[must_use]
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// Run `f` against this thread's computation graph.
pub(crate) fn with_graph<F, R>(f: F) -> R
where
    F: FnOnce(&mut ComputationGraph) -> R,
{
    GRAPH.with(|graph| f(&mut graph.borrow_mut()))
}

/// Drop the recorded tape and every accumulated gradient.
pub fn clear_graph() {
    with_graph(ComputationGraph::clear);
}

/// Get the accumulated gradient of a leaf tensor, if any.
#[must_use]
pub fn get_grad(id: TensorId) -> Option<Tensor> {
    with_graph(|graph| graph.get_grad(id))
}
