//! Neural network building blocks for the adversarial pair.
//!
//! A small PyTorch-style layer over [`crate::autograd`]:
//! - [`Module`]: forward pass plus parameter access
//! - [`Linear`]: fully connected layer
//! - [`init`]: identity, Kaiming and fan-in uniform initializers
//! - [`BCELoss`]: binary cross-entropy on probabilities
//! - [`SGD`]: gradient descent with momentum behind the [`Optimizer`] trait
//!
//! Activations are methods on [`Tensor`](crate::autograd::Tensor)
//! (`relu`, `sigmoid`).

pub mod init;
mod linear;
mod loss;
mod module;
mod optim;

pub use init::Nonlinearity;
pub use linear::Linear;
pub use loss::BCELoss;
pub use module::Module;
pub use optim::{Optimizer, SGD};
