//! Gaal: adversarial outlier detection in pure Rust.
//!
//! Implements SO-GAAL (Single-Objective Generative Adversarial Active
//! Learning): a generator learns to produce informative potential
//! outliers while a discriminator learns to separate them from the data,
//! and the trained discriminator scores new samples.
//!
//! # Quick Start
//!
//! ```
//! use gaal::prelude::*;
//!
//! let x = Matrix::from_vec(6, 2, vec![
//!     0.0, 0.1,
//!     0.1, 0.0,
//!     0.2, 0.1,
//!     0.1, 0.2,
//!     0.0, 0.0,
//!     4.0, 4.0,
//! ]).expect("6x2");
//!
//! let mut detector = SoGaal::new().with_stop_epochs(2).with_random_state(7);
//! detector.fit(&x).expect("fit succeeds");
//!
//! let scores = detector.decision_function(&x).expect("fitted");
//! assert_eq!(scores.len(), 6);
//! assert!(scores.iter().all(|&s| s > 0.0 && s < 1.0));
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`autograd`]: Tape-based reverse-mode automatic differentiation
//! - [`nn`]: Linear layers, initializers, BCE loss and SGD
//! - [`gaal`]: Generator, discriminator, trainer and the SO-GAAL detector
//! - [`traits`]: The `OutlierDetector` interface
//! - [`error`]: Error type and `Result` alias
//!
//! Training emits `tracing` events (`info` per fit, `debug` per epoch);
//! install any subscriber to see them.

pub mod autograd;
pub mod error;
pub mod gaal;
pub mod nn;
pub mod prelude;
pub mod primitives;
pub mod traits;

pub use error::{GaalError, Result};
pub use gaal::{SoGaal, SoGaalConfig};
pub use primitives::{Matrix, Vector};
pub use traits::OutlierDetector;
