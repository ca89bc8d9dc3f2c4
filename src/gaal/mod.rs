//! Single-Objective Generative Adversarial Active Learning (SO-GAAL).
//!
//! A generator learns to produce samples near the boundary of the data
//! while a discriminator learns to tell them from real samples. After
//! training, the discriminator's output on each sample is its anomaly
//! score.
//!
//! - [`Generator`] and [`Discriminator`]: the two networks
//! - [`PhaseSchedule`]: grows the generator for `stop_epochs` epochs,
//!   then freezes it for `2 × stop_epochs` more
//! - [`AdversarialTrainer`]: the per-batch training loop
//! - [`SoGaal`]: fit/score detector with contamination-based labels
//!
//! # Example
//!
//! ```
//! use gaal::prelude::*;
//!
//! let x = Matrix::from_vec(5, 2, vec![
//!     0.0, 0.0,
//!     0.1, 0.1,
//!     0.0, 0.2,
//!     0.2, 0.0,
//!     5.0, 5.0,
//! ]).expect("5x2");
//!
//! let mut detector = SoGaal::new().with_stop_epochs(3).with_random_state(42);
//! detector.fit(&x).expect("fit succeeds");
//! let labels = detector.predict(&x).expect("fitted");
//! assert_eq!(labels.len(), 5);
//! ```
//!
//! # References
//!
//! - Liu, Y., et al. (2019). Generative adversarial active learning for
//!   unsupervised outlier detection. IEEE TKDE.

mod config;
mod detector;
mod discriminator;
mod generator;
mod history;
mod schedule;
mod threshold;
mod trainer;
pub mod validation;

pub use config::SoGaalConfig;
pub use detector::SoGaal;
pub use discriminator::{hidden_width, Discriminator};
pub use generator::Generator;
pub use history::{TrainingHistory, DISCRIMINATOR_LOSS, GENERATOR_LOSS};
pub use schedule::{Phase, PhaseSchedule, TOTAL_EPOCH_FACTOR};
pub use threshold::{label_above, percentile, ContaminationThreshold, ThresholdPolicy};
pub use trainer::{AdversarialTrainer, MAX_BATCH_SIZE};
