//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use gaal::prelude::*;
//! ```

pub use crate::error::GaalError;
pub use crate::gaal::{
    AdversarialTrainer, ContaminationThreshold, Phase, SoGaal, SoGaalConfig, ThresholdPolicy,
    TrainingHistory,
};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::OutlierDetector;
