//! Hyperparameters of the SO-GAAL detector.

use serde::{Deserialize, Serialize};

use crate::error::{GaalError, Result};

/// Constructor-time configuration.
///
/// Missing fields take their defaults when deserialized.
///
/// # Examples
///
/// ```
/// use gaal::gaal::SoGaalConfig;
///
/// let config = SoGaalConfig::default().with_stop_epochs(5).with_random_state(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.stop_epochs, 5);
/// assert_eq!(config.lr_d, 0.01);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoGaalConfig {
    /// Growing-phase length in epochs; training runs three times as long.
    pub stop_epochs: usize,
    /// Discriminator learning rate.
    pub lr_d: f32,
    /// Generator learning rate.
    pub lr_g: f32,
    /// Momentum shared by both optimizers.
    pub momentum: f32,
    /// Expected outlier fraction, used only for the threshold.
    pub contamination: f32,
    /// Seed for initialization, shuffling and latent noise.
    pub random_state: Option<u64>,
}

impl Default for SoGaalConfig {
    fn default() -> Self {
        Self {
            stop_epochs: 20,
            lr_d: 0.01,
            lr_g: 0.0001,
            momentum: 0.9,
            contamination: 0.1,
            random_state: None,
        }
    }
}

impl SoGaalConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stop_epochs(mut self, stop_epochs: usize) -> Self {
        self.stop_epochs = stop_epochs;
        self
    }

    #[must_use]
    pub fn with_lr_d(mut self, lr_d: f32) -> Self {
        self.lr_d = lr_d;
        self
    }

    #[must_use]
    pub fn with_lr_g(mut self, lr_g: f32) -> Self {
        self.lr_g = lr_g;
        self
    }

    #[must_use]
    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }

    #[must_use]
    pub fn with_contamination(mut self, contamination: f32) -> Self {
        self.contamination = contamination;
        self
    }

    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Check every field against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`GaalError::InvalidHyperparameter`] for the first field
    /// out of range.
    pub fn validate(&self) -> Result<()> {
        if self.stop_epochs == 0 {
            return Err(GaalError::invalid_hyperparameter(
                "stop_epochs",
                self.stop_epochs,
                ">= 1",
            ));
        }
        check_learning_rate("lr_d", self.lr_d)?;
        check_learning_rate("lr_g", self.lr_g)?;
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(GaalError::invalid_hyperparameter(
                "momentum",
                self.momentum,
                "in [0, 1)",
            ));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(GaalError::invalid_hyperparameter(
                "contamination",
                self.contamination,
                "in (0, 0.5]",
            ));
        }
        Ok(())
    }
}

fn check_learning_rate(param: &str, lr: f32) -> Result<()> {
    if lr.is_finite() && lr > 0.0 {
        Ok(())
    } else {
        Err(GaalError::invalid_hyperparameter(param, lr, "finite and > 0"))
    }
}
