//! Per-batch loss log of one training session.

use serde::{Deserialize, Serialize};

/// Metric name of the discriminator loss sequence.
pub const DISCRIMINATOR_LOSS: &str = "discriminator_loss";
/// Metric name of the generator loss sequence.
pub const GENERATOR_LOSS: &str = "generator_loss";

/// Append-only record of both losses, one entry per batch.
///
/// Diagnostic only; nothing in fitting or scoring reads it back.
///
/// # Examples
///
/// ```
/// use gaal::gaal::TrainingHistory;
///
/// let mut history = TrainingHistory::new();
/// history.record(1.4, 0.7);
/// assert_eq!(history.get("discriminator_loss"), Some(&[1.4][..]));
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    discriminator_loss: Vec<f32>,
    generator_loss: Vec<f32>,
}

impl TrainingHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the losses of one batch.
    pub fn record(&mut self, discriminator_loss: f32, generator_loss: f32) {
        self.discriminator_loss.push(discriminator_loss);
        self.generator_loss.push(generator_loss);
    }

    #[must_use]
    pub fn discriminator_loss(&self) -> &[f32] {
        &self.discriminator_loss
    }

    #[must_use]
    pub fn generator_loss(&self) -> &[f32] {
        &self.generator_loss
    }

    /// Look a sequence up by metric name.
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<&[f32]> {
        match metric {
            DISCRIMINATOR_LOSS => Some(&self.discriminator_loss),
            GENERATOR_LOSS => Some(&self.generator_loss),
            _ => None,
        }
    }

    /// Names of the recorded metrics.
    #[must_use]
    pub fn metrics(&self) -> [&'static str; 2] {
        [DISCRIMINATOR_LOSS, GENERATOR_LOSS]
    }

    /// Number of batches recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.discriminator_loss.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.discriminator_loss.is_empty()
    }

    /// Losses of the most recent batch as `(discriminator, generator)`.
    #[must_use]
    pub fn last(&self) -> Option<(f32, f32)> {
        Some((*self.discriminator_loss.last()?, *self.generator_loss.last()?))
    }
}
