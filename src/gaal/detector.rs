//! SO-GAAL detector: fit/score wrapper around the adversarial trainer.

use tracing::debug;

use super::config::SoGaalConfig;
use super::discriminator::Discriminator;
use super::generator::Generator;
use super::history::TrainingHistory;
use super::threshold::{label_above, ContaminationThreshold, ThresholdPolicy};
use super::trainer::{score_samples, AdversarialTrainer};
use super::validation::{check_array, check_features};
use crate::error::{GaalError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::OutlierDetector;

/// Single-Objective Generative Adversarial Active Learning detector.
///
/// `fit` trains a generator/discriminator pair on the data, then keeps
/// the discriminator's output on every training row as the decision
/// scores. The threshold and training labels come from the
/// [`ThresholdPolicy`] (by default [`ContaminationThreshold`]).
///
/// Scores are the discriminator's probability-of-real as is; no sign
/// flip is applied.
///
/// # Examples
///
/// ```
/// use gaal::prelude::*;
///
/// let x = Matrix::from_vec(6, 1, vec![0.0, 0.1, 0.2, 0.15, 0.05, 7.0]).expect("6x1");
/// let mut detector = SoGaal::new()
///     .with_stop_epochs(2)
///     .with_contamination(0.2)
///     .with_random_state(1);
///
/// detector.fit(&x).expect("fit succeeds");
/// assert_eq!(detector.decision_scores().map(Vector::len), Some(6));
/// assert_eq!(detector.labels().map(<[i32]>::len), Some(6));
/// ```
#[derive(Debug, Clone)]
pub struct SoGaal<P = ContaminationThreshold> {
    config: SoGaalConfig,
    threshold_policy: P,
    fitted: Option<FittedState>,
}

/// Everything `fit` produces.
#[derive(Debug, Clone)]
struct FittedState {
    generator: Generator,
    discriminator: Discriminator,
    history: TrainingHistory,
    decision_scores: Vector<f32>,
    threshold: f32,
    labels: Vec<i32>,
}

impl SoGaal {
    /// Detector with default hyperparameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SoGaalConfig::default())
    }

    /// Detector with the given hyperparameters.
    #[must_use]
    pub fn with_config(config: SoGaalConfig) -> Self {
        Self {
            config,
            threshold_policy: ContaminationThreshold,
            fitted: None,
        }
    }
}

impl Default for SoGaal {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ThresholdPolicy> SoGaal<P> {
    #[must_use]
    pub fn with_stop_epochs(mut self, stop_epochs: usize) -> Self {
        self.config.stop_epochs = stop_epochs;
        self
    }

    /// Sets the discriminator learning rate.
    #[must_use]
    pub fn with_lr_d(mut self, lr_d: f32) -> Self {
        self.config.lr_d = lr_d;
        self
    }

    /// Sets the generator learning rate.
    #[must_use]
    pub fn with_lr_g(mut self, lr_g: f32) -> Self {
        self.config.lr_g = lr_g;
        self
    }

    #[must_use]
    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.config.momentum = momentum;
        self
    }

    #[must_use]
    pub fn with_contamination(mut self, contamination: f32) -> Self {
        self.config.contamination = contamination;
        self
    }

    /// Sets the random seed for reproducible training.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.config.random_state = Some(seed);
        self
    }

    /// Replace the thresholding collaborator.
    ///
    /// Any fitted state is dropped, since its labels came from the old
    /// policy.
    #[must_use]
    pub fn with_threshold_policy<Q: ThresholdPolicy>(self, policy: Q) -> SoGaal<Q> {
        SoGaal {
            config: self.config,
            threshold_policy: policy,
            fitted: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SoGaalConfig {
        &self.config
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Scores of the training rows, as computed at the end of `fit`.
    #[must_use]
    pub fn decision_scores(&self) -> Option<&Vector<f32>> {
        self.fitted.as_ref().map(|f| &f.decision_scores)
    }

    /// Cutoff above which a score marks an outlier.
    #[must_use]
    pub fn threshold(&self) -> Option<f32> {
        self.fitted.as_ref().map(|f| f.threshold)
    }

    /// Labels of the training rows.
    #[must_use]
    pub fn labels(&self) -> Option<&[i32]> {
        self.fitted.as_ref().map(|f| f.labels.as_slice())
    }

    /// Per-batch losses of the last `fit`.
    #[must_use]
    pub fn train_history(&self) -> Option<&TrainingHistory> {
        self.fitted.as_ref().map(|f| &f.history)
    }

    #[must_use]
    pub fn generator(&self) -> Option<&Generator> {
        self.fitted.as_ref().map(|f| &f.generator)
    }

    #[must_use]
    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.fitted.as_ref().map(|f| &f.discriminator)
    }

    /// Outlier probability of every row of `x` as an `n × 2` matrix of
    /// `[1 − p, p]`.
    ///
    /// `p` is the score min-max scaled against the training scores and
    /// clipped to `[0, 1]`. When every training score is equal, `p` is
    /// `1` above that score and `0` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector is not fitted or `x` is invalid.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let fitted = self.fitted()?;
        let scores = self.decision_function(x)?;

        let train = &fitted.decision_scores;
        let lo = train.min().unwrap_or(f32::NAN);
        let hi = train.max().unwrap_or(f32::NAN);
        let range = hi - lo;

        let mut data = Vec::with_capacity(scores.len() * 2);
        for &s in &scores {
            let p = if range > 0.0 {
                ((s - lo) / range).clamp(0.0, 1.0)
            } else if s > hi {
                1.0
            } else {
                0.0
            };
            data.push(1.0 - p);
            data.push(p);
        }
        Matrix::from_vec(scores.len(), 2, data).map_err(GaalError::from)
    }

    /// Score the training rows with the trained discriminator and apply
    /// the threshold policy. NaN scores flow through unchanged.
    fn label_training_set(
        &self,
        generator: Generator,
        discriminator: Discriminator,
        history: TrainingHistory,
        x: &Matrix<f32>,
    ) -> Result<FittedState> {
        let decision_scores = score_samples(&discriminator, x)?;
        let (threshold, labels) = self
            .threshold_policy
            .set_threshold_and_labels(&decision_scores, self.config.contamination);
        debug!(
            threshold,
            outliers = labels.iter().filter(|&&l| l == 1).count(),
            "training labels assigned"
        );

        Ok(FittedState {
            generator,
            discriminator,
            history,
            decision_scores,
            threshold,
            labels,
        })
    }

    fn fitted(&self) -> Result<&FittedState> {
        self.fitted
            .as_ref()
            .ok_or(GaalError::NotFitted { estimator: "SoGaal" })
    }
}

impl<P: ThresholdPolicy> OutlierDetector for SoGaal<P> {
    /// Train on `x` and store scores, threshold and labels.
    ///
    /// On error the detector keeps whatever state it had before.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        self.config.validate()?;
        check_array(x)?;

        let mut trainer = AdversarialTrainer::new(x.n_rows(), x.n_cols(), &self.config)?;
        trainer.fit(x)?;
        let (generator, discriminator, history) = trainer.into_parts();

        self.fitted = Some(self.label_training_set(generator, discriminator, history, x)?);
        Ok(())
    }

    fn decision_function(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let fitted = self.fitted()?;
        check_features(x, fitted.discriminator.n_features())?;
        score_samples(&fitted.discriminator, x)
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<i32>> {
        let threshold = self.fitted()?.threshold;
        let scores = self.decision_function(x)?;
        Ok(label_above(scores.as_slice(), threshold))
    }

    /// Fit on `x` and return the stored training labels.
    fn fit_predict(&mut self, x: &Matrix<f32>) -> Result<Vec<i32>> {
        self.fit(x)?;
        Ok(self.fitted()?.labels.clone())
    }
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
