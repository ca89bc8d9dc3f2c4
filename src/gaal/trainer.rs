//! Adversarial training loop.
//!
//! Every batch:
//! 1. sample latent noise uniformly in `[0, 1)^d`
//! 2. step the discriminator on `BCE(D(real), 1) + BCE(D(G(noise)), 0)`
//! 3. evaluate the generator loss `BCE(D(G(noise)), 1)` against the
//!    updated discriminator, stepping the generator only while the
//!    schedule is [`Phase::Growing`]
//! 4. record both losses
//!
//! # References
//!
//! - Liu, Y., et al. (2019). Generative adversarial active learning for
//!   unsupervised outlier detection. IEEE TKDE.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use super::config::SoGaalConfig;
use super::discriminator::Discriminator;
use super::generator::Generator;
use super::history::TrainingHistory;
use super::schedule::{Phase, PhaseSchedule};
use super::validation::check_features;
use crate::autograd::{clear_graph, no_grad, Tensor};
use crate::error::{GaalError, Result};
use crate::nn::{BCELoss, Module, Optimizer, SGD};
use crate::primitives::{Matrix, Vector};

/// Upper bound on the mini-batch size.
pub const MAX_BATCH_SIZE: usize = 500;

/// One adversarial training session.
///
/// Owns its generator, discriminator, optimizers, RNG and history, so
/// sessions on different threads are independent. Training can be
/// driven an epoch at a time with [`train_epoch`](Self::train_epoch) or
/// run to completion with [`fit`](Self::fit).
///
/// # Examples
///
/// ```
/// use gaal::gaal::{AdversarialTrainer, Phase, SoGaalConfig};
/// use gaal::primitives::Matrix;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 0.1, 0.2, 5.0]).expect("4x1");
/// let config = SoGaalConfig::default().with_stop_epochs(1).with_random_state(3);
/// let mut trainer = AdversarialTrainer::new(4, 1, &config).expect("valid config");
///
/// assert_eq!(trainer.train_epoch(&x).expect("epoch"), Phase::Growing);
/// trainer.fit(&x).expect("remaining epochs");
/// assert_eq!(trainer.epoch(), 3);
/// assert_eq!(trainer.history().len(), 3);
/// ```
#[derive(Debug)]
pub struct AdversarialTrainer {
    generator: Generator,
    discriminator: Discriminator,
    optimizer_g: SGD,
    optimizer_d: SGD,
    criterion: BCELoss,
    schedule: PhaseSchedule,
    batch_size: usize,
    /// Completed epochs
    epoch: usize,
    history: TrainingHistory,
    rng: StdRng,
}

impl AdversarialTrainer {
    /// Set up networks and optimizers for `n_samples × n_features` data.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation or either dimension
    /// is zero.
    pub fn new(n_samples: usize, n_features: usize, config: &SoGaalConfig) -> Result<Self> {
        config.validate()?;
        if n_samples == 0 {
            return Err(GaalError::empty_input("training set has no samples"));
        }
        if n_features == 0 {
            return Err(GaalError::empty_input("training set has no features"));
        }

        let mut rng = match config.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let generator = Generator::new(n_features);
        let discriminator = Discriminator::new(n_features, n_samples, &mut rng);
        let optimizer_g = SGD::with_momentum(&generator.parameters(), config.lr_g, config.momentum);
        let optimizer_d =
            SGD::with_momentum(&discriminator.parameters(), config.lr_d, config.momentum);

        Ok(Self {
            generator,
            discriminator,
            optimizer_g,
            optimizer_d,
            criterion: BCELoss::new(),
            schedule: PhaseSchedule::new(config.stop_epochs),
            batch_size: n_samples.min(MAX_BATCH_SIZE),
            epoch: 0,
            history: TrainingHistory::new(),
            rng,
        })
    }

    /// Completed epochs.
    #[must_use]
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    #[must_use]
    pub fn total_epochs(&self) -> usize {
        self.schedule.total_epochs()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.epoch >= self.total_epochs()
    }

    /// Phase the next epoch will run under.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.schedule.phase_for(self.epoch)
    }

    #[must_use]
    pub fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    #[must_use]
    pub fn discriminator(&self) -> &Discriminator {
        &self.discriminator
    }

    #[must_use]
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Give up the trained networks and the loss history.
    #[must_use]
    pub fn into_parts(self) -> (Generator, Discriminator, TrainingHistory) {
        (self.generator, self.discriminator, self.history)
    }

    /// Run one epoch of shuffled mini-batches over `x`.
    ///
    /// Returns the phase the epoch ran under.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` is empty, non-finite, or has the wrong
    /// number of columns, or if a forward pass fails.
    pub fn train_epoch(&mut self, x: &Matrix<f32>) -> Result<Phase> {
        check_features(x, self.generator.n_features())?;

        let phase = self.phase();
        if self.schedule.is_transition(self.epoch) {
            debug!(epoch = self.epoch, "generator frozen");
        }

        let mut indices: Vec<usize> = (0..x.n_rows()).collect();
        indices.shuffle(&mut self.rng);

        for batch in indices.chunks(self.batch_size) {
            let real = Tensor::from_matrix(&x.select_rows(batch));
            let (d_loss, g_loss) = self.train_batch(&real, phase)?;
            self.history.record(d_loss, g_loss);
        }

        self.epoch += 1;
        let (d_loss, g_loss) = self.history.last().unwrap_or((f32::NAN, f32::NAN));
        debug!(
            epoch = self.epoch,
            total = self.total_epochs(),
            %phase,
            discriminator_loss = d_loss,
            generator_loss = g_loss,
            "epoch complete"
        );
        Ok(phase)
    }

    /// Run every remaining epoch.
    ///
    /// # Errors
    ///
    /// Same as [`train_epoch`](Self::train_epoch).
    pub fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        check_features(x, self.generator.n_features())?;
        info!(
            n_samples = x.n_rows(),
            n_features = x.n_cols(),
            hidden_width = self.discriminator.hidden_width(),
            batch_size = self.batch_size,
            total_epochs = self.total_epochs(),
            lr_d = self.optimizer_d.lr(),
            lr_g = self.optimizer_g.lr(),
            momentum = self.optimizer_d.momentum(),
            "adversarial training started"
        );

        while !self.is_finished() {
            self.train_epoch(x)?;
        }

        info!(
            batches = self.history.len(),
            "adversarial training finished"
        );
        Ok(())
    }

    /// Discriminator output for every row of `x`, in row order.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` is empty, non-finite, or has the wrong
    /// number of columns.
    pub fn score(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        check_features(x, self.discriminator.n_features())?;
        score_samples(&self.discriminator, x)
    }

    fn train_batch(&mut self, real: &Tensor, phase: Phase) -> Result<(f32, f32)> {
        let batch = real.shape()[0];
        let latent = Tensor::rand_uniform(&[batch, self.generator.n_features()], &mut self.rng);

        // Discriminator step. The generator only supplies input data here.
        clear_graph();
        let fake = no_grad(|| self.generator.forward(&latent))?;
        let real_loss = self
            .criterion
            .forward(&self.discriminator.forward(real)?, &Tensor::ones(&[batch, 1]));
        let fake_loss = self
            .criterion
            .forward(&self.discriminator.forward(&fake)?, &Tensor::zeros(&[batch, 1]));
        let d_loss = real_loss.add(&fake_loss);
        d_loss.backward();
        self.optimizer_d
            .step(&mut self.discriminator.parameters_mut());

        // Generator step against the updated discriminator.
        clear_graph();
        let targets = Tensor::ones(&[batch, 1]);
        let g_loss = if phase.trains_generator() {
            let g_loss = self.criterion.forward(
                &self.discriminator.forward(&self.generator.forward(&latent)?)?,
                &targets,
            );
            g_loss.backward();
            self.optimizer_g.step(&mut self.generator.parameters_mut());
            g_loss
        } else {
            no_grad(|| -> Result<Tensor> {
                let fake = self.generator.forward(&latent)?;
                Ok(self
                    .criterion
                    .forward(&self.discriminator.forward(&fake)?, &targets))
            })?
        };
        clear_graph();

        Ok((d_loss.item(), g_loss.item()))
    }
}

/// One untracked forward pass of `discriminator` over all rows of `x`.
///
/// NaN parameters from a diverged run come through as NaN scores.
pub(crate) fn score_samples(discriminator: &Discriminator, x: &Matrix<f32>) -> Result<Vector<f32>> {
    let probs = no_grad(|| discriminator.forward(&Tensor::from_matrix(x)))?;
    Ok(Vector::from_slice(probs.data()))
}

#[cfg(test)]
#[path = "trainer_tests.rs"]
mod tests;
