//! Two-phase training schedule.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Total epochs are this multiple of the growing-phase length.
pub const TOTAL_EPOCH_FACTOR: usize = 3;

/// Training regime for one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Generator and discriminator both take a step every batch.
    Growing,
    /// Only the discriminator is stepped; the generator loss is still
    /// evaluated and recorded.
    Frozen,
}

impl Phase {
    /// Whether the generator receives parameter updates in this phase.
    #[must_use]
    pub fn trains_generator(self) -> bool {
        matches!(self, Phase::Growing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Growing => write!(f, "growing"),
            Phase::Frozen => write!(f, "frozen"),
        }
    }
}

/// Maps an epoch index to its [`Phase`].
///
/// Epochs `0..stop_epochs` are [`Phase::Growing`]; every later epoch is
/// [`Phase::Frozen`]. A full run lasts `3 × stop_epochs` epochs.
///
/// # Examples
///
/// ```
/// use gaal::gaal::{Phase, PhaseSchedule};
///
/// let schedule = PhaseSchedule::new(2);
/// assert_eq!(schedule.total_epochs(), 6);
/// assert_eq!(schedule.phase_for(1), Phase::Growing);
/// assert_eq!(schedule.phase_for(2), Phase::Frozen);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSchedule {
    stop_epochs: usize,
}

impl PhaseSchedule {
    #[must_use]
    pub fn new(stop_epochs: usize) -> Self {
        Self { stop_epochs }
    }

    /// Length of the growing phase.
    #[must_use]
    pub fn stop_epochs(&self) -> usize {
        self.stop_epochs
    }

    #[must_use]
    pub fn total_epochs(&self) -> usize {
        self.stop_epochs.saturating_mul(TOTAL_EPOCH_FACTOR)
    }

    #[must_use]
    pub fn phase_for(&self, epoch: usize) -> Phase {
        if epoch < self.stop_epochs {
            Phase::Growing
        } else {
            Phase::Frozen
        }
    }

    /// True for the first frozen epoch.
    #[must_use]
    pub fn is_transition(&self, epoch: usize) -> bool {
        epoch == self.stop_epochs
    }
}
