use rand::{SeedableRng, rngs::StdRng};

use super::{Hyperparameters, LogMonitor, Monitor, Trainer};
use crate::error::Result;

/// Builds `Trainer`s given their hyperparameters.
pub struct TrainerBuilder {
    monitor: Box<dyn Monitor>,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder` that reports losses through the log.
    pub fn new() -> Self {
        Self {
            monitor: Box::new(LogMonitor),
        }
    }

    /// Replaces the monitor handed to the built trainer.
    pub fn monitor<M>(mut self, monitor: M) -> Self
    where
        M: Monitor + 'static,
    {
        self.monitor = Box::new(monitor);
        self
    }

    /// Builds a plain SGD `Trainer` following `hyperparameters`.
    ///
    /// # Errors
    /// `TrainErr::InvalidConfig` if the hyperparameters don't validate.
    pub fn build(self, hyperparameters: Hyperparameters) -> Result<Trainer<StdRng>> {
        let rng = self.generate_rng(hyperparameters.seed);
        Trainer::new(hyperparameters, self.monitor, rng)
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
