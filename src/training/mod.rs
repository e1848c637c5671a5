mod builder;
mod config;
mod monitor;
mod trainer;

pub use builder::TrainerBuilder;
pub use config::Hyperparameters;
pub use monitor::{EpochLosses, LogMonitor, Monitor, NoopMonitor};
pub use trainer::{TrainOutcome, Trainer};

use crate::{dataset::Sample, error::Result, weights::WeightState};

/// Trains both task models on `samples` with a trainer built from `hyperparameters`.
///
/// Shorthand for `TrainerBuilder::new().build(hyperparameters)?.train(..)`.
///
/// # Errors
/// Any error of `TrainerBuilder::build` or `Trainer::train`.
pub fn train(
    samples: &[Sample],
    initial_weights: WeightState,
    hyperparameters: &Hyperparameters,
) -> Result<TrainOutcome> {
    TrainerBuilder::new()
        .build(hyperparameters.clone())?
        .train(samples, initial_weights)
}
