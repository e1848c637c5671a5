use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainErr};

/// The immutable parameters of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Amount of features per sample, and of weights per task.
    pub k: NonZeroUsize,
    /// L2 coefficient, applied only to the segment of the sample's task.
    #[serde(default)]
    pub reg: f32,
    /// Coefficient of the penalty on the distance between both tasks' weights.
    #[serde(default)]
    pub coupling_reg: f32,
    pub learning_rate: f32,
    /// Amount of full passes over the samples. Zero leaves the weights untouched.
    pub num_epochs: usize,
    /// Every how many epochs the cumulative squared error gets recorded.
    #[serde(default = "default_report_interval")]
    pub report_interval: NonZeroUsize,
    /// Whether to visit the samples in a new random order on every epoch.
    #[serde(default = "default_permute")]
    pub permute: bool,
    /// Seed for the permutations, taken from the OS when missing.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_report_interval() -> NonZeroUsize {
    NonZeroUsize::MIN
}

fn default_permute() -> bool {
    true
}

impl Hyperparameters {
    /// Returns hyperparameters with no regularization, reporting every epoch and visiting
    /// the samples in order.
    ///
    /// # Arguments
    /// * `k` - Amount of features per sample.
    /// * `learning_rate` - The SGD step size.
    /// * `num_epochs` - Amount of passes over the samples.
    pub fn new(k: NonZeroUsize, learning_rate: f32, num_epochs: usize) -> Self {
        Self {
            k,
            reg: 0.0,
            coupling_reg: 0.0,
            learning_rate,
            num_epochs,
            report_interval: default_report_interval(),
            permute: false,
            seed: None,
        }
    }

    pub fn with_reg(mut self, reg: f32) -> Self {
        self.reg = reg;
        self
    }

    pub fn with_coupling_reg(mut self, coupling_reg: f32) -> Self {
        self.coupling_reg = coupling_reg;
        self
    }

    pub fn with_report_interval(mut self, report_interval: NonZeroUsize) -> Self {
        self.report_interval = report_interval;
        self
    }

    pub fn with_permutation(mut self, seed: Option<u64>) -> Self {
        self.permute = true;
        self.seed = seed;
        self
    }

    /// Checks the coefficients are in their valid domain.
    ///
    /// # Errors
    /// `TrainErr::InvalidConfig` if `learning_rate` isn't a positive finite number or any of
    /// the regularization coefficients is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TrainErr::InvalidConfig(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }

        for (name, value) in [("reg", self.reg), ("coupling_reg", self.coupling_reg)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TrainErr::InvalidConfig(format!(
                    "{name} must be non negative and finite, got {value}"
                )));
            }
        }

        Ok(())
    }
}
