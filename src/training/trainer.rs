use log::{debug, info, warn};
use rand::{Rng, seq::SliceRandom};

use super::{EpochLosses, Hyperparameters, Monitor};
use crate::{
    dataset::Sample,
    error::{Result, TrainErr},
    gradient::compute_segment_gradient,
    optimization::{GradientDescent, Optimizer},
    weights::WeightState,
};

/// The result of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutcome {
    pub weights: WeightState,
    pub epoch_losses: EpochLosses,
}

impl TrainOutcome {
    /// The learned weights of the first task.
    pub fn w0(&self) -> &[f32] {
        self.weights.w0()
    }

    /// The learned weights of the second task.
    pub fn w1(&self) -> &[f32] {
        self.weights.w1()
    }
}

/// Trains both task models jointly with per sample stochastic gradient descent.
///
/// The step size of every update is the validated `learning_rate` of the hyperparameters.
pub struct Trainer<R>
where
    R: Rng,
{
    hyperparameters: Hyperparameters,
    optimizer: GradientDescent,
    monitor: Box<dyn Monitor>,
    rng: R,
}

impl<R> Trainer<R>
where
    R: Rng,
{
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `hyperparameters` - The parameters of every run of this trainer.
    /// * `monitor` - Observer of the recorded losses.
    /// * `rng` - The source of the sample permutations.
    ///
    /// # Errors
    /// `TrainErr::InvalidConfig` if the hyperparameters don't validate.
    pub fn new(
        hyperparameters: Hyperparameters,
        monitor: Box<dyn Monitor>,
        rng: R,
    ) -> Result<Self> {
        hyperparameters.validate()?;
        let optimizer = GradientDescent::new(hyperparameters.learning_rate);

        Ok(Self {
            hyperparameters,
            optimizer,
            monitor,
            rng,
        })
    }

    /// Runs `num_epochs` epochs over `samples` starting from `initial_weights`.
    ///
    /// Every sample updates only the segment of its own task. When `permute` is set the
    /// samples are visited in a new random order on every epoch, otherwise in input order.
    ///
    /// # Returns
    /// The final weights and the cumulative squared error of every `report_interval`-th
    /// epoch.
    ///
    /// # Errors
    /// * `TrainErr::InvalidConfig` if `initial_weights` wasn't built for `k` features.
    /// * `TrainErr::InvalidSample` on the first sample with a bad task id or length.
    /// * `TrainErr::NumericDivergence` as soon as an error, a weight or the epoch loss
    ///   stops being finite.
    pub fn train(
        &mut self,
        samples: &[Sample],
        initial_weights: WeightState,
    ) -> Result<TrainOutcome> {
        let num_epochs = self.hyperparameters.num_epochs;
        let report_interval = self.hyperparameters.report_interval.get();
        let permute = self.hyperparameters.permute;
        let k = self.hyperparameters.k;

        if initial_weights.k() != k {
            return Err(TrainErr::InvalidConfig(format!(
                "initial weights were built for k = {}, expected k = {k}",
                initial_weights.k()
            )));
        }

        info!(
            samples = samples.len(),
            epochs = num_epochs,
            permute = permute;
            "starting training"
        );

        let mut weights = initial_weights;
        let mut epoch_losses = EpochLosses::default();
        let mut order: Vec<usize> = (0..samples.len()).collect();

        for epoch in 0..num_epochs {
            if permute {
                order.shuffle(&mut self.rng);
            }

            let loss = self.run_epoch(epoch, samples, &order, &mut weights)?;
            debug!(epoch = epoch, loss = loss; "epoch done");

            if epoch % report_interval == 0 {
                epoch_losses.push(loss);
                self.monitor.report(epoch, loss);
            }
        }

        info!(
            distance = weights.segment_distance(),
            last_loss = epoch_losses.last().unwrap_or_default();
            "training finished"
        );

        Ok(TrainOutcome {
            weights,
            epoch_losses,
        })
    }

    fn run_epoch(
        &mut self,
        epoch: usize,
        samples: &[Sample],
        order: &[usize],
        weights: &mut WeightState,
    ) -> Result<f32> {
        let reg = self.hyperparameters.reg;
        let coupling_reg = self.hyperparameters.coupling_reg;
        let mut cumulative_squared_error = 0.0;

        for &index in order {
            let grad = compute_segment_gradient(&samples[index], weights, reg, coupling_reg)
                .map_err(|e| {
                    warn!(epoch = epoch, index = index; "aborting epoch: {e}");
                    e.at_index(index)
                })?;

            if !grad.error.is_finite() {
                return Err(diverged(epoch, index));
            }

            self.optimizer
                .update_params(weights.segment_mut(grad.task), &grad.values);

            if !weights.is_finite(grad.task) {
                return Err(diverged(epoch, index));
            }

            cumulative_squared_error += grad.error.powi(2);
            if !cumulative_squared_error.is_finite() {
                return Err(diverged(epoch, index));
            }
        }

        Ok(cumulative_squared_error)
    }
}

fn diverged(epoch: usize, index: usize) -> TrainErr {
    warn!(epoch = epoch, index = index; "non finite values, the learning rate may be too high");
    TrainErr::NumericDivergence { epoch, index }
}
