use std::num::NonZeroUsize;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{Sample, Task},
    error::{Result, TrainErr},
    weights::WeightState,
};

/// Describes a pair of nearby linear regression problems to sample data from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub k: NonZeroUsize,
    pub samples_per_task: usize,
    /// Standard deviation of the noise added to every label.
    #[serde(default = "default_noise_std")]
    pub noise_std: f32,
    /// Standard deviation of each entry of `w1* - w0*`.
    pub task_gap: f32,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_noise_std() -> f32 {
    0.1
}

/// Generated samples along with the weights that produced them.
#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub samples: Vec<Sample>,
    pub truth: WeightState,
}

impl SyntheticConfig {
    /// Samples the ground truth of both tasks and then `samples_per_task` labeled samples
    /// of each, interleaved as `[task 0, task 1, task 0, ...]`.
    ///
    /// `w0*` has standard normal entries, `w1*` is `w0*` plus a normal offset of deviation
    /// `task_gap`. Features are standard normal.
    ///
    /// # Errors
    /// `TrainErr::InvalidConfig` if `noise_std` or `task_gap` is negative or not finite.
    pub fn generate(&self) -> Result<SyntheticData> {
        for (name, value) in [("noise_std", self.noise_std), ("task_gap", self.task_gap)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TrainErr::InvalidConfig(format!(
                    "{name} must be non negative and finite, got {value}"
                )));
            }
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let k = self.k.get();
        let standard = Normal::new(0.0, 1.0)?;
        let gap = Normal::new(0.0, self.task_gap)?;
        let noise = Normal::new(0.0, self.noise_std)?;

        let w0: Vec<f32> = standard.sample_iter(&mut rng).take(k).collect();
        let w1: Vec<f32> = w0.iter().map(|w| w + gap.sample(&mut rng)).collect();
        let truth = WeightState::from_segments(&w0, &w1)?;

        let mut samples = Vec::with_capacity(2 * self.samples_per_task);
        for _ in 0..self.samples_per_task {
            for task in Task::ALL {
                samples.push(draw_sample(&mut rng, &standard, &noise, &truth, task)?);
            }
        }

        Ok(SyntheticData { samples, truth })
    }
}

fn draw_sample<R: Rng>(
    rng: &mut R,
    features: &Normal<f32>,
    noise: &Normal<f32>,
    truth: &WeightState,
    task: Task,
) -> Result<Sample> {
    let x: Vec<f32> = features
        .sample_iter(&mut *rng)
        .take(truth.k().get())
        .collect();
    let y = truth.predict(task, &x)? + noise.sample(rng);

    Ok(Sample::new(x, y, task.id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> SyntheticConfig {
        SyntheticConfig {
            k: NonZeroUsize::new(3).unwrap(),
            samples_per_task: 5,
            noise_std: 0.0,
            task_gap: 0.2,
            seed: Some(seed),
        }
    }

    #[test]
    fn samples_are_interleaved_and_noise_free() {
        let data = config(7).generate().unwrap();

        assert_eq!(data.samples.len(), 10);
        for (i, sample) in data.samples.iter().enumerate() {
            assert_eq!(sample.task_id, i % 2);
            assert_eq!(sample.features.len(), 3);

            let task = Task::try_from(sample.task_id).unwrap();
            let expected = data.truth.predict(task, &sample.features).unwrap();
            assert_eq!(sample.label, expected);
        }
    }

    #[test]
    fn same_seed_same_data() {
        let a = config(11).generate().unwrap();
        let b = config(11).generate().unwrap();

        assert_eq!(a.samples, b.samples);
        assert_eq!(a.truth, b.truth);
    }

    #[test]
    fn invalid_deviations_are_rejected() {
        for bad in [-1.0, f32::NAN, f32::INFINITY] {
            let mut cfg = config(0);
            cfg.task_gap = bad;
            assert!(matches!(cfg.generate(), Err(TrainErr::InvalidConfig(_))));

            let mut cfg = config(0);
            cfg.noise_std = bad;
            assert!(matches!(cfg.generate(), Err(TrainErr::InvalidConfig(_))));
        }
    }
}
