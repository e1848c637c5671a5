use serde::{Deserialize, Serialize};

use crate::error::{Result, SampleFault, TrainErr};

/// One of the two regression problems sharing the input space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    First = 0,
    Second = 1,
}

impl Task {
    /// Both tasks, in segment order.
    pub const ALL: [Task; 2] = [Task::First, Task::Second];

    /// The sign applied to `w0 - w1` in the coupling gradient of this task.
    pub fn coupling_sign(self) -> f32 {
        match self {
            Task::First => 1.0,
            Task::Second => -1.0,
        }
    }

    pub fn id(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Task {
    type Error = TrainErr;

    fn try_from(task_id: usize) -> Result<Self> {
        match task_id {
            0 => Ok(Task::First),
            1 => Ok(Task::Second),
            _ => Err(TrainErr::invalid_sample(SampleFault::UnknownTask { task_id })),
        }
    }
}

/// A single labeled sample tagged with the task it belongs to.
///
/// Samples are stored as given; whether `task_id` and the feature length are valid is
/// checked when a gradient is computed for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Vec<f32>,
    pub label: f32,
    pub task_id: usize,
}

impl Sample {
    /// Creates a new `Sample`.
    ///
    /// # Arguments
    /// * `features` - The input vector, expected to have `k` entries.
    /// * `label` - The regression target.
    /// * `task_id` - The task this sample belongs to, expected to be 0 or 1.
    pub fn new(features: Vec<f32>, label: f32, task_id: usize) -> Self {
        Self {
            features,
            label,
            task_id,
        }
    }

    /// Resolves the task of this sample and checks its feature length against `k`.
    ///
    /// # Errors
    /// `TrainErr::InvalidSample` if the task id is unknown or the length is wrong.
    pub fn validate(&self, k: usize) -> Result<Task> {
        let task = Task::try_from(self.task_id)?;

        if self.features.len() != k {
            let fault = SampleFault::FeatureLength {
                got: self.features.len(),
                expected: k,
            };
            return Err(TrainErr::invalid_sample(fault));
        }

        Ok(task)
    }
}

/// Returns the samples belonging to `task`, keeping their relative order.
pub fn filter_task(samples: &[Sample], task: Task) -> Vec<Sample> {
    samples
        .iter()
        .filter(|s| s.task_id == task.id())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_conversion() {
        assert_eq!(Task::try_from(0).unwrap(), Task::First);
        assert_eq!(Task::try_from(1).unwrap(), Task::Second);
        assert!(Task::try_from(2).is_err());
        assert_eq!(Task::Second.coupling_sign(), -1.0);
    }

    #[test]
    fn validate_rejects_wrong_length() {
        let sample = Sample::new(vec![1.0, 2.0, 3.0], 1.0, 0);

        assert_eq!(sample.validate(3).unwrap(), Task::First);
        let err = sample.validate(2).unwrap_err();
        assert!(matches!(
            err,
            TrainErr::InvalidSample {
                index: None,
                fault: SampleFault::FeatureLength {
                    got: 3,
                    expected: 2
                }
            }
        ));
    }

    #[test]
    fn filter_task_keeps_order() {
        let samples = [
            Sample::new(vec![1.0], 1.0, 0),
            Sample::new(vec![2.0], 2.0, 1),
            Sample::new(vec![3.0], 3.0, 0),
        ];

        let firsts = filter_task(&samples, Task::First);
        let labels: Vec<_> = firsts.iter().map(|s| s.label).collect();
        assert_eq!(labels, [1.0, 3.0]);
    }
}
