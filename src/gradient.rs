//! Gradient of the coupled squared loss for a single sample.
//!
//! For a sample of task `t` with features `x` and label `y`, the loss only depends on the
//! segment `w_t`, so the gradient is zero everywhere else:
//!
//! ```text
//! g_t = (x . w_t - y) * x + reg * w_t + coupling_reg * s_t * (w0 - w1)
//! ```
//!
//! where `s_0 = 1` and `s_1 = -1`. The L2 term only penalizes the active segment.

use ndarray::{Array1, ArrayView1};

use crate::{
    dataset::{Sample, Task},
    error::Result,
    weights::WeightState,
};

/// The gradient restricted to the segment of the task that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentGradient {
    /// The task whose segment the gradient belongs to.
    pub task: Task,
    /// The `k` nonzero gradient entries.
    pub values: Vec<f32>,
    /// The prediction error `prediction - label`.
    pub error: f32,
}

impl SegmentGradient {
    /// Expands the gradient into the full `2k` layout of `WeightState`.
    pub fn to_dense(&self) -> Vec<f32> {
        let k = self.values.len();
        let mut dense = vec![0.0; 2 * k];
        let start = self.task.id() * k;
        dense[start..start + k].copy_from_slice(&self.values);
        dense
    }
}

/// Computes the gradient of a sample's loss in its sparse, single segment form.
///
/// # Arguments
/// * `sample` - The sample to differentiate the loss of.
/// * `weights` - The current weights of both tasks.
/// * `reg` - The L2 coefficient applied to the active segment.
/// * `coupling_reg` - The coefficient of the penalty pulling both segments together.
///
/// # Errors
/// `TrainErr::InvalidSample` if the sample's task id isn't 0 or 1, or its features don't
/// have `k` values.
pub fn compute_segment_gradient(
    sample: &Sample,
    weights: &WeightState,
    reg: f32,
    coupling_reg: f32,
) -> Result<SegmentGradient> {
    let task = sample.validate(weights.k().get())?;

    let x = ArrayView1::from(sample.features.as_slice());
    let w_active = ArrayView1::from(weights.segment(task));
    let w0 = ArrayView1::from(weights.w0());
    let w1 = ArrayView1::from(weights.w1());

    let error = x.dot(&w_active) - sample.label;

    let mut grad: Array1<f32> = x.mapv(|xi| xi * error);
    grad.scaled_add(reg, &w_active);
    grad.scaled_add(coupling_reg * task.coupling_sign(), &(&w0 - &w1));

    Ok(SegmentGradient {
        task,
        values: grad.to_vec(),
        error,
    })
}

/// Computes the full `2k` gradient of a sample's loss along with its prediction error.
///
/// Only the `k` entries of the sample's task segment can be nonzero.
///
/// # Errors
/// Same as `compute_segment_gradient`.
pub fn compute_gradient(
    sample: &Sample,
    weights: &WeightState,
    reg: f32,
    coupling_reg: f32,
) -> Result<(Vec<f32>, f32)> {
    let grad = compute_segment_gradient(sample, weights, reg, coupling_reg)?;
    Ok((grad.to_dense(), grad.error))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::error::{SampleFault, TrainErr};

    fn weights(w0: &[f32], w1: &[f32]) -> WeightState {
        WeightState::from_segments(w0, w1).unwrap()
    }

    #[test]
    fn error_term_only() {
        let sample = Sample::new(vec![1.0, 0.0], 5.0, 0);
        let w = WeightState::init_zero(NonZeroUsize::new(2).unwrap());

        let (grad, error) = compute_gradient(&sample, &w, 0.0, 0.0).unwrap();

        assert_eq!(error, -5.0);
        assert_eq!(grad, [-5.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn all_terms_for_first_task() {
        // error = 1 * 1 + 2 * 2 - 3 = 2
        let sample = Sample::new(vec![1.0, 2.0], 3.0, 0);
        let w = weights(&[1.0, 2.0], &[0.0, 4.0]);

        let (grad, error) = compute_gradient(&sample, &w, 0.5, 0.25).unwrap();

        // error * x = [2, 4], reg * w0 = [0.5, 1], coupling * (w0 - w1) = [0.25, -0.5]
        assert_eq!(error, 2.0);
        assert_eq!(grad, [2.75, 4.5, 0.0, 0.0]);
    }

    #[test]
    fn coupling_sign_flips_for_second_task() {
        // error = 4 * 1 - 4 = 0
        let sample = Sample::new(vec![0.0, 1.0], 4.0, 1);
        let w = weights(&[1.0, 2.0], &[0.0, 4.0]);

        let (grad, error) = compute_gradient(&sample, &w, 0.0, 1.0).unwrap();

        assert_eq!(error, 0.0);
        assert_eq!(grad, [0.0, 0.0, -1.0, 2.0]);
    }

    #[test]
    fn gradient_is_zero_outside_the_active_segment() {
        let w = weights(&[0.3, -1.2, 2.0], &[1.1, 0.4, -0.7]);

        for task_id in [0, 1] {
            let sample = Sample::new(vec![0.5, -2.0, 1.5], 0.8, task_id);
            let (grad, _) = compute_gradient(&sample, &w, 0.1, 0.7).unwrap();

            let inactive = if task_id == 0 { &grad[3..] } else { &grad[..3] };
            assert!(inactive.iter().all(|g| *g == 0.0), "got {grad:?}");
        }
    }

    #[test]
    fn sparse_and_dense_forms_agree() {
        let sample = Sample::new(vec![0.5, -2.0], 0.8, 1);
        let w = weights(&[0.3, -1.2], &[1.1, 0.4]);

        let sparse = compute_segment_gradient(&sample, &w, 0.2, 0.3).unwrap();
        let (dense, error) = compute_gradient(&sample, &w, 0.2, 0.3).unwrap();

        assert_eq!(sparse.task, Task::Second);
        assert_eq!(sparse.error, error);
        assert_eq!(&dense[2..], sparse.values.as_slice());
    }

    #[test]
    fn invalid_samples_are_rejected() {
        let w = WeightState::init_zero(NonZeroUsize::new(2).unwrap());

        let unknown_task = Sample::new(vec![1.0, 1.0], 1.0, 2);
        let err = compute_gradient(&unknown_task, &w, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            TrainErr::InvalidSample {
                fault: SampleFault::UnknownTask { task_id: 2 },
                ..
            }
        ));

        let short = Sample::new(vec![1.0], 1.0, 0);
        let err = compute_gradient(&short, &w, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            TrainErr::InvalidSample {
                fault: SampleFault::FeatureLength { got: 1, expected: 2 },
                ..
            }
        ));
    }
}
