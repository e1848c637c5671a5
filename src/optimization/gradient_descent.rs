use ndarray::{ArrayView1, ArrayViewMut1};

use super::Optimizer;

/// Plain stochastic gradient descent, without momentum nor an adaptive step size.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    /// Computes `segment - learning_rate * grad` in place.
    fn update_params(&mut self, segment: &mut [f32], grad: &[f32]) {
        let mut segment = ArrayViewMut1::from(segment);
        segment.scaled_add(-self.learning_rate, &ArrayView1::from(grad));
    }
}
