/// The step rule applied to the active weight segment after every sample.
pub trait Optimizer {
    /// Moves `segment` along `grad`, both of the same `k` length.
    fn update_params(&mut self, segment: &mut [f32], grad: &[f32]);
}
