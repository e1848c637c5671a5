//! Joint training of two related linear regression models.
//!
//! Both models share the input space and are learned with per sample stochastic gradient
//! descent over a single `[w0, w1]` weight buffer. Besides the squared error and a task local
//! L2 term, a coupling term penalizes the distance between `w0` and `w1`, pulling the task
//! that is being updated towards the other one.

pub mod dataset;
pub mod error;
pub mod gradient;
pub mod optimization;
pub mod synthetic;
pub mod training;
pub mod weights;

pub use dataset::{Sample, Task};
pub use error::{Result, SampleFault, TrainErr};
pub use gradient::{SegmentGradient, compute_gradient, compute_segment_gradient};
pub use training::{
    EpochLosses, Hyperparameters, Monitor, TrainOutcome, Trainer, TrainerBuilder, train,
};
pub use weights::WeightState;
