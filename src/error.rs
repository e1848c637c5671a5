use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, TrainErr>;

/// The reason a sample was rejected by the gradient computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFault {
    /// The task id is neither 0 nor 1.
    UnknownTask { task_id: usize },
    /// The amount of features differs from the model's `k`.
    FeatureLength { got: usize, expected: usize },
}

impl Display for SampleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleFault::UnknownTask { task_id } => {
                write!(f, "task id {task_id} is not one of 0 or 1")
            }
            SampleFault::FeatureLength { got, expected } => {
                write!(f, "got {got} features, expected {expected}")
            }
        }
    }
}

/// The training error type.
#[derive(Debug)]
pub enum TrainErr {
    /// A sample could not be used for training.
    ///
    /// `index` is the position of the sample in the input sequence, or `None` when the
    /// gradient was requested outside of a training run.
    InvalidSample {
        index: Option<usize>,
        fault: SampleFault,
    },
    /// A prediction error or a weight became NaN or infinite.
    NumericDivergence { epoch: usize, index: usize },
    /// The hyperparameters or the weights given to the trainer are invalid.
    InvalidConfig(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl TrainErr {
    pub(crate) fn invalid_sample(fault: SampleFault) -> Self {
        Self::InvalidSample { index: None, fault }
    }

    /// Attaches the sample position to an `InvalidSample` error, any other error is
    /// returned untouched.
    pub(crate) fn at_index(self, index: usize) -> Self {
        match self {
            Self::InvalidSample { fault, .. } => Self::InvalidSample {
                index: Some(index),
                fault,
            },
            other => other,
        }
    }
}

impl Display for TrainErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainErr::InvalidSample {
                index: Some(index),
                fault,
            } => write!(f, "invalid sample at index {index}: {fault}"),
            TrainErr::InvalidSample { index: None, fault } => {
                write!(f, "invalid sample: {fault}")
            }
            TrainErr::NumericDivergence { epoch, index } => write!(
                f,
                "training diverged at epoch {epoch}, sample {index}: non finite values found"
            ),
            TrainErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            TrainErr::Io(e) => write!(f, "io error: {e}"),
            TrainErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for TrainErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TrainErr::Io(e) => Some(e),
            TrainErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TrainErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for TrainErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<rand_distr::NormalError> for TrainErr {
    fn from(value: rand_distr::NormalError) -> Self {
        Self::InvalidConfig(format!("invalid normal distribution: {value}"))
    }
}
