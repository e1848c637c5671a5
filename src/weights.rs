use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    num::NonZeroUsize,
    ops::Range,
    path::Path,
};

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::Task,
    error::{Result, SampleFault, TrainErr},
};

/// The weights of both tasks stored as a single contiguous buffer of `2k` values.
///
/// The first `k` values are the weights of `Task::First` (`w0`) and the last `k`
/// the ones of `Task::Second` (`w1`). The segments never change length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights", into = "RawWeights")]
pub struct WeightState {
    k: NonZeroUsize,
    params: Vec<f32>,
}

/// The persisted form of `WeightState`, a flat array tagged with `k`.
#[derive(Serialize, Deserialize)]
struct RawWeights {
    k: NonZeroUsize,
    params: Vec<f32>,
}

impl WeightState {
    /// Returns a new `WeightState` with every weight set to zero.
    ///
    /// # Arguments
    /// * `k` - The amount of features of each task.
    pub fn init_zero(k: NonZeroUsize) -> Self {
        Self {
            k,
            params: vec![0.0; 2 * k.get()],
        }
    }

    /// Builds a `WeightState` from an already laid out `[w0, w1]` buffer.
    ///
    /// # Errors
    /// `TrainErr::InvalidConfig` if `params` doesn't have exactly `2k` values.
    pub fn from_vec(k: NonZeroUsize, params: Vec<f32>) -> Result<Self> {
        if params.len() != 2 * k.get() {
            return Err(TrainErr::InvalidConfig(format!(
                "weights must have {} values for k = {k}, got {}",
                2 * k.get(),
                params.len()
            )));
        }

        Ok(Self { k, params })
    }

    /// Builds a `WeightState` from the two separate task vectors.
    ///
    /// # Errors
    /// `TrainErr::InvalidConfig` if the vectors are empty or their lengths differ.
    pub fn from_segments(w0: &[f32], w1: &[f32]) -> Result<Self> {
        let k = NonZeroUsize::new(w0.len())
            .ok_or_else(|| TrainErr::InvalidConfig("task weights can't be empty".into()))?;

        if w1.len() != w0.len() {
            return Err(TrainErr::InvalidConfig(format!(
                "task weights differ in length: {} and {}",
                w0.len(),
                w1.len()
            )));
        }

        let params = w0.iter().chain(w1).copied().collect();
        Ok(Self { k, params })
    }

    pub fn k(&self) -> NonZeroUsize {
        self.k
    }

    /// The full `2k` buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.params
    }

    fn range(&self, task: Task) -> Range<usize> {
        let k = self.k.get();
        let start = task.id() * k;
        start..start + k
    }

    /// Read access to the `k` weights of `task`.
    pub fn segment(&self, task: Task) -> &[f32] {
        &self.params[self.range(task)]
    }

    /// Write access to the `k` weights of `task`, reserved for the training loop.
    pub(crate) fn segment_mut(&mut self, task: Task) -> &mut [f32] {
        let range = self.range(task);
        &mut self.params[range]
    }

    pub fn w0(&self) -> &[f32] {
        self.segment(Task::First)
    }

    pub fn w1(&self) -> &[f32] {
        self.segment(Task::Second)
    }

    /// Euclidean distance between `w0` and `w1`.
    pub fn segment_distance(&self) -> f32 {
        self.w0()
            .iter()
            .zip(self.w1())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    /// Predicts the label of `features` with the weights of `task`.
    ///
    /// # Errors
    /// `TrainErr::InvalidSample` if `features` doesn't have `k` values.
    pub fn predict(&self, task: Task, features: &[f32]) -> Result<f32> {
        if features.len() != self.k.get() {
            let fault = SampleFault::FeatureLength {
                got: features.len(),
                expected: self.k.get(),
            };
            return Err(TrainErr::invalid_sample(fault));
        }

        let x = ArrayView1::from(features);
        let w = ArrayView1::from(self.segment(task));
        Ok(x.dot(&w))
    }

    /// Writes the weights to `path` as `{ "k": k, "params": [w0, w1] }` JSON.
    ///
    /// # Errors
    /// `TrainErr::Io` or `TrainErr::Json` if the file can't be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads weights written by `save`.
    ///
    /// # Errors
    /// `TrainErr::Io` if the file can't be read, `TrainErr::Json` if it is malformed or
    /// `params` doesn't hold `2k` values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Whether every weight of `task` is finite.
    pub(crate) fn is_finite(&self, task: Task) -> bool {
        self.segment(task).iter().all(|w| w.is_finite())
    }
}

impl TryFrom<RawWeights> for WeightState {
    type Error = TrainErr;

    fn try_from(raw: RawWeights) -> Result<Self> {
        Self::from_vec(raw.k, raw.params)
    }
}

impl From<WeightState> for RawWeights {
    fn from(weights: WeightState) -> Self {
        Self {
            k: weights.k,
            params: weights.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn init_zero_has_two_segments() {
        let weights = WeightState::init_zero(k(3));

        assert_eq!(weights.as_slice(), [0.0; 6]);
        assert_eq!(weights.w0().len(), 3);
        assert_eq!(weights.w1().len(), 3);
    }

    #[test]
    fn segments_are_contiguous_halves() {
        let mut weights = WeightState::from_vec(k(2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();

        assert_eq!(weights.segment(Task::First), [1.0, 2.0]);
        assert_eq!(weights.segment(Task::Second), [3.0, 4.0]);

        weights.segment_mut(Task::Second)[0] = 9.0;
        assert_eq!(weights.as_slice(), [1.0, 2.0, 9.0, 4.0]);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(WeightState::from_vec(k(2), vec![0.0; 3]).is_err());
        assert!(WeightState::from_segments(&[1.0], &[1.0, 2.0]).is_err());
        assert!(WeightState::from_segments(&[], &[]).is_err());
    }

    #[test]
    fn distance_and_prediction() {
        let weights = WeightState::from_segments(&[0.0, 0.0], &[3.0, 4.0]).unwrap();

        assert_eq!(weights.segment_distance(), 5.0);
        assert_eq!(weights.predict(Task::Second, &[1.0, 2.0]).unwrap(), 11.0);
        assert!(weights.predict(Task::First, &[1.0]).is_err());
    }

    #[test]
    fn json_roundtrip_checks_length() {
        let weights = WeightState::from_segments(&[1.0, 2.0], &[3.0, 4.0]).unwrap();
        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(json, r#"{"k":2,"params":[1.0,2.0,3.0,4.0]}"#);

        let parsed: WeightState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, weights);

        let broken = r#"{"k":2,"params":[1.0,2.0,3.0]}"#;
        assert!(serde_json::from_str::<WeightState>(broken).is_err());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("weights-{}.json", std::process::id()));
        let weights = WeightState::from_segments(&[0.5, -1.5], &[2.0, 0.25]).unwrap();

        weights.save(&path).unwrap();
        let loaded = WeightState::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, weights);
        assert!(matches!(WeightState::load(&path), Err(TrainErr::Io(_))));
    }
}
