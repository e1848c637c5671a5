use log::info;

/// The cumulative squared errors recorded during a run, one per reported epoch.
///
/// Values can only be appended by the trainer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochLosses(Vec<f32>);

impl EpochLosses {
    pub(crate) fn push(&mut self, loss: f32) {
        self.0.push(loss);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recently recorded loss.
    pub fn last(&self) -> Option<f32> {
        self.0.last().copied()
    }
}

/// Observer of the losses recorded by the trainer.
///
/// Implementations only observe, they can't change the course of the training.
pub trait Monitor {
    /// Called every time a loss is recorded.
    ///
    /// # Arguments
    /// * `epoch` - The epoch the loss belongs to.
    /// * `loss` - The cumulative squared error of that epoch.
    fn report(&mut self, epoch: usize, loss: f32);
}

/// Writes every recorded loss to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMonitor;

impl Monitor for LogMonitor {
    fn report(&mut self, epoch: usize, loss: f32) {
        info!(epoch = epoch, loss = loss; "epoch finished");
    }
}

/// Ignores every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMonitor;

impl Monitor for NoopMonitor {
    fn report(&mut self, _epoch: usize, _loss: f32) {}
}

impl<F> Monitor for F
where
    F: FnMut(usize, f32),
{
    fn report(&mut self, epoch: usize, loss: f32) {
        self(epoch, loss)
    }
}
