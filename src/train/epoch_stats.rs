use serde::{Deserialize, Serialize};

/// Metrics of one training epoch.
///
/// All values describe the forward pass that opened the epoch, i.e. the
/// parameters *before* that epoch's update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Mean cross-entropy over the batch.
    pub loss: f64,
    /// Fraction of samples whose arg-max class is correct, in [0, 1].
    pub accuracy: f64,
    /// Learning rate in effect when the epoch started.
    pub learning_rate: f64,
}
