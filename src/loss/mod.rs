pub mod cross_entropy;
pub mod softmax_cross_entropy;

use ndarray::Array1;

use crate::data::labels::Labels;
use crate::math::matrix::Matrix;

pub use cross_entropy::CategoricalCrossEntropy;
pub use softmax_cross_entropy::SoftmaxCrossEntropy;

/// A per-sample loss over a batch of predictions.
pub trait Loss {
    /// Loss of every sample, in row order.
    fn forward(&self, predictions: &Matrix, labels: &Labels) -> Array1<f64>;

    /// Mean loss over the batch; this is the value reported during training.
    fn calculate(&self, predictions: &Matrix, labels: &Labels) -> f64 {
        self.forward(predictions, labels).mean().unwrap_or(0.0)
    }
}
