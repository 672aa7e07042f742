use ndarray::{Array1, Axis};

use crate::data::labels::Labels;
use crate::loss::Loss;
use crate::math::matrix::{assert_same_shape, clip, Matrix};

/// Predictions are clipped into `[CLIP, 1 - CLIP]` before taking the log.
const CLIP: f64 = 1e-7;

/// Categorical cross-entropy over softmax probabilities.
#[derive(Debug, Clone, Default)]
pub struct CategoricalCrossEntropy {
    d_inputs: Matrix,
}

impl CategoricalCrossEntropy {
    pub fn new() -> CategoricalCrossEntropy {
        CategoricalCrossEntropy::default()
    }

    /// Gradient of the mean loss w.r.t. the predictions:
    /// `-y_true / d_values`, divided by the sample count.
    pub fn backward(&mut self, d_values: &Matrix, labels: &Labels) -> &Matrix {
        assert_eq!(
            labels.len(),
            d_values.nrows(),
            "cross-entropy backward: {} labels for {} samples",
            labels.len(),
            d_values.nrows()
        );
        let samples = d_values.nrows() as f64;
        let y_true = labels.to_one_hot(d_values.ncols());
        assert_same_shape("cross-entropy backward", &y_true, d_values);

        self.d_inputs = -(&y_true / d_values) / samples;
        &self.d_inputs
    }

    pub fn d_inputs(&self) -> &Matrix {
        &self.d_inputs
    }
}

impl Loss for CategoricalCrossEntropy {
    fn forward(&self, predictions: &Matrix, labels: &Labels) -> Array1<f64> {
        assert_eq!(
            labels.len(),
            predictions.nrows(),
            "cross-entropy forward: {} labels for {} samples",
            labels.len(),
            predictions.nrows()
        );
        let clipped = clip(predictions, CLIP, 1.0 - CLIP);

        let confidences = match labels {
            Labels::Sparse(indices) => indices
                .iter()
                .enumerate()
                .map(|(row, &class)| clipped[[row, class]])
                .collect::<Array1<f64>>(),
            Labels::OneHot(rows) => {
                assert_same_shape("cross-entropy forward", &clipped, rows);
                (&clipped * rows).sum_axis(Axis(1))
            }
        };

        confidences.mapv(|c| -c.ln())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn loss_of_known_confidences() {
        let predictions = array![[0.7, 0.1, 0.2], [0.1, 0.5, 0.4], [0.02, 0.9, 0.08]];
        let labels = Labels::Sparse(vec![0, 1, 1]);
        let per_sample = CategoricalCrossEntropy::new().forward(&predictions, &labels);

        assert_abs_diff_eq!(per_sample[0], -(0.7f64).ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(per_sample[1], -(0.5f64).ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(per_sample[2], -(0.9f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn zero_and_one_probabilities_stay_finite() {
        let predictions = array![[1.0, 0.0], [0.0, 1.0]];
        let labels = Labels::Sparse(vec![1, 1]);
        let loss = CategoricalCrossEntropy::new().calculate(&predictions, &labels);
        assert!(loss.is_finite());
        assert_abs_diff_eq!(loss, (-(CLIP.ln()) + -((1.0 - CLIP).ln())) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn backward_is_normalised_by_batch_size() {
        let predictions = array![[0.5, 0.5], [0.25, 0.75]];
        let mut loss = CategoricalCrossEntropy::new();
        let d = loss.backward(&predictions, &Labels::Sparse(vec![0, 1]));
        assert_abs_diff_eq!(d[[0, 0]], -1.0 / 0.5 / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d[[0, 1]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d[[1, 1]], -1.0 / 0.75 / 2.0, epsilon = 1e-12);
    }
}
