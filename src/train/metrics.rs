use crate::data::labels::Labels;
use crate::math::matrix::{argmax_rows, Matrix};

/// Fraction of rows whose arg-max column equals the true class.
pub fn accuracy(probabilities: &Matrix, labels: &Labels) -> f64 {
    assert_eq!(
        probabilities.nrows(),
        labels.len(),
        "accuracy: {} predictions for {} labels",
        probabilities.nrows(),
        labels.len()
    );
    if labels.is_empty() {
        return 0.0;
    }
    let truth = labels.to_sparse();
    let correct = argmax_rows(probabilities)
        .iter()
        .zip(truth.iter())
        .filter(|(predicted, actual)| predicted == actual)
        .count();
    correct as f64 / truth.len() as f64
}
