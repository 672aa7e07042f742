use crate::activation::softmax::Softmax;
use crate::data::labels::Labels;
use crate::loss::cross_entropy::CategoricalCrossEntropy;
use crate::loss::Loss;
use crate::math::matrix::Matrix;

/// Softmax output activation fused with categorical cross-entropy.
///
/// The joint gradient w.r.t. the logits collapses to
/// `(softmax(z) - y_true) / N`, which avoids building a Jacobian per sample.
#[derive(Debug, Clone, Default)]
pub struct SoftmaxCrossEntropy {
    activation: Softmax,
    loss: CategoricalCrossEntropy,
    d_inputs: Matrix,
}

impl SoftmaxCrossEntropy {
    pub fn new() -> SoftmaxCrossEntropy {
        SoftmaxCrossEntropy::default()
    }

    /// Runs softmax on the logits and returns the mean loss.
    pub fn forward(&mut self, inputs: &Matrix, labels: &Labels) -> f64 {
        self.activation.forward(inputs);
        self.loss.calculate(self.activation.output(), labels)
    }

    /// Softmax probabilities only, for inference.
    pub fn predict(&mut self, inputs: &Matrix) -> Matrix {
        self.activation.forward(inputs)
    }

    /// Softmax probabilities from the last forward call.
    pub fn output(&self) -> &Matrix {
        self.activation.output()
    }

    /// `d_values` is normally the unit's own `output()`.
    pub fn backward(&mut self, d_values: &Matrix, labels: &Labels) -> &Matrix {
        assert_eq!(
            labels.len(),
            d_values.nrows(),
            "softmax cross-entropy backward: {} labels for {} samples",
            labels.len(),
            d_values.nrows()
        );
        let samples = d_values.nrows() as f64;
        let classes = labels.to_sparse();

        let mut d_inputs = d_values.clone();
        for (row, &class) in classes.iter().enumerate() {
            d_inputs[[row, class]] -= 1.0;
        }
        self.d_inputs = d_inputs / samples;
        &self.d_inputs
    }

    pub fn d_inputs(&self) -> &Matrix {
        &self.d_inputs
    }
}
