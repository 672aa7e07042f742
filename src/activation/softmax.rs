use ndarray::{Array2, Axis};

use crate::math::matrix::{assert_same_shape, row_max, row_sum, Matrix};

/// Row-wise softmax: every sample becomes a probability distribution.
#[derive(Debug, Clone, Default)]
pub struct Softmax {
    inputs: Matrix,
    output: Matrix,
    d_inputs: Matrix,
}

impl Softmax {
    pub fn new() -> Softmax {
        Softmax::default()
    }

    /// Subtracts each row's maximum before exponentiating so large logits
    /// cannot overflow.
    pub fn forward(&mut self, inputs: &Matrix) -> Matrix {
        self.inputs = inputs.clone();
        let exp = (inputs - &row_max(inputs)).mapv(f64::exp);
        self.output = &exp / &row_sum(&exp);
        self.output.clone()
    }

    /// Output of the last forward call.
    pub fn output(&self) -> &Matrix {
        &self.output
    }

    /// Full Jacobian backward, one sample at a time:
    /// `d_inputs[i] = (diag(s) - s sᵀ) · d_values[i]`.
    ///
    /// Training goes through `SoftmaxCrossEntropy` instead; this path is for
    /// pairing softmax with some other loss.
    pub fn backward(&mut self, d_values: &Matrix) -> &Matrix {
        assert_same_shape("softmax backward", &self.output, d_values);

        let mut d_inputs = Matrix::zeros(d_values.raw_dim());
        for (i, (s, d)) in self
            .output
            .rows()
            .into_iter()
            .zip(d_values.rows())
            .enumerate()
        {
            let column = s.insert_axis(Axis(1));
            let jacobian = Array2::from_diag(&s) - column.dot(&column.t());
            d_inputs.row_mut(i).assign(&jacobian.dot(&d));
        }
        self.d_inputs = d_inputs;
        &self.d_inputs
    }

    pub fn d_inputs(&self) -> &Matrix {
        &self.d_inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn rows_are_distributions() {
        let mut softmax = Softmax::new();
        let out = softmax.forward(&array![[1.0, 2.0, 3.0], [-5.0, 0.0, 5.0], [0.0, 0.0, 0.0]]);
        for row in out.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
            assert!(row.iter().all(|&p| p >= 0.0));
        }
        assert_abs_diff_eq!(out[[2, 0]], 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn huge_logits_do_not_overflow() {
        let mut softmax = Softmax::new();
        let out = softmax.forward(&array![[1000.0, 1000.0, -1000.0]]);
        assert!(out.iter().all(|p| p.is_finite()));
        assert_abs_diff_eq!(out[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(out[[0, 2]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn shift_invariant() {
        let mut softmax = Softmax::new();
        let a = softmax.forward(&array![[0.1, 0.7, -0.3]]);
        let b = softmax.forward(&array![[10.1, 10.7, 9.7]]);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn jacobian_backward_of_uniform_gradient_is_zero() {
        // Rows of the Jacobian sum to zero, so a constant upstream gradient
        // produces no input gradient.
        let mut softmax = Softmax::new();
        softmax.forward(&array![[0.3, -1.2, 2.0]]);
        let d = softmax.backward(&array![[1.0, 1.0, 1.0]]);
        for &x in d.iter() {
            assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        }
    }
}
