use ndarray::Zip;

use crate::math::matrix::{assert_same_shape, Matrix};

/// Rectified linear unit, `max(0, x)` element-wise.
#[derive(Debug, Clone, Default)]
pub struct ReLU {
    inputs: Matrix,
    d_inputs: Matrix,
}

impl ReLU {
    pub fn new() -> ReLU {
        ReLU::default()
    }

    pub fn forward(&mut self, inputs: &Matrix) -> Matrix {
        self.inputs = inputs.clone();
        inputs.mapv(|x| x.max(0.0))
    }

    /// Passes the gradient through where the forward input was positive and
    /// zeroes it elsewhere. The caller's buffer is left untouched.
    pub fn backward(&mut self, d_output: &Matrix) -> &Matrix {
        assert_same_shape("relu backward", &self.inputs, d_output);

        let mut d_inputs = d_output.clone();
        Zip::from(&mut d_inputs)
            .and(&self.inputs)
            .for_each(|d, &x| {
                if x <= 0.0 {
                    *d = 0.0;
                }
            });
        self.d_inputs = d_inputs;
        &self.d_inputs
    }

    pub fn d_inputs(&self) -> &Matrix {
        &self.d_inputs
    }
}
