use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::matrix::{assert_same_shape, column_sum, gaussian, Matrix};

/// Scale of the Gaussian weight initialisation.
const WEIGHT_SCALE: f64 = 0.01;

/// Input/output widths of a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerShape {
    pub inputs: usize,
    pub neurons: usize,
}

/// Mutable view of a layer's parameters next to its latest gradients.
///
/// Optimizers receive this so they can write weights while reading gradients
/// of the same layer.
pub struct ParamsMut<'a> {
    pub weights: &'a mut Matrix,
    pub biases: &'a mut Matrix,
    pub d_weights: &'a Matrix,
    pub d_biases: &'a Matrix,
}

/// Fully connected layer: `output = inputs · weights + biases`.
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Matrix,  // (inputs, neurons)
    biases: Matrix,   // (1, neurons)
    inputs: Matrix,   // last forward input, needed by backward
    d_weights: Matrix,
    d_biases: Matrix,
    d_inputs: Matrix,
}

impl Dense {
    /// Weights ~ 0.01·N(0, 1), biases zero.
    pub fn new<R: Rng>(inputs: usize, neurons: usize, rng: &mut R) -> Dense {
        Dense::from_parameters(
            gaussian(inputs, neurons, WEIGHT_SCALE, rng),
            Matrix::zeros((1, neurons)),
        )
    }

    /// Builds a layer from explicit parameters.
    ///
    /// # Panics
    /// Panics if `biases` is not a (1, neurons) row matching `weights`.
    pub fn from_parameters(weights: Matrix, biases: Matrix) -> Dense {
        let (inputs, neurons) = weights.dim();
        assert_eq!(
            biases.dim(),
            (1, neurons),
            "bias row must be (1, {}), got {:?}",
            neurons,
            biases.dim()
        );
        Dense {
            d_weights: Matrix::zeros((inputs, neurons)),
            d_biases: Matrix::zeros((1, neurons)),
            d_inputs: Matrix::zeros((0, inputs)),
            inputs: Matrix::zeros((0, inputs)),
            weights,
            biases,
        }
    }

    pub fn shape(&self) -> LayerShape {
        LayerShape {
            inputs: self.weights.nrows(),
            neurons: self.weights.ncols(),
        }
    }

    /// Weights plus biases.
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Linear transform of an (N, inputs) batch; the bias row is broadcast
    /// over all N rows. The input is kept for `backward`.
    pub fn forward(&mut self, inputs: &Matrix) -> Matrix {
        assert_eq!(
            inputs.ncols(),
            self.weights.nrows(),
            "dense forward: expected {} input features, got {}",
            self.weights.nrows(),
            inputs.ncols()
        );
        self.inputs = inputs.clone();
        inputs.dot(&self.weights) + &self.biases
    }

    /// Gradients of the parameters and of the layer input, given the gradient
    /// of the layer output. Returns `d_inputs`.
    pub fn backward(&mut self, d_output: &Matrix) -> &Matrix {
        let expected = Matrix::zeros((self.inputs.nrows(), self.weights.ncols()));
        assert_same_shape("dense backward", &expected, d_output);

        self.d_weights = self.inputs.t().dot(d_output);
        self.d_biases = column_sum(d_output);
        self.d_inputs = d_output.dot(&self.weights.t());
        &self.d_inputs
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn d_weights(&self) -> &Matrix {
        &self.d_weights
    }

    pub fn d_biases(&self) -> &Matrix {
        &self.d_biases
    }

    pub fn d_inputs(&self) -> &Matrix {
        &self.d_inputs
    }

    pub fn parameters_mut(&mut self) -> ParamsMut<'_> {
        ParamsMut {
            weights: &mut self.weights,
            biases: &mut self.biases,
            d_weights: &self.d_weights,
            d_biases: &self.d_biases,
        }
    }
}
