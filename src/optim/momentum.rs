use ndarray::Zip;

use crate::layers::dense::{Dense, LayerShape, ParamsMut};
use crate::math::matrix::Matrix;
use crate::optim::schedule::LearningRate;
use crate::optim::state::{slot_mut, ParamState};
use crate::optim::Optimizer;

/// Gradient descent with classical momentum and optional decay.
///
/// `m = momentum * m - lr * dw; w += m`
#[derive(Debug, Clone)]
pub struct SgdMomentum {
    lr: LearningRate,
    momentum: f64,
    momentums: Vec<ParamState>,
}

impl SgdMomentum {
    pub fn new(learning_rate: f64, decay_rate: f64, momentum: f64, shapes: &[LayerShape]) -> SgdMomentum {
        SgdMomentum {
            lr: LearningRate::new(learning_rate, decay_rate),
            momentum,
            momentums: ParamState::for_layers(shapes),
        }
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Velocity buffers, one per layer slot.
    pub fn momentums(&self) -> &[ParamState] {
        &self.momentums
    }
}

impl Optimizer for SgdMomentum {
    fn name(&self) -> &'static str {
        "sgd_momentum"
    }

    fn schedule(&self) -> &LearningRate {
        &self.lr
    }

    fn schedule_mut(&mut self) -> &mut LearningRate {
        &mut self.lr
    }

    fn update_params(&mut self, slot: usize, layer: &mut Dense) {
        let lr = self.lr.current();
        let momentum = self.momentum;
        let velocity = slot_mut(&mut self.momentums, slot, layer);
        let ParamsMut {
            weights,
            biases,
            d_weights,
            d_biases,
        } = layer.parameters_mut();

        apply(weights, &mut velocity.weights, d_weights, lr, momentum);
        apply(biases, &mut velocity.biases, d_biases, lr, momentum);
    }
}

fn apply(param: &mut Matrix, velocity: &mut Matrix, grad: &Matrix, lr: f64, momentum: f64) {
    Zip::from(param)
        .and(velocity)
        .and(grad)
        .for_each(|p, v, &g| {
            *v = momentum * *v - lr * g;
            *p += *v;
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn velocity_accumulates_across_steps() {
        let mut layer = Dense::from_parameters(array![[0.0]], array![[0.0]]);
        layer.forward(&array![[1.0]]);
        layer.backward(&array![[1.0]]);

        let mut opt = SgdMomentum::new(0.1, 0.0, 0.9, &[layer.shape()]);
        opt.update_params(0, &mut layer);
        assert_relative_eq!(layer.weights()[[0, 0]], -0.1);
        opt.update_params(0, &mut layer);
        // v = 0.9 * -0.1 - 0.1 = -0.19
        assert_relative_eq!(opt.momentums()[0].weights[[0, 0]], -0.19);
        assert_relative_eq!(layer.weights()[[0, 0]], -0.29);
    }

    #[test]
    fn zero_momentum_is_plain_descent() {
        let mut layer = Dense::from_parameters(array![[1.0]], array![[1.0]]);
        layer.forward(&array![[2.0]]);
        layer.backward(&array![[1.0]]);

        let mut opt = SgdMomentum::new(0.5, 0.0, 0.0, &[layer.shape()]);
        opt.update_params(0, &mut layer);
        assert_relative_eq!(layer.weights()[[0, 0]], 0.0);
        assert_relative_eq!(layer.biases()[[0, 0]], 0.5);
    }
}
