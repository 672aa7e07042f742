use ndarray::Zip;

use crate::layers::dense::{Dense, LayerShape, ParamsMut};
use crate::math::matrix::Matrix;
use crate::optim::schedule::LearningRate;
use crate::optim::state::{slot_mut, ParamState};
use crate::optim::Optimizer;

/// AdaGrad: each parameter's step shrinks with its accumulated squared
/// gradient.
///
/// `cache += dw²; w -= lr * dw / (sqrt(cache) + ε)`
#[derive(Debug, Clone)]
pub struct AdaGrad {
    lr: LearningRate,
    epsilon: f64,
    caches: Vec<ParamState>,
}

impl AdaGrad {
    pub fn new(learning_rate: f64, decay_rate: f64, epsilon: f64, shapes: &[LayerShape]) -> AdaGrad {
        AdaGrad {
            lr: LearningRate::new(learning_rate, decay_rate),
            epsilon,
            caches: ParamState::for_layers(shapes),
        }
    }

    pub fn caches(&self) -> &[ParamState] {
        &self.caches
    }
}

impl Optimizer for AdaGrad {
    fn name(&self) -> &'static str {
        "adagrad"
    }

    fn schedule(&self) -> &LearningRate {
        &self.lr
    }

    fn schedule_mut(&mut self) -> &mut LearningRate {
        &mut self.lr
    }

    fn update_params(&mut self, slot: usize, layer: &mut Dense) {
        let lr = self.lr.current();
        let epsilon = self.epsilon;
        let cache = slot_mut(&mut self.caches, slot, layer);
        let ParamsMut {
            weights,
            biases,
            d_weights,
            d_biases,
        } = layer.parameters_mut();

        apply(weights, &mut cache.weights, d_weights, lr, epsilon);
        apply(biases, &mut cache.biases, d_biases, lr, epsilon);
    }
}

fn apply(param: &mut Matrix, cache: &mut Matrix, grad: &Matrix, lr: f64, epsilon: f64) {
    Zip::from(param)
        .and(cache)
        .and(grad)
        .for_each(|p, c, &g| {
            *c += g * g;
            *p -= lr * g / (c.sqrt() + epsilon);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn cache_sums_squared_gradients() {
        let mut layer = Dense::from_parameters(array![[0.0]], array![[0.0]]);
        layer.forward(&array![[2.0]]);
        layer.backward(&array![[1.0]]);

        let mut opt = AdaGrad::new(1.0, 0.0, 1e-7, &[layer.shape()]);
        opt.update_params(0, &mut layer);
        opt.update_params(0, &mut layer);

        assert_relative_eq!(opt.caches()[0].weights[[0, 0]], 8.0);
        assert_relative_eq!(opt.caches()[0].biases[[0, 0]], 2.0);
        // First step moves by ~1, second by 2 / sqrt(8).
        let expected = -(2.0 / (2.0 + 1e-7)) - 2.0 / (8.0f64.sqrt() + 1e-7);
        assert_relative_eq!(layer.weights()[[0, 0]], expected, max_relative = 1e-12);
    }
}
