use ndarray::Zip;

use crate::layers::dense::{Dense, LayerShape, ParamsMut};
use crate::math::matrix::Matrix;
use crate::optim::schedule::LearningRate;
use crate::optim::state::{slot_mut, ParamState};
use crate::optim::Optimizer;

/// RMSProp: AdaGrad with an exponentially decaying cache.
///
/// `cache = ρ * cache + (1 - ρ) * dw²; w -= lr * dw / (sqrt(cache) + ε)`
#[derive(Debug, Clone)]
pub struct RmsProp {
    lr: LearningRate,
    epsilon: f64,
    rho: f64,
    caches: Vec<ParamState>,
}

impl RmsProp {
    pub fn new(
        learning_rate: f64,
        decay_rate: f64,
        epsilon: f64,
        rho: f64,
        shapes: &[LayerShape],
    ) -> RmsProp {
        RmsProp {
            lr: LearningRate::new(learning_rate, decay_rate),
            epsilon,
            rho,
            caches: ParamState::for_layers(shapes),
        }
    }

    pub fn caches(&self) -> &[ParamState] {
        &self.caches
    }
}

impl Optimizer for RmsProp {
    fn name(&self) -> &'static str {
        "rmsprop"
    }

    fn schedule(&self) -> &LearningRate {
        &self.lr
    }

    fn schedule_mut(&mut self) -> &mut LearningRate {
        &mut self.lr
    }

    fn update_params(&mut self, slot: usize, layer: &mut Dense) {
        let (lr, epsilon, rho) = (self.lr.current(), self.epsilon, self.rho);
        let cache = slot_mut(&mut self.caches, slot, layer);
        let ParamsMut {
            weights,
            biases,
            d_weights,
            d_biases,
        } = layer.parameters_mut();

        apply(weights, &mut cache.weights, d_weights, lr, epsilon, rho);
        apply(biases, &mut cache.biases, d_biases, lr, epsilon, rho);
    }
}

fn apply(param: &mut Matrix, cache: &mut Matrix, grad: &Matrix, lr: f64, epsilon: f64, rho: f64) {
    Zip::from(param)
        .and(cache)
        .and(grad)
        .for_each(|p, c, &g| {
            *c = rho * *c + (1.0 - rho) * g * g;
            *p -= lr * g / (c.sqrt() + epsilon);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn cache_is_exponential_average() {
        let mut layer = Dense::from_parameters(array![[0.0]], array![[0.0]]);
        layer.forward(&array![[1.0]]);
        layer.backward(&array![[2.0]]);

        let mut opt = RmsProp::new(0.01, 0.0, 1e-7, 0.9, &[layer.shape()]);
        opt.update_params(0, &mut layer);
        assert_relative_eq!(opt.caches()[0].weights[[0, 0]], 0.4, max_relative = 1e-12);
        opt.update_params(0, &mut layer);
        assert_relative_eq!(opt.caches()[0].weights[[0, 0]], 0.76, max_relative = 1e-12);
    }
}
