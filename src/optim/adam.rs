use ndarray::Zip;

use crate::layers::dense::{Dense, LayerShape, ParamsMut};
use crate::math::matrix::Matrix;
use crate::optim::schedule::LearningRate;
use crate::optim::state::{slot_mut, ParamState};
use crate::optim::Optimizer;

/// Adam: momentum plus an RMSProp-style cache, both bias-corrected.
///
/// ```text
/// m     = β1 * m + (1 - β1) * dw
/// cache = β2 * cache + (1 - β2) * dw²
/// m̂     = m / (1 - β1^(step + 1))
/// ĉ     = cache / (1 - β2^(step + 1))
/// w    -= lr * m̂ / (sqrt(ĉ) + ε)
/// ```
///
/// The correction exponent is `step + 1` so the first epoch counts as step 1.
#[derive(Debug, Clone)]
pub struct Adam {
    lr: LearningRate,
    epsilon: f64,
    beta1: f64,
    beta2: f64,
    momentums: Vec<ParamState>,
    caches: Vec<ParamState>,
}

/// Per-update constants shared by the weight and bias passes.
#[derive(Clone, Copy)]
struct Moments {
    lr: f64,
    epsilon: f64,
    beta1: f64,
    beta2: f64,
    correction1: f64,
    correction2: f64,
}

impl Adam {
    pub fn new(
        learning_rate: f64,
        decay_rate: f64,
        epsilon: f64,
        beta1: f64,
        beta2: f64,
        shapes: &[LayerShape],
    ) -> Adam {
        Adam {
            lr: LearningRate::new(learning_rate, decay_rate),
            epsilon,
            beta1,
            beta2,
            momentums: ParamState::for_layers(shapes),
            caches: ParamState::for_layers(shapes),
        }
    }

    pub fn momentums(&self) -> &[ParamState] {
        &self.momentums
    }

    pub fn caches(&self) -> &[ParamState] {
        &self.caches
    }
}

impl Optimizer for Adam {
    fn name(&self) -> &'static str {
        "adam"
    }

    fn schedule(&self) -> &LearningRate {
        &self.lr
    }

    fn schedule_mut(&mut self) -> &mut LearningRate {
        &mut self.lr
    }

    fn update_params(&mut self, slot: usize, layer: &mut Dense) {
        let t = (self.lr.step() + 1) as i32;
        let moments = Moments {
            lr: self.lr.current(),
            epsilon: self.epsilon,
            beta1: self.beta1,
            beta2: self.beta2,
            correction1: 1.0 - self.beta1.powi(t),
            correction2: 1.0 - self.beta2.powi(t),
        };
        let momentum = slot_mut(&mut self.momentums, slot, layer);
        let cache = slot_mut(&mut self.caches, slot, layer);
        let ParamsMut {
            weights,
            biases,
            d_weights,
            d_biases,
        } = layer.parameters_mut();

        apply(weights, &mut momentum.weights, &mut cache.weights, d_weights, moments);
        apply(biases, &mut momentum.biases, &mut cache.biases, d_biases, moments);
    }
}

fn apply(param: &mut Matrix, momentum: &mut Matrix, cache: &mut Matrix, grad: &Matrix, k: Moments) {
    Zip::from(param)
        .and(momentum)
        .and(cache)
        .and(grad)
        .for_each(|p, m, c, &g| {
            *m = k.beta1 * *m + (1.0 - k.beta1) * g;
            *c = k.beta2 * *c + (1.0 - k.beta2) * g * g;
            let m_hat = *m / k.correction1;
            let c_hat = *c / k.correction2;
            *p -= k.lr * m_hat / (c_hat.sqrt() + k.epsilon);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn first_step_moves_by_learning_rate() {
        // After bias correction m̂ = g and ĉ = g², so the step is lr * sign(g).
        let mut layer = Dense::from_parameters(array![[0.0, 0.0]], array![[0.0, 0.0]]);
        layer.forward(&array![[1.0]]);
        layer.backward(&array![[3.0, -0.5]]);

        let mut opt = Adam::new(0.05, 0.0, 1e-7, 0.9, 0.999, &[layer.shape()]);
        opt.update_params(0, &mut layer);

        assert_relative_eq!(layer.weights()[[0, 0]], -0.05, max_relative = 1e-6);
        assert_relative_eq!(layer.weights()[[0, 1]], 0.05, max_relative = 1e-6);
        assert_relative_eq!(layer.biases()[[0, 0]], -0.05, max_relative = 1e-6);
    }

    #[test]
    fn momentum_uses_previous_momentum_not_cache() {
        let mut layer = Dense::from_parameters(array![[0.0]], array![[0.0]]);
        layer.forward(&array![[1.0]]);
        layer.backward(&array![[2.0]]);

        let mut opt = Adam::new(0.001, 0.0, 1e-7, 0.9, 0.999, &[layer.shape()]);
        opt.update_params(0, &mut layer);
        opt.advance_step();
        opt.update_params(0, &mut layer);

        // m: 0.2 then 0.9 * 0.2 + 0.1 * 2 = 0.38
        assert_relative_eq!(opt.momentums()[0].weights[[0, 0]], 0.38, max_relative = 1e-12);
        // cache: 0.004 then 0.999 * 0.004 + 0.001 * 4 = 0.007996
        assert_relative_eq!(opt.caches()[0].weights[[0, 0]], 0.007996, max_relative = 1e-12);
    }
}
