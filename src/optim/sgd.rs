use crate::layers::dense::{Dense, ParamsMut};
use crate::optim::schedule::LearningRate;
use crate::optim::Optimizer;

/// Vanilla gradient descent with a fixed learning rate.
#[derive(Debug, Clone)]
pub struct Sgd {
    lr: LearningRate,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd {
            lr: LearningRate::constant(learning_rate),
        }
    }
}

impl Optimizer for Sgd {
    fn name(&self) -> &'static str {
        "sgd"
    }

    fn schedule(&self) -> &LearningRate {
        &self.lr
    }

    fn schedule_mut(&mut self) -> &mut LearningRate {
        &mut self.lr
    }

    /// Plain SGD never decays.
    fn update_learning_rate(&mut self) {}

    fn update_params(&mut self, _slot: usize, layer: &mut Dense) {
        descend(layer, self.lr.current());
    }
}

/// Gradient descent with `1/t` learning-rate decay.
#[derive(Debug, Clone)]
pub struct SgdDecay {
    lr: LearningRate,
}

impl SgdDecay {
    pub fn new(learning_rate: f64, decay_rate: f64) -> SgdDecay {
        SgdDecay {
            lr: LearningRate::new(learning_rate, decay_rate),
        }
    }
}

impl Optimizer for SgdDecay {
    fn name(&self) -> &'static str {
        "sgd_decay"
    }

    fn schedule(&self) -> &LearningRate {
        &self.lr
    }

    fn schedule_mut(&mut self) -> &mut LearningRate {
        &mut self.lr
    }

    fn update_params(&mut self, _slot: usize, layer: &mut Dense) {
        descend(layer, self.lr.current());
    }
}

/// `w -= lr * dw`, `b -= lr * db`.
fn descend(layer: &mut Dense, lr: f64) {
    let ParamsMut {
        weights,
        biases,
        d_weights,
        d_biases,
    } = layer.parameters_mut();
    weights.scaled_add(-lr, d_weights);
    biases.scaled_add(-lr, d_biases);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;
    use ndarray::array;

    fn layer_with_gradients() -> Dense {
        let mut layer = Dense::from_parameters(array![[1.0, 2.0]], array![[0.5, -0.5]]);
        layer.forward(&array![[1.0], [3.0]]);
        layer.backward(&array![[1.0, 0.0], [0.0, 1.0]]);
        layer
    }

    #[test]
    fn sgd_steps_against_gradient() {
        let mut layer = layer_with_gradients();
        // d_weights = [[1, 3]], d_biases = [[1, 1]]
        let mut sgd = Sgd::new(0.1);
        sgd.update_params(0, &mut layer);
        let expected_w: Matrix = array![[0.9, 1.7]];
        for (a, b) in layer.weights().iter().zip(expected_w.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert!((layer.biases()[[0, 0]] - 0.4).abs() < 1e-12);
        assert!((layer.biases()[[0, 1]] + 0.6).abs() < 1e-12);
    }

    #[test]
    fn plain_sgd_ignores_decay_calls() {
        let mut sgd = Sgd::new(1.0);
        for _ in 0..10 {
            sgd.update_learning_rate();
            sgd.advance_step();
        }
        assert_eq!(sgd.current_learning_rate(), 1.0);
        assert_eq!(sgd.step(), 10);
    }

    #[test]
    fn decayed_rate_strictly_falls() {
        let mut opt = SgdDecay::new(1.0, 0.01);
        let mut previous = f64::INFINITY;
        for step in 0..20 {
            opt.update_learning_rate();
            let current = opt.current_learning_rate();
            if step > 0 {
                assert!(current < previous);
            }
            previous = current;
            opt.advance_step();
        }
    }
}
