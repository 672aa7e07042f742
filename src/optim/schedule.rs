use serde::{Deserialize, Serialize};

/// Learning rate with `1/t` decay and the shared step counter.
///
/// `current = base / (1 + decay_rate * step)` once per epoch; with a zero
/// decay rate the current rate stays at the base rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningRate {
    base: f64,
    current: f64,
    decay_rate: f64,
    step: usize,
}

impl LearningRate {
    pub fn new(base: f64, decay_rate: f64) -> LearningRate {
        LearningRate {
            base,
            current: base,
            decay_rate,
            step: 0,
        }
    }

    pub fn constant(base: f64) -> LearningRate {
        LearningRate::new(base, 0.0)
    }

    /// Recomputes the current rate from the step counter.
    pub fn update(&mut self) {
        if self.decay_rate != 0.0 {
            self.current = self.base / (1.0 + self.decay_rate * self.step as f64);
        }
    }

    pub fn advance(&mut self) {
        self.step += 1;
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn step(&self) -> usize {
        self.step
    }
}
