//! Parameter update strategies.
//!
//! Every optimizer follows the same per-epoch protocol:
//!
//! 1. `update_learning_rate()` once, before any layer is touched;
//! 2. `update_params(slot, layer)` for each dense layer, where `slot` is the
//!    layer's position in the network;
//! 3. `advance_step()` once, after the last layer.
//!
//! Per-layer buffers (momentum, adaptive caches) are allocated when the
//! optimizer is built from the network's layer shapes and live in the
//! optimizer, so layers stay optimizer-agnostic.

pub mod adagrad;
pub mod adam;
pub mod config;
pub mod momentum;
pub mod rmsprop;
pub mod schedule;
pub mod sgd;
pub mod state;

pub use adagrad::AdaGrad;
pub use adam::Adam;
pub use config::OptimizerConfig;
pub use momentum::SgdMomentum;
pub use rmsprop::RmsProp;
pub use schedule::LearningRate;
pub use sgd::{Sgd, SgdDecay};
pub use state::ParamState;

use crate::layers::dense::Dense;

pub trait Optimizer {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn schedule(&self) -> &LearningRate;

    fn schedule_mut(&mut self) -> &mut LearningRate;

    /// Applies learning-rate decay for the current step. A no-op when no
    /// decay rate is configured.
    fn update_learning_rate(&mut self) {
        self.schedule_mut().update();
    }

    /// Updates `layer`'s weights and biases in place from its latest
    /// gradients, using the state held for `slot`.
    ///
    /// # Panics
    /// Stateful optimizers panic if `slot` is unknown or the layer's shape
    /// differs from the one the optimizer was built with.
    fn update_params(&mut self, slot: usize, layer: &mut Dense);

    /// Increments the step counter. Call once per epoch.
    fn advance_step(&mut self) {
        self.schedule_mut().advance();
    }

    fn current_learning_rate(&self) -> f64 {
        self.schedule().current()
    }

    fn step(&self) -> usize {
        self.schedule().step()
    }
}
