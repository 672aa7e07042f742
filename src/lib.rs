pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::{ReLU, Softmax};
pub use data::{spiral_data, Labels};
pub use error::{NnError, Result};
pub use layers::{Dense, LayerShape};
pub use loss::{CategoricalCrossEntropy, Loss, SoftmaxCrossEntropy};
pub use math::Matrix;
pub use network::{Network, NetworkSpec};
pub use optim::{AdaGrad, Adam, Optimizer, OptimizerConfig, RmsProp, Sgd, SgdDecay, SgdMomentum};
pub use train::{EpochStats, TrainConfig, TrainingContext};
