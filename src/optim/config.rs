use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::layers::dense::LayerShape;
use crate::optim::{AdaGrad, Adam, Optimizer, RmsProp, Sgd, SgdDecay, SgdMomentum};

fn one() -> f64 {
    1.0
}

fn milli() -> f64 {
    1e-3
}

fn epsilon() -> f64 {
    1e-7
}

fn rho() -> f64 {
    0.9
}

fn beta1() -> f64 {
    0.9
}

fn beta2() -> f64 {
    0.999
}

/// Selects one optimizer and its hyperparameters.
///
/// Serialized with a `"type"` tag; omitted fields take the defaults below.
///
/// ```json
/// { "type": "adam", "learning_rate": 0.05, "decay_rate": 1e-6 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Sgd {
        #[serde(default = "one")]
        learning_rate: f64,
    },
    SgdDecay {
        #[serde(default = "one")]
        learning_rate: f64,
        #[serde(default)]
        decay_rate: f64,
    },
    SgdMomentum {
        #[serde(default = "one")]
        learning_rate: f64,
        #[serde(default)]
        decay_rate: f64,
        #[serde(default)]
        momentum: f64,
    },
    #[serde(rename = "adagrad")]
    AdaGrad {
        #[serde(default = "one")]
        learning_rate: f64,
        #[serde(default)]
        decay_rate: f64,
        #[serde(default = "epsilon")]
        epsilon: f64,
    },
    #[serde(rename = "rmsprop")]
    RmsProp {
        #[serde(default = "milli")]
        learning_rate: f64,
        #[serde(default)]
        decay_rate: f64,
        #[serde(default = "epsilon")]
        epsilon: f64,
        #[serde(default = "rho")]
        rho: f64,
    },
    Adam {
        #[serde(default = "milli")]
        learning_rate: f64,
        #[serde(default)]
        decay_rate: f64,
        #[serde(default = "epsilon")]
        epsilon: f64,
        #[serde(default = "beta1")]
        beta1: f64,
        #[serde(default = "beta2")]
        beta2: f64,
    },
}

impl OptimizerConfig {
    pub fn sgd() -> Self {
        OptimizerConfig::Sgd { learning_rate: one() }
    }

    pub fn sgd_decay() -> Self {
        OptimizerConfig::SgdDecay {
            learning_rate: one(),
            decay_rate: 0.0,
        }
    }

    pub fn sgd_momentum() -> Self {
        OptimizerConfig::SgdMomentum {
            learning_rate: one(),
            decay_rate: 0.0,
            momentum: 0.0,
        }
    }

    pub fn adagrad() -> Self {
        OptimizerConfig::AdaGrad {
            learning_rate: one(),
            decay_rate: 0.0,
            epsilon: epsilon(),
        }
    }

    pub fn rmsprop() -> Self {
        OptimizerConfig::RmsProp {
            learning_rate: milli(),
            decay_rate: 0.0,
            epsilon: epsilon(),
            rho: rho(),
        }
    }

    pub fn adam() -> Self {
        OptimizerConfig::Adam {
            learning_rate: milli(),
            decay_rate: 0.0,
            epsilon: epsilon(),
            beta1: beta1(),
            beta2: beta2(),
        }
    }

    /// Tag used in JSON and log output.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerConfig::Sgd { .. } => "sgd",
            OptimizerConfig::SgdDecay { .. } => "sgd_decay",
            OptimizerConfig::SgdMomentum { .. } => "sgd_momentum",
            OptimizerConfig::AdaGrad { .. } => "adagrad",
            OptimizerConfig::RmsProp { .. } => "rmsprop",
            OptimizerConfig::Adam { .. } => "adam",
        }
    }

    /// Checks hyperparameter ranges.
    pub fn validate(&self) -> Result<()> {
        let (learning_rate, decay_rate) = match *self {
            OptimizerConfig::Sgd { learning_rate } => (learning_rate, 0.0),
            OptimizerConfig::SgdDecay { learning_rate, decay_rate }
            | OptimizerConfig::SgdMomentum { learning_rate, decay_rate, .. }
            | OptimizerConfig::AdaGrad { learning_rate, decay_rate, .. }
            | OptimizerConfig::RmsProp { learning_rate, decay_rate, .. }
            | OptimizerConfig::Adam { learning_rate, decay_rate, .. } => (learning_rate, decay_rate),
        };
        positive("learning_rate", learning_rate)?;
        if !(decay_rate >= 0.0 && decay_rate.is_finite()) {
            return Err(invalid("decay_rate", decay_rate, "must be finite and >= 0"));
        }

        match *self {
            OptimizerConfig::SgdMomentum { momentum, .. } => unit_interval("momentum", momentum),
            OptimizerConfig::AdaGrad { epsilon, .. } => positive("epsilon", epsilon),
            OptimizerConfig::RmsProp { epsilon, rho, .. } => {
                positive("epsilon", epsilon)?;
                unit_interval("rho", rho)
            }
            OptimizerConfig::Adam {
                epsilon,
                beta1,
                beta2,
                ..
            } => {
                positive("epsilon", epsilon)?;
                unit_interval("beta1", beta1)?;
                unit_interval("beta2", beta2)
            }
            OptimizerConfig::Sgd { .. } | OptimizerConfig::SgdDecay { .. } => Ok(()),
        }
    }

    /// Builds the optimizer with zeroed state for every layer in `shapes`.
    pub fn build(&self, shapes: &[LayerShape]) -> Box<dyn Optimizer> {
        match *self {
            OptimizerConfig::Sgd { learning_rate } => Box::new(Sgd::new(learning_rate)),
            OptimizerConfig::SgdDecay {
                learning_rate,
                decay_rate,
            } => Box::new(SgdDecay::new(learning_rate, decay_rate)),
            OptimizerConfig::SgdMomentum {
                learning_rate,
                decay_rate,
                momentum,
            } => Box::new(SgdMomentum::new(learning_rate, decay_rate, momentum, shapes)),
            OptimizerConfig::AdaGrad {
                learning_rate,
                decay_rate,
                epsilon,
            } => Box::new(AdaGrad::new(learning_rate, decay_rate, epsilon, shapes)),
            OptimizerConfig::RmsProp {
                learning_rate,
                decay_rate,
                epsilon,
                rho,
            } => Box::new(RmsProp::new(learning_rate, decay_rate, epsilon, rho, shapes)),
            OptimizerConfig::Adam {
                learning_rate,
                decay_rate,
                epsilon,
                beta1,
                beta2,
            } => Box::new(Adam::new(learning_rate, decay_rate, epsilon, beta1, beta2, shapes)),
        }
    }
}

fn invalid(field: &str, value: f64, rule: &str) -> NnError {
    NnError::InvalidConfig(format!("optimizer {} = {} {}", field, value, rule))
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite and > 0"))
    }
}

/// `[0, 1)`
fn unit_interval(field: &str, value: f64) -> Result<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, value, "must lie in [0, 1)"))
    }
}
