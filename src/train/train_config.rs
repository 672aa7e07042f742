use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::network::spec::NetworkSpec;
use crate::optim::config::OptimizerConfig;

/// Size of the generated spiral dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub points_per_class: usize,
    pub classes: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            points_per_class: 100,
            classes: 3,
        }
    }
}

/// Everything needed to reproduce a training run.
///
/// # Fields
/// - `epochs`      : full-batch epochs to run
/// - `report_every`: log cadence in epochs
/// - `seed`        : RNG seed for data and weights; `None` draws from entropy
/// - `dataset`     : spiral size
/// - `network`     : layer widths
/// - `optimizer`   : update rule and hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    #[serde(default = "default_report_every")]
    pub report_every: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub network: NetworkSpec,
    pub optimizer: OptimizerConfig,
}

fn default_report_every() -> usize {
    100
}

impl Default for TrainConfig {
    /// 2 → 64 → 3 on 3 × 100 spiral points with Adam (lr 0.05, decay 1e-6).
    fn default() -> Self {
        TrainConfig {
            epochs: 10_000,
            report_every: default_report_every(),
            seed: None,
            dataset: DatasetConfig::default(),
            network: NetworkSpec::default(),
            optimizer: OptimizerConfig::Adam {
                learning_rate: 0.05,
                decay_rate: 1e-6,
                epsilon: 1e-7,
                beta1: 0.9,
                beta2: 0.999,
            },
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NnError::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.report_every == 0 {
            return Err(NnError::InvalidConfig("report_every must be at least 1".into()));
        }
        if self.dataset.points_per_class == 0 {
            return Err(NnError::InvalidConfig("points_per_class must be at least 1".into()));
        }
        self.network.validate()?;
        self.optimizer.validate()?;
        if self.network.inputs != 2 {
            return Err(NnError::shape_mismatch(
                "network inputs (spiral points are 2-D)",
                2,
                self.network.inputs,
            ));
        }
        if self.dataset.classes != self.network.classes {
            return Err(NnError::shape_mismatch(
                "network classes",
                self.dataset.classes,
                self.network.classes,
            ));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a config written by `save_json` (or by hand).
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let reader = BufReader::new(File::open(path)?);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let config: TrainConfig =
            serde_json::from_str(r#"{ "epochs": 50, "optimizer": { "type": "sgd" } }"#).unwrap();
        assert_eq!(config.report_every, 100);
        assert_eq!(config.network, NetworkSpec::default());
        assert_eq!(config.dataset, DatasetConfig::default());
        assert_eq!(config.optimizer, OptimizerConfig::sgd());
    }

    #[test]
    fn class_count_must_agree() {
        let mut config = TrainConfig::default();
        config.dataset.classes = 4;
        assert!(matches!(config.validate(), Err(NnError::ShapeMismatch { .. })));
    }

    #[test]
    fn zero_epochs_rejected() {
        let config = TrainConfig {
            epochs: 0,
            ..TrainConfig::default()
        };
        assert!(matches!(config.validate(), Err(NnError::InvalidConfig(_))));
    }
}
