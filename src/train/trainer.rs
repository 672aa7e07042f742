use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::data::labels::Labels;
use crate::data::spiral::spiral_data;
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::Optimizer;
use crate::train::epoch_stats::EpochStats;
use crate::train::metrics::accuracy;
use crate::train::train_config::TrainConfig;

/// Owns everything one training run mutates: the network, the optimizer with
/// its per-layer state, and the full training batch.
///
/// Each epoch is one pass of
/// forward → loss → backward → learning-rate update → parameter update.
/// Dropping the context ends the run; `into_network` keeps the trained model.
pub struct TrainingContext {
    network: Network,
    optimizer: Box<dyn Optimizer>,
    features: Matrix,
    labels: Labels,
    epoch: usize,
}

impl TrainingContext {
    /// Fails with `ShapeMismatch` if the batch does not fit the network.
    pub fn new(
        network: Network,
        optimizer: Box<dyn Optimizer>,
        features: Matrix,
        labels: Labels,
    ) -> Result<TrainingContext> {
        network.check_batch(&features, &labels)?;
        debug!(
            samples = features.nrows(),
            parameters = network.parameter_count(),
            optimizer = optimizer.name(),
            "training context ready"
        );
        Ok(TrainingContext {
            network,
            optimizer,
            features,
            labels,
            epoch: 0,
        })
    }

    /// Generates the spiral data, initialises the network and builds the
    /// optimizer, all from one seeded RNG.
    pub fn from_config(config: &TrainConfig) -> Result<TrainingContext> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (features, labels) = spiral_data(
            config.dataset.points_per_class,
            config.dataset.classes,
            &mut rng,
        );
        let network = Network::new(&config.network, &mut rng)?;
        let optimizer = config.optimizer.build(&network.layer_shapes());
        TrainingContext::new(network, optimizer, features, Labels::Sparse(labels))
    }

    /// Runs one full-batch epoch and returns its metrics.
    pub fn run_epoch(&mut self) -> EpochStats {
        let loss = self.network.forward(&self.features, &self.labels);
        let stats = EpochStats {
            epoch: self.epoch,
            loss,
            accuracy: accuracy(self.network.output(), &self.labels),
            learning_rate: self.optimizer.current_learning_rate(),
        };

        self.network.backward(&self.labels);

        self.optimizer.update_learning_rate();
        self.network.apply(self.optimizer.as_mut());
        self.optimizer.advance_step();

        self.epoch += 1;
        stats
    }

    /// Runs `epochs` epochs, logging every `report_every`-th one and the last
    /// one. Returns the metrics of every epoch in order.
    pub fn train(&mut self, epochs: usize, report_every: usize) -> Vec<EpochStats> {
        let report_every = report_every.max(1);
        let mut history = Vec::with_capacity(epochs);

        for i in 0..epochs {
            let stats = self.run_epoch();
            if stats.epoch % report_every == 0 || i + 1 == epochs {
                info!(
                    "epoch: {}, acc: {:.3}, loss: {:.3}, lr: {}",
                    stats.epoch, stats.accuracy, stats.loss, stats.learning_rate
                );
            }
            history.push(stats);
        }
        history
    }

    /// Loss and accuracy of the current parameters, without updating them.
    pub fn evaluate(&mut self) -> (f64, f64) {
        let loss = self.network.forward(&self.features, &self.labels);
        (loss, accuracy(self.network.output(), &self.labels))
    }

    /// Epochs completed so far.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Ends the run and hands back the trained network.
    pub fn into_network(self) -> Network {
        self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::NetworkSpec;
    use crate::optim::config::OptimizerConfig;
    use crate::train::train_config::DatasetConfig;

    fn small_config(optimizer: OptimizerConfig) -> TrainConfig {
        TrainConfig {
            epochs: 20,
            report_every: 5,
            seed: Some(11),
            dataset: DatasetConfig {
                points_per_class: 20,
                classes: 3,
            },
            network: NetworkSpec::new(2, vec![16], 3),
            optimizer,
        }
    }

    #[test]
    fn epochs_advance_optimizer_step_once_each() {
        let config = small_config(OptimizerConfig::adam());
        let mut ctx = TrainingContext::from_config(&config).unwrap();
        let history = ctx.train(config.epochs, config.report_every);

        assert_eq!(history.len(), 20);
        assert_eq!(ctx.epoch(), 20);
        assert_eq!(ctx.optimizer().step(), 20);
        assert_eq!(history[0].epoch, 0);
        assert_eq!(history[19].epoch, 19);
    }

    #[test]
    fn untrained_loss_is_near_uniform_guess() {
        let config = small_config(OptimizerConfig::sgd());
        let mut ctx = TrainingContext::from_config(&config).unwrap();
        let first = ctx.run_epoch();
        assert!((first.loss - 3.0f64.ln()).abs() < 1e-2);
    }

    #[test]
    fn decay_is_visible_in_reported_rate() {
        let config = small_config(OptimizerConfig::SgdDecay {
            learning_rate: 1.0,
            decay_rate: 0.1,
        });
        let mut ctx = TrainingContext::from_config(&config).unwrap();
        let history = ctx.train(3, 1);
        assert_eq!(history[0].learning_rate, 1.0);
        assert_eq!(history[1].learning_rate, 1.0);
        assert!((history[2].learning_rate - 1.0 / 1.1).abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_run() {
        let config = small_config(OptimizerConfig::rmsprop());
        let a = TrainingContext::from_config(&config).unwrap().train(5, 100);
        let b = TrainingContext::from_config(&config).unwrap().train(5, 100);
        assert_eq!(a, b);
    }
}
