use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferrite_backprop::{NnError, OptimizerConfig, TrainConfig, TrainingContext};

/// Trains a small ReLU classifier on the spiral dataset.
#[derive(Parser)]
#[command(name = "ferrite-backprop", version, about, long_about = None)]
struct Cli {
    /// JSON training config; defaults to 2-64-3 with Adam on 3 × 100 points.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replace the configured optimizer with this one at its default settings.
    #[arg(short, long, value_enum)]
    optimizer: Option<OptimizerArg>,

    /// Override the number of epochs.
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Override the RNG seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OptimizerArg {
    Sgd,
    SgdDecay,
    SgdMomentum,
    Adagrad,
    Rmsprop,
    Adam,
}

impl OptimizerArg {
    fn config(self) -> OptimizerConfig {
        match self {
            OptimizerArg::Sgd => OptimizerConfig::sgd(),
            OptimizerArg::SgdDecay => OptimizerConfig::sgd_decay(),
            OptimizerArg::SgdMomentum => OptimizerConfig::sgd_momentum(),
            OptimizerArg::Adagrad => OptimizerConfig::adagrad(),
            OptimizerArg::Rmsprop => OptimizerConfig::rmsprop(),
            OptimizerArg::Adam => OptimizerConfig::adam(),
        }
    }
}

fn main() -> Result<(), NnError> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => TrainConfig::load_json(path)?,
        None => TrainConfig::default(),
    };
    if let Some(choice) = cli.optimizer {
        // Adam is already the default; keep whatever the config tuned for it.
        if !(choice == OptimizerArg::Adam && config.optimizer.name() == "adam") {
            config.optimizer = choice.config();
        }
    }
    if let Some(epochs) = cli.epochs {
        config.epochs = epochs;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    info!(
        optimizer = config.optimizer.name(),
        epochs = config.epochs,
        layers = ?config.network.layer_sizes(),
        "starting training"
    );

    let mut ctx = TrainingContext::from_config(&config)?;
    ctx.train(config.epochs, config.report_every);
    let (loss, accuracy) = ctx.evaluate();

    println!(
        "final: acc {:.3}, loss {:.3}, lr {} after {} epochs",
        accuracy,
        loss,
        ctx.optimizer().current_learning_rate(),
        ctx.epoch()
    );
    Ok(())
}
