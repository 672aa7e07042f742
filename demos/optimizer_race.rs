//! Trains the same 2 → 64 → 3 spiral classifier with each optimizer and
//! prints where every run ends up.
//!
//! Run with:
//!   cargo run --example optimizer_race --release
use ferrite_backprop::{OptimizerConfig, TrainConfig, TrainingContext};

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).init();

    let optimizers = vec![
        OptimizerConfig::Sgd { learning_rate: 1.0 },
        OptimizerConfig::SgdDecay {
            learning_rate: 1.0,
            decay_rate: 1e-3,
        },
        OptimizerConfig::SgdMomentum {
            learning_rate: 1.0,
            decay_rate: 1e-3,
            momentum: 0.9,
        },
        OptimizerConfig::AdaGrad {
            learning_rate: 1.0,
            decay_rate: 1e-4,
            epsilon: 1e-7,
        },
        OptimizerConfig::RmsProp {
            learning_rate: 0.02,
            decay_rate: 1e-5,
            epsilon: 1e-7,
            rho: 0.999,
        },
        OptimizerConfig::Adam {
            learning_rate: 0.05,
            decay_rate: 1e-6,
            epsilon: 1e-7,
            beta1: 0.9,
            beta2: 0.999,
        },
    ];

    println!("{:<14} {:>8} {:>8} {:>12}", "optimizer", "acc", "loss", "final lr");
    for optimizer in optimizers {
        let config = TrainConfig {
            epochs: 5_000,
            seed: Some(0),
            optimizer,
            ..TrainConfig::default()
        };
        let mut ctx = match TrainingContext::from_config(&config) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("{}: {}", config.optimizer.name(), e);
                continue;
            }
        };
        ctx.train(config.epochs, config.report_every);
        let (loss, accuracy) = ctx.evaluate();
        println!(
            "{:<14} {:>8.3} {:>8.3} {:>12.6}",
            config.optimizer.name(),
            accuracy,
            loss,
            ctx.optimizer().current_learning_rate()
        );
    }
}
