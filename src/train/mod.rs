pub mod epoch_stats;
pub mod metrics;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use metrics::accuracy;
pub use train_config::{DatasetConfig, TrainConfig};
pub use trainer::TrainingContext;
