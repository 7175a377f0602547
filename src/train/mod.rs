pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use epoch_stats::{save_history_json, BatchStats, EpochStats};
pub use train_config::TrainConfig;
pub use loop_fn::{evaluate_accuracy, train_loop};
