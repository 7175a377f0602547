pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod score;
pub mod plot;
pub mod demo;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{Layer, Mode, ResidualBlock};
pub use network::{ResidualNetwork, ResnetSpec};
pub use loss::BceLoss;
pub use optim::Adam;
pub use train::{train_loop, EpochStats, TrainConfig};
pub use data::{make_ood_data, make_testing_data, make_training_data, Dataset, Grid};
pub use plot::{plot_uncertainty_surface, Colormap, Figure, Surface};
pub use demo::DemoConfig;
