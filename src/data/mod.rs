pub mod dataset;
pub mod grid;
pub mod loader;
pub mod moons;
pub mod ood;

pub use dataset::Dataset;
pub use grid::{make_testing_data, Grid, DEFAULT_N_GRID, DEFAULT_X_RANGE, DEFAULT_Y_RANGE};
pub use loader::shuffled_batches;
pub use moons::make_training_data;
pub use ood::{make_ood_data, DEFAULT_OOD_MEANS, DEFAULT_OOD_VARS};
