use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::data::grid::{DEFAULT_N_GRID, DEFAULT_X_RANGE, DEFAULT_Y_RANGE};
use crate::data::ood::{DEFAULT_OOD_MEANS, DEFAULT_OOD_VARS};
use crate::network::spec::ResnetSpec;
use crate::plot::figure::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::train::train_config::TrainConfig;

/// Every constant of a demonstration run. `Default` is the reference setup;
/// nothing is read from files or the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Seed of the single RNG that drives data, initialization, shuffling
    /// and dropout.
    pub seed: u64,
    /// Points per moon; the training set has twice as many.
    pub sample_size: usize,
    pub ood_sample_size: usize,
    pub ood_means: (f64, f64),
    pub ood_vars: (f64, f64),
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub n_grid: usize,
    pub model: ResnetSpec,
    pub train: TrainConfig,
    pub learning_rate: f64,
    pub output_dir: PathBuf,
    /// Figure size in pixels.
    pub figure_size: (u32, u32),
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            seed: 0,
            sample_size: 500,
            ood_sample_size: 500,
            ood_means: DEFAULT_OOD_MEANS,
            ood_vars: DEFAULT_OOD_VARS,
            x_range: DEFAULT_X_RANGE,
            y_range: DEFAULT_Y_RANGE,
            n_grid: DEFAULT_N_GRID,
            model: ResnetSpec::default(),
            train: TrainConfig::default(),
            learning_rate: 1e-4,
            output_dir: PathBuf::from("figures"),
            figure_size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        }
    }
}
