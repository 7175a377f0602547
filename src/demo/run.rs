use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};

use crate::data::{make_ood_data, make_testing_data, make_training_data};
use crate::demo::config::DemoConfig;
use crate::network::network::ResidualNetwork;
use crate::optim::adam::Adam;
use crate::plot::{plot_dataset, plot_uncertainty_surface, Colormap, Figure, Scene};
use crate::score::uncertainty::{class_zero_probability, uncertainty, OodSummary};
use crate::train::epoch_stats::{save_history_json, EpochStats};
use crate::train::loop_fn::{evaluate_accuracy, train_loop};

/// What a run produced besides its figures.
#[derive(Debug, Clone)]
pub struct DemoOutcome {
    pub history: Vec<EpochStats>,
    /// Eval-mode accuracy on the full training set after the last epoch.
    pub train_accuracy: f64,
    pub ood: OodSummary,
    /// Every file written, in order.
    pub outputs: Vec<PathBuf>,
}

/// Runs the whole demonstration: synthesize data, plot it, train the
/// residual classifier, then plot its class-probability and uncertainty
/// surfaces. All randomness comes from one RNG seeded with `config.seed`.
pub fn run(config: &DemoConfig) -> Result<DemoOutcome> {
    tracing::info!(
        "Configuration: {}",
        serde_json::to_string(config).context("serializing configuration")?
    );
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut outputs = Vec::new();

    // ── Data ─────────────────────────────────────────────────────────────
    let train = make_training_data(config.sample_size, &mut rng);
    let grid = make_testing_data(config.x_range, config.y_range, config.n_grid);
    let ood = make_ood_data(config.ood_sample_size, config.ood_means, config.ood_vars, &mut rng);
    tracing::info!(
        train = ?(train.inputs.rows, train.inputs.cols),
        labels = train.len(),
        grid = ?(grid.points.rows, grid.points.cols),
        ood = ?(ood.rows, ood.cols),
        "Synthesized data"
    );

    let scene = Scene { train: &train, ood: &ood, n_grid: grid.n_grid };
    let (width, height) = config.figure_size;

    let mut figure = Figure::new(width, height, config.x_range, config.y_range);
    plot_dataset(&mut figure, &scene);
    outputs.push(save(&figure, config, "dataset.png")?);

    // ── Training ─────────────────────────────────────────────────────────
    let mut network = ResidualNetwork::new(config.model.clone(), &mut rng);
    let mut optimizer = Adam::new(config.learning_rate);
    tracing::info!(
        blocks = config.model.num_layers,
        hidden = config.model.num_hidden,
        epochs = config.train.epochs,
        batch_size = config.train.batch_size,
        "Training residual classifier"
    );
    let history = train_loop(&mut network, &train, &mut optimizer, &config.train, &mut rng);

    let history_path = config.output_dir.join("training_history.json");
    save_history_json(&history, &history_path)?;
    outputs.push(history_path);

    // ── Surfaces ─────────────────────────────────────────────────────────
    network.eval();
    let train_accuracy = evaluate_accuracy(&network, &train);
    let class_zero = class_zero_probability(&network.predict(&grid.points));

    let mut figure = Figure::with_colorbar(width, height, config.x_range, config.y_range);
    let surface = plot_uncertainty_surface(&mut figure, &class_zero, &scene, &Colormap::Viridis)?;
    figure.colorbar(&surface);
    figure.set_title("Class Probability, Deterministic Model");
    outputs.push(save(&figure, config, "class_probability.png")?);

    let mut figure = Figure::with_colorbar(width, height, config.x_range, config.y_range);
    let surface = plot_uncertainty_surface(&mut figure, &uncertainty(&class_zero), &scene, &Colormap::Viridis)?;
    figure.colorbar(&surface);
    figure.set_title("Predictive Uncertainty, Deterministic Model");
    outputs.push(save(&figure, config, "predictive_uncertainty.png")?);

    let ood_summary = OodSummary::from_logits(&network.predict(&ood));
    tracing::info!(
        train_accuracy,
        ood_mean_class_zero = ood_summary.mean_class_zero_probability,
        ood_mean_uncertainty = ood_summary.mean_uncertainty,
        ood_fraction_class_one = ood_summary.fraction_class_one,
        "Evaluation done"
    );

    Ok(DemoOutcome {
        history,
        train_accuracy,
        ood: ood_summary,
        outputs,
    })
}

fn save(figure: &Figure, config: &DemoConfig, name: &str) -> Result<PathBuf> {
    let path = config.output_dir.join(name);
    figure.save(&path)?;
    Ok(path)
}
