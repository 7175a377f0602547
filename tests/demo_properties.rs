use std::path::PathBuf;

use image::GenericImageView;

use moons_resnet::data::{DEFAULT_N_GRID, DEFAULT_OOD_MEANS, DEFAULT_OOD_VARS, DEFAULT_X_RANGE, DEFAULT_Y_RANGE};
use moons_resnet::train::evaluate_accuracy;
use moons_resnet::{
    demo, make_ood_data, make_testing_data, make_training_data, train_loop, Adam, DemoConfig,
    ResidualNetwork, ResnetSpec, TrainConfig,
};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn synthesized_data_has_reference_shapes() {
    let mut rng = StdRng::seed_from_u64(0);
    let train = make_training_data(500, &mut rng);
    let grid = make_testing_data(DEFAULT_X_RANGE, DEFAULT_Y_RANGE, DEFAULT_N_GRID);
    let ood = make_ood_data(500, DEFAULT_OOD_MEANS, DEFAULT_OOD_VARS, &mut rng);

    assert_eq!((train.inputs.rows, train.inputs.cols), (1000, 2));
    assert_eq!(train.labels.len(), 1000);
    assert_eq!((grid.points.rows, grid.points.cols), (10_000, 2));
    assert_eq!((ood.rows, ood.cols), (500, 2));
}

#[test]
fn input_projection_never_changes() {
    let mut rng = StdRng::seed_from_u64(0);
    let train = make_training_data(500, &mut rng);
    let mut net = ResidualNetwork::new(ResnetSpec::default(), &mut rng);
    let weights = net.input_layer.weights.clone();
    let biases = net.input_layer.biases.clone();
    let first_block = net.blocks[0].linear.weights.clone();

    let mut adam = Adam::new(1e-3);
    train_loop(&mut net, &train, &mut adam, &TrainConfig::new(3, 128), &mut rng);

    assert_eq!(net.input_layer.weights, weights);
    assert_eq!(net.input_layer.biases, biases);
    // The rest of the network did learn.
    assert_ne!(net.blocks[0].linear.weights, first_block);
}

#[test]
fn learns_the_two_moons() {
    let mut rng = StdRng::seed_from_u64(0);
    let train = make_training_data(500, &mut rng);
    let spec = ResnetSpec {
        num_input_features: 2,
        num_layers: 4,
        num_hidden: 64,
        dropout_rate: 0.01,
        num_outputs: 1,
    };
    let mut net = ResidualNetwork::new(spec, &mut rng);
    let mut adam = Adam::new(3e-3);
    let history = train_loop(&mut net, &train, &mut adam, &TrainConfig::new(80, 128), &mut rng);

    assert!(history.last().unwrap().avg_accuracy > 0.9);
    net.eval();
    let accuracy = evaluate_accuracy(&net, &train);
    assert!(accuracy > 0.9, "accuracy {}", accuracy);
}

#[test]
fn reference_configuration_learns_and_keeps_input_projection() {
    let config = DemoConfig::default();
    let mut rng = StdRng::seed_from_u64(config.seed);
    // Same draw order as demo::run: training data, OOD cluster, then weights.
    let train = make_training_data(config.sample_size, &mut rng);
    let _ood = make_ood_data(config.ood_sample_size, config.ood_means, config.ood_vars, &mut rng);
    let mut net = ResidualNetwork::new(config.model.clone(), &mut rng);
    let weights = net.input_layer.weights.clone();
    let biases = net.input_layer.biases.clone();

    let mut adam = Adam::new(config.learning_rate);
    let history = train_loop(&mut net, &train, &mut adam, &config.train, &mut rng);

    assert_eq!(history.len(), config.train.epochs);
    let last = history.last().unwrap().avg_accuracy;
    assert!(last > 0.9, "last epoch accuracy {}", last);
    net.eval();
    let accuracy = evaluate_accuracy(&net, &train);
    assert!(accuracy > 0.9, "accuracy {}", accuracy);
    assert_eq!(net.input_layer.weights, weights);
    assert_eq!(net.input_layer.biases, biases);
}

#[test]
fn run_writes_every_output() {
    let output_dir: PathBuf =
        std::env::temp_dir().join(format!("moons-resnet-demo-{}", std::process::id()));
    let config = DemoConfig {
        sample_size: 50,
        ood_sample_size: 20,
        n_grid: 20,
        model: ResnetSpec { num_layers: 2, num_hidden: 16, ..ResnetSpec::default() },
        train: TrainConfig::new(2, 32),
        output_dir: output_dir.clone(),
        figure_size: (490, 385),
        ..DemoConfig::default()
    };

    let outcome = demo::run(&config).unwrap();

    assert_eq!(outcome.history.len(), 2);
    let names: Vec<String> = outcome
        .outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "dataset.png",
            "training_history.json",
            "class_probability.png",
            "predictive_uncertainty.png",
        ]
    );
    for path in &outcome.outputs {
        assert!(path.exists(), "{} missing", path.display());
    }
    let img = image::open(output_dir.join("predictive_uncertainty.png")).unwrap();
    assert_eq!(img.dimensions(), (490, 385));
    assert!((0.0..=1.0).contains(&outcome.ood.fraction_class_one));

    std::fs::remove_dir_all(&output_dir).unwrap();
}
