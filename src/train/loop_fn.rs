use std::time::Instant;

use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::data::dataset::Dataset;
use crate::data::loader::shuffled_batches;
use crate::loss::bce::{binary_accuracy, BceLoss};
use crate::math::matrix::Matrix;
use crate::network::network::ResidualNetwork;
use crate::optim::adam::Adam;
use crate::train::epoch_stats::{BatchStats, EpochStats};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of shuffled mini-batch Adam
/// and returns the statistics of every epoch, in order.
///
/// The network is put in training mode for the run and left in it; call
/// `network.eval()` before inference.
///
/// # Panics
/// Panics if `data` is empty, `batch_size == 0`, or the network does not
/// produce exactly one logit per sample.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut ResidualNetwork,
    data: &Dataset,
    optimizer: &mut Adam,
    config: &TrainConfig,
    rng: &mut R,
) -> Vec<EpochStats> {
    assert!(!data.is_empty(), "training data must not be empty");
    assert_eq!(network.spec.num_outputs, 1, "binary training needs a single logit");

    network.train();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let batches = run_one_epoch(network, data, optimizer, config.batch_size, rng);

        let stats = EpochStats::from_batches(
            epoch,
            config.epochs,
            &batches,
            t_start.elapsed().as_millis() as u64,
        );
        tracing::info!(
            epoch = stats.epoch,
            total = stats.total_epochs,
            "average loss: {:.4}, average accuracy: {:.4}",
            stats.avg_loss,
            stats.avg_accuracy
        );
        history.push(stats);
    }

    history
}

/// Fraction of `data` classified correctly with dropout disabled.
pub fn evaluate_accuracy(network: &ResidualNetwork, data: &Dataset) -> f64 {
    let probs = probabilities(&network.predict(&data.inputs));
    binary_accuracy(&probs, &data.labels)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One full pass over the training data; returns one record per mini-batch.
fn run_one_epoch<R: Rng + ?Sized>(
    network: &mut ResidualNetwork,
    data: &Dataset,
    optimizer: &mut Adam,
    batch_size: usize,
    rng: &mut R,
) -> Vec<BatchStats> {
    let batches = shuffled_batches(data.len(), batch_size, rng);
    let mut records = Vec::with_capacity(batches.len());

    for indices in &batches {
        let batch = data.gather(indices);

        network.zero_grad();
        let logits = network.forward(&batch.inputs, rng);
        let probs = probabilities(&logits);

        let loss = BceLoss::loss(&probs, &batch.labels);
        let grad = BceLoss::logit_gradient(&probs, &batch.labels);
        network.backward(&Matrix::from_vec(batch.len(), 1, grad));
        optimizer.step(&mut network.param_groups_mut());

        let record = BatchStats {
            loss,
            accuracy: binary_accuracy(&probs, &batch.labels),
        };
        tracing::debug!(step = optimizer.steps(), loss = record.loss, accuracy = record.accuracy, "batch");
        records.push(record);
    }

    records
}

/// Sigmoid of every logit in a `(batch, 1)` matrix.
fn probabilities(logits: &Matrix) -> Vec<f64> {
    logits
        .data
        .iter()
        .map(|&z| ActivationFunction::Sigmoid.function(z))
        .collect()
}
