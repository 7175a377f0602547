use std::fs;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};

/// Loss and accuracy of a single mini-batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub loss: f64,
    /// Fraction of the batch on the right side of p = 0.5.
    pub accuracy: f64,
}

/// Per-epoch training statistics returned by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean of the per-batch losses.
    pub avg_loss: f64,
    /// Mean of the per-batch accuracies, in [0, 1].
    pub avg_accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Averages batch records the way they are reported: every batch weighs
    /// the same, whatever its size.
    pub fn from_batches(epoch: usize, total_epochs: usize, batches: &[BatchStats], elapsed_ms: u64) -> Self {
        let n = batches.len().max(1) as f64;
        EpochStats {
            epoch,
            total_epochs,
            avg_loss: batches.iter().map(|b| b.loss).sum::<f64>() / n,
            avg_accuracy: batches.iter().map(|b| b.accuracy).sum::<f64>() / n,
            elapsed_ms,
        }
    }
}

/// Writes a training history as a pretty-printed JSON array.
pub fn save_history_json(history: &[EpochStats], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory '{}'", dir.display()))?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("creating '{}'", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), history)
        .with_context(|| format!("writing training history '{}'", path.display()))?;
    tracing::info!("Saved training history '{}'", path.display());
    Ok(())
}
