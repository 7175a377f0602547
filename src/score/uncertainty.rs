use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::math::matrix::Matrix;

/// Probability of class 0 for every logit: `1 - σ(z)`.
pub fn class_zero_probability(logits: &Matrix) -> Vec<f64> {
    logits
        .data
        .iter()
        .map(|&z| 1.0 - ActivationFunction::Sigmoid.function(z))
        .collect()
}

/// `p·(1-p)` for every probability: 0.25 at p = 0.5, zero at p ∈ {0, 1}.
pub fn uncertainty(probs: &[f64]) -> Vec<f64> {
    probs.iter().map(|&p| p * (1.0 - p)).collect()
}

/// Divides every score by the largest one.
///
/// For non-negative input the result lies in `[0, 1]` and its maximum is
/// exactly 1.0. An all-zero (or non-positive) input is returned unchanged
/// rather than turned into NaNs.
pub fn normalize_by_max(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 || !max.is_finite() {
        return scores.to_vec();
    }
    scores.iter().map(|&s| s / max).collect()
}

/// How the model treats the out-of-distribution cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OodSummary {
    /// Mean probability of class 0 over the cluster.
    pub mean_class_zero_probability: f64,
    /// Mean `p·(1-p)` over the cluster.
    pub mean_uncertainty: f64,
    /// Fraction of points assigned to class 1 (p of class 0 below 0.5).
    pub fraction_class_one: f64,
}

impl OodSummary {
    pub fn from_logits(logits: &Matrix) -> OodSummary {
        let probs = class_zero_probability(logits);
        let n = probs.len().max(1) as f64;
        OodSummary {
            mean_class_zero_probability: probs.iter().sum::<f64>() / n,
            mean_uncertainty: uncertainty(&probs).iter().sum::<f64>() / n,
            fraction_class_one: probs.iter().filter(|&&p| p < 0.5).count() as f64 / n,
        }
    }
}
