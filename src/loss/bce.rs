pub struct BceLoss;

/// Floor for each log term, so a saturated probability costs at most 100.
const LOG_FLOOR: f64 = -100.0;

impl BceLoss {
    /// Scalar BCE: -mean(y·log(p) + (1-y)·log(1-p)), logs clamped at -100.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        assert_eq!(predicted.len(), expected.len(), "predictions and labels differ in length");
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| {
                let log_p = p.ln().max(LOG_FLOOR);
                let log_q = (1.0 - p).ln().max(LOG_FLOOR);
                -(y * log_p + (1.0 - y) * log_q)
            })
            .sum::<f64>() / n
    }

    /// Gradient of the mean loss w.r.t. the logits when `predicted = σ(logits)`.
    ///
    /// Sigmoid and BCE composed together simplify to `(p - y) / n`, which
    /// avoids dividing by `p·(1-p)` near saturation.
    pub fn logit_gradient(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        assert_eq!(predicted.len(), expected.len(), "predictions and labels differ in length");
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| (p - y) / n)
            .collect()
    }
}

/// Fraction of predictions on the right side of 0.5.
pub fn binary_accuracy(predicted: &[f64], expected: &[f64]) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }
    let correct = predicted.iter().zip(expected.iter())
        .filter(|(p, y)| {
            let class = if **p > 0.5 { 1.0 } else { 0.0 };
            class == **y
        })
        .count();
    correct as f64 / predicted.len() as f64
}
