use std::collections::HashMap;

use crate::{layers::dense::Layer, math::matrix::Matrix};

/// First and second moment estimates for one parameter group.
#[derive(Debug, Clone)]
struct Moments {
    m_w: Matrix,
    v_w: Matrix,
    m_b: Matrix,
    v_b: Matrix,
}

impl Moments {
    fn for_layer(layer: &Layer) -> Moments {
        let (wr, wc) = (layer.weights.rows, layer.weights.cols);
        let (br, bc) = (layer.biases.rows, layer.biases.cols);
        Moments {
            m_w: Matrix::zeros(wr, wc),
            v_w: Matrix::zeros(wr, wc),
            m_b: Matrix::zeros(br, bc),
            v_b: Matrix::zeros(br, bc),
        }
    }
}

/// Adaptive moment estimation with bias correction.
///
/// State is keyed by the position of each group in the slice passed to
/// `step`, so callers must pass groups in the same order every time.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    step: usize,
    moments: HashMap<usize, Moments>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            step: 0,
            moments: HashMap::new(),
        }
    }

    /// Number of updates applied so far.
    pub fn steps(&self) -> usize {
        self.step
    }

    /// Applies one update to every trainable group from its accumulated
    /// gradients. Fixed groups are skipped and get no optimizer state.
    pub fn step(&mut self, groups: &mut [&mut Layer]) {
        self.step += 1;
        let t = self.step as i32;
        let correction1 = 1.0 - self.beta1.powi(t);
        let correction2 = 1.0 - self.beta2.powi(t);

        for (id, layer) in groups.iter_mut().enumerate() {
            if !layer.is_trainable() {
                continue;
            }

            let moments = self
                .moments
                .entry(id)
                .or_insert_with(|| Moments::for_layer(&**layer));

            let rule = AdamRule {
                lr: self.learning_rate,
                beta1: self.beta1,
                beta2: self.beta2,
                epsilon: self.epsilon,
                correction1,
                correction2,
            };
            rule.apply(&mut layer.weights, &layer.weights_grad, &mut moments.m_w, &mut moments.v_w);
            rule.apply(&mut layer.biases, &layer.biases_grad, &mut moments.m_b, &mut moments.v_b);
        }
    }
}

struct AdamRule {
    lr: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    correction1: f64,
    correction2: f64,
}

impl AdamRule {
    fn apply(&self, param: &mut Matrix, grad: &Matrix, m: &mut Matrix, v: &mut Matrix) {
        assert_eq!(param.data.len(), grad.data.len(), "gradient shape does not match parameter");
        for i in 0..param.data.len() {
            let g = grad.data[i];
            m.data[i] = self.beta1 * m.data[i] + (1.0 - self.beta1) * g;
            v.data[i] = self.beta2 * v.data[i] + (1.0 - self.beta2) * g * g;
            let m_hat = m.data[i] / self.correction1;
            let v_hat = v.data[i] / self.correction2;
            param.data[i] -= self.lr * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }
}
