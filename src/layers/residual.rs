use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::layers::dense::Layer;
use crate::layers::dropout::{Dropout, Mode};
use crate::math::matrix::Matrix;

/// `h ↦ h + dropout(relu(W·h + b))`, with an identity shortcut.
#[derive(Debug, Clone)]
pub struct ResidualBlock {
    pub linear: Layer,
    pub dropout: Dropout,
    activator: ActivationFunction,
    pre_neurons: Option<Matrix>,  // z = W·h + b, needed for relu'(z)
}

impl ResidualBlock {
    pub fn new<R: Rng + ?Sized>(width: usize, dropout_rate: f64, rng: &mut R) -> ResidualBlock {
        ResidualBlock {
            linear: Layer::new(width, width, rng),
            dropout: Dropout::new(dropout_rate),
            activator: ActivationFunction::ReLU,
            pre_neurons: None,
        }
    }

    pub fn feed_from<R: Rng + ?Sized>(&mut self, hidden: &Matrix, mode: Mode, rng: &mut R) -> Matrix {
        let z = self.linear.feed_from(hidden);
        let a = z.map(|x| self.activator.function(x));
        let branch = self.dropout.feed_from(&a, mode, rng);
        self.pre_neurons = Some(z);
        hidden.clone() + branch
    }

    /// Inference path: no caches, no dropout.
    pub fn apply(&self, hidden: &Matrix) -> Matrix {
        let a = self.linear.apply(hidden).map(|x| self.activator.function(x));
        hidden.clone() + a
    }

    /// Takes `∂L/∂out` and returns `∂L/∂hidden`; the shortcut passes `delta`
    /// through unchanged and the branch adds its own contribution.
    pub fn backward(&mut self, delta: &Matrix) -> Matrix {
        let z = self
            .pre_neurons
            .as_ref()
            .expect("ResidualBlock::backward called without a preceding feed_from");
        let act_derivative = z.map(|x| self.activator.derivative(x));
        let branch_delta = self.dropout.backward(delta).hadamard(&act_derivative);
        let through_branch = self.linear.backward(&branch_delta);
        delta.clone() + through_branch
    }

    pub fn zero_grad(&mut self) {
        self.linear.zero_grad();
        self.dropout.clear();
        self.pre_neurons = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn shortcut_survives_dead_branch() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut block = ResidualBlock::new(2, 0.0, &mut rng);
        // A branch that is always negative is zeroed by ReLU.
        block.linear.weights = Matrix::zeros(2, 2);
        block.linear.biases = Matrix::from_vec(1, 2, vec![-1.0, -1.0]);

        let h = Matrix::from_rows(vec![vec![0.25, -4.0]]);
        assert_eq!(block.apply(&h), h);
        assert_eq!(block.feed_from(&h, Mode::Train, &mut rng), h);

        let delta = Matrix::from_rows(vec![vec![1.0, 1.0]]);
        assert_eq!(block.backward(&delta), delta);
        assert!(block.linear.weights_grad.data.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn backward_matches_finite_difference() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut block = ResidualBlock::new(3, 0.0, &mut rng);
        let h = Matrix::from_rows(vec![vec![0.4, -0.2, 0.9]]);

        // L = sum(out), so ∂L/∂out is all ones.
        block.feed_from(&h, Mode::Train, &mut rng);
        let analytic = block.backward(&Matrix::from_vec(1, 3, vec![1.0; 3]));

        let eps = 1e-6;
        for j in 0..3 {
            let mut plus = h.clone();
            plus.set(0, j, h.get(0, j) + eps);
            let mut minus = h.clone();
            minus.set(0, j, h.get(0, j) - eps);
            let numeric = (block.apply(&plus).data.iter().sum::<f64>()
                - block.apply(&minus).data.iter().sum::<f64>())
                / (2.0 * eps);
            assert!((numeric - analytic.get(0, j)).abs() < 1e-5);
        }
    }
}
