use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Whether the network is being trained or evaluated.
///
/// Only dropout looks at this: it samples a mask in `Train` and is the
/// identity in `Eval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Train,
    Eval,
}

/// Inverted dropout: zeroes each activation with probability `rate` and
/// scales the survivors by `1 / (1 - rate)`, so evaluation needs no rescaling.
#[derive(Debug, Clone)]
pub struct Dropout {
    pub rate: f64,
    mask: Option<Matrix>,
}

impl Dropout {
    pub fn new(rate: f64) -> Dropout {
        assert!(
            (0.0..1.0).contains(&rate),
            "dropout rate must be in [0, 1), got {}",
            rate
        );
        Dropout { rate, mask: None }
    }

    pub fn feed_from<R: Rng + ?Sized>(&mut self, input: &Matrix, mode: Mode, rng: &mut R) -> Matrix {
        if mode == Mode::Eval || self.rate == 0.0 {
            self.mask = None;
            return input.clone();
        }

        let scale = 1.0 / (1.0 - self.rate);
        let mask = Matrix {
            rows: input.rows,
            cols: input.cols,
            data: (0..input.data.len())
                .map(|_| if rng.gen::<f64>() < self.rate { 0.0 } else { scale })
                .collect(),
        };
        let out = input.hadamard(&mask);
        self.mask = Some(mask);
        out
    }

    /// Routes `delta` back through the mask of the last forward pass.
    pub fn backward(&self, delta: &Matrix) -> Matrix {
        match &self.mask {
            Some(mask) => delta.hadamard(mask),
            None => delta.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.mask = None;
    }
}
