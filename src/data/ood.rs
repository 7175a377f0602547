use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::math::matrix::Matrix;

pub const DEFAULT_OOD_MEANS: (f64, f64) = (2.5, -1.75);
pub const DEFAULT_OOD_VARS: (f64, f64) = (0.01, 0.01);

/// `sample_size` unlabeled points from a 2D Gaussian with diagonal covariance
/// `diag(vars)`, returned as a `(sample_size, 2)` matrix.
///
/// # Panics
/// Panics if either variance is negative or not finite.
pub fn make_ood_data<R: Rng + ?Sized>(
    sample_size: usize,
    means: (f64, f64),
    vars: (f64, f64),
    rng: &mut R,
) -> Matrix {
    let x_dist = Normal::new(means.0, vars.0.sqrt())
        .unwrap_or_else(|e| panic!("invalid x variance {}: {}", vars.0, e));
    let y_dist = Normal::new(means.1, vars.1.sqrt())
        .unwrap_or_else(|e| panic!("invalid y variance {}: {}", vars.1, e));

    let mut data = Vec::with_capacity(2 * sample_size);
    for _ in 0..sample_size {
        data.push(x_dist.sample(rng));
        data.push(y_dist.sample(rng));
    }
    Matrix::from_vec(sample_size, 2, data)
}
