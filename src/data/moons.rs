use std::f64::consts::PI;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::data::dataset::Dataset;
use crate::math::matrix::Matrix;

/// Standard deviation of the Gaussian jitter added to every coordinate.
pub const MOONS_NOISE: f64 = 0.1;

/// Offsets applied after generation to pull the two classes apart.
pub const CLASS_0_SHIFT: [f64; 2] = [-0.1, 0.2];
pub const CLASS_1_SHIFT: [f64; 2] = [0.1, -0.2];

/// Two interleaving half-moons with `2 * sample_size` points in random order.
///
/// The upper moon (`cos t`, `sin t`) is class 0, the lower one
/// (`1 - cos t`, `0.5 - sin t`) is class 1, with `t` evenly spaced over
/// `[0, π]`. Each class is then shifted by its `CLASS_*_SHIFT`.
pub fn make_training_data<R: Rng + ?Sized>(sample_size: usize, rng: &mut R) -> Dataset {
    let n = 2 * sample_size;
    let n_outer = n / 2;
    let n_inner = n - n_outer;

    let mut points: Vec<([f64; 2], f64)> = Vec::with_capacity(n);
    for t in linspace(0.0, PI, n_outer) {
        points.push(([t.cos(), t.sin()], 0.0));
    }
    for t in linspace(0.0, PI, n_inner) {
        points.push(([1.0 - t.cos(), 1.0 - t.sin() - 0.5], 1.0));
    }

    points.shuffle(rng);

    let noise = Normal::new(0.0, MOONS_NOISE).expect("noise std is finite and positive");
    let mut data = Vec::with_capacity(2 * n);
    let mut labels = Vec::with_capacity(n);
    for ([x, y], label) in points {
        let shift = if label == 0.0 { CLASS_0_SHIFT } else { CLASS_1_SHIFT };
        data.push(x + noise.sample(rng) + shift[0]);
        data.push(y + noise.sample(rng) + shift[1]);
        labels.push(label);
    }

    Dataset::new(Matrix::from_vec(n, 2, data), labels)
}

/// `n` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn sizes_and_balanced_labels() {
        let mut rng = StdRng::seed_from_u64(0);
        let data = make_training_data(500, &mut rng);
        assert_eq!(data.len(), 1000);
        assert_eq!((data.inputs.rows, data.inputs.cols), (1000, 2));
        assert!(data.labels.iter().all(|&l| l == 0.0 || l == 1.0));
        assert_eq!(data.labels.iter().filter(|&&l| l == 0.0).count(), 500);
        assert_eq!(data.labels.iter().filter(|&&l| l == 1.0).count(), 500);
    }

    #[test]
    fn same_seed_same_data() {
        let a = make_training_data(50, &mut StdRng::seed_from_u64(42));
        let b = make_training_data(50, &mut StdRng::seed_from_u64(42));
        let c = make_training_data(50, &mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn classes_sit_on_their_moons() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = make_training_data(500, &mut rng);
        let upper = data.class_points(0.0);
        let lower = data.class_points(1.0);
        let mean = |m: &Matrix, c: usize| m.column(c).iter().sum::<f64>() / m.rows as f64;

        // Upper moon: x centred near -0.1, y around 2/π + 0.2.
        assert!((mean(&upper, 0) + 0.1).abs() < 0.05);
        assert!((mean(&upper, 1) - (2.0 / PI + 0.2)).abs() < 0.05);
        // Lower moon: x centred near 1.1, y around 0.5 - 2/π - 0.2.
        assert!((mean(&lower, 0) - 1.1).abs() < 0.05);
        assert!((mean(&lower, 1) - (0.3 - 2.0 / PI)).abs() < 0.05);
    }

    #[test]
    fn linspace_includes_both_ends() {
        let v = linspace(-3.5, 3.5, 100);
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], -3.5);
        assert_eq!(v[99], 3.5);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }
}
