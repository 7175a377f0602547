use crate::data::moons::linspace;
use crate::math::matrix::Matrix;

pub const DEFAULT_X_RANGE: (f64, f64) = (-3.5, 3.5);
pub const DEFAULT_Y_RANGE: (f64, f64) = (-2.5, 2.5);
pub const DEFAULT_N_GRID: usize = 100;

/// Regular `n_grid × n_grid` lattice over `x_range × y_range`.
///
/// `points` holds one row per lattice node, row-major with x varying fastest:
/// node `(i, j)` (y index `i`, x index `j`) is row `i * n_grid + j`, and
/// `i = 0` is the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub n_grid: usize,
    pub points: Matrix,
}

impl Grid {
    pub fn len(&self) -> usize {
        self.points.rows
    }

    pub fn is_empty(&self) -> bool {
        self.points.rows == 0
    }
}

pub fn make_testing_data(x_range: (f64, f64), y_range: (f64, f64), n_grid: usize) -> Grid {
    let xs = linspace(x_range.0, x_range.1, n_grid);
    let ys = linspace(y_range.0, y_range.1, n_grid);

    let mut data = Vec::with_capacity(2 * n_grid * n_grid);
    for &y in &ys {
        for &x in &xs {
            data.push(x);
            data.push(y);
        }
    }

    Grid {
        x_range,
        y_range,
        n_grid,
        points: Matrix::from_vec(n_grid * n_grid, 2, data),
    }
}

impl Default for Grid {
    fn default() -> Self {
        make_testing_data(DEFAULT_X_RANGE, DEFAULT_Y_RANGE, DEFAULT_N_GRID)
    }
}
