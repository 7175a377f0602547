use crate::math::matrix::Matrix;

/// Labeled planar points: `inputs` is `(n, 2)`, `labels[i] ∈ {0.0, 1.0}`
/// belongs to row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub inputs: Matrix,
    pub labels: Vec<f64>,
}

impl Dataset {
    pub fn new(inputs: Matrix, labels: Vec<f64>) -> Dataset {
        assert_eq!(
            inputs.rows,
            labels.len(),
            "inputs and labels must have equal length"
        );
        Dataset { inputs, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The rows listed in `indices`, as a new dataset (a minibatch).
    pub fn gather(&self, indices: &[usize]) -> Dataset {
        Dataset {
            inputs: self.inputs.gather_rows(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// All points carrying `label`.
    pub fn class_points(&self, label: f64) -> Matrix {
        let indices: Vec<usize> = self
            .labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == label)
            .map(|(i, _)| i)
            .collect();
        self.inputs.gather_rows(&indices)
    }
}
