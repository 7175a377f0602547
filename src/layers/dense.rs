use rand::Rng;

use crate::math::matrix::Matrix;

/// Fully-connected affine layer: `y = x·W + b`.
///
/// A layer is one parameter group. Whether the optimizer may touch it is fixed
/// at construction (`Layer::new` vs `Layer::frozen`) and never changes.
#[derive(Debug, Clone)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub weights_grad: Matrix,
    pub biases_grad: Matrix,
    trainable: bool,
    inputs: Option<Matrix>,  // batch seen by the last training forward, needed for dW
}

impl Layer {
    /// Trainable layer with weights and biases drawn from `U(-1/sqrt(fan_in), 1/sqrt(fan_in))`.
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        Layer::init(size, input_size, true, rng)
    }

    /// Same initialization as `new`, but the optimizer never updates it and
    /// no gradients are accumulated for it.
    pub fn frozen<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        Layer::init(size, input_size, false, rng)
    }

    fn init<R: Rng + ?Sized>(size: usize, input_size: usize, trainable: bool, rng: &mut R) -> Layer {
        let bound = 1.0 / (input_size as f64).sqrt();
        let weights = Matrix::uniform(input_size, size, bound, rng);
        let biases = Matrix::uniform(1, size, bound, rng);

        Layer {
            size,
            input_size,
            weights,
            biases,
            weights_grad: Matrix::zeros(input_size, size),
            biases_grad: Matrix::zeros(1, size),
            trainable,
            inputs: None,
        }
    }

    pub fn is_trainable(&self) -> bool {
        self.trainable
    }

    /// Forward pass that remembers `input` for a later `backward`.
    pub fn feed_from(&mut self, input: &Matrix) -> Matrix {
        let z = self.apply(input);
        self.inputs = Some(input.clone());
        z
    }

    /// Stateless forward pass, for inference.
    pub fn apply(&self, input: &Matrix) -> Matrix {
        input.matmul(&self.weights).add_row(&self.biases)
    }

    /// Accumulates `∂L/∂W` and `∂L/∂b` from `delta = ∂L/∂y` (trainable layers
    /// only) and returns `∂L/∂x`.
    ///
    /// # Panics
    /// Panics if there was no `feed_from` since the last `zero_grad`.
    pub fn backward(&mut self, delta: &Matrix) -> Matrix {
        let inputs = self
            .inputs
            .as_ref()
            .expect("Layer::backward called without a preceding feed_from");

        if self.trainable {
            let w_grad = inputs.transpose().matmul(delta);
            let b_grad = delta.sum_rows();
            self.weights_grad = std::mem::take(&mut self.weights_grad) + w_grad;
            self.biases_grad = std::mem::take(&mut self.biases_grad) + b_grad;
        }

        delta.matmul(&self.weights.transpose())
    }

    /// Resets accumulated gradients and drops the cached batch.
    pub fn zero_grad(&mut self) {
        self.weights_grad = Matrix::zeros(self.input_size, self.size);
        self.biases_grad = Matrix::zeros(1, self.size);
        self.inputs = None;
    }
}
