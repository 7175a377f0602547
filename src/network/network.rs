use rand::Rng;

use crate::layers::{Layer, Mode, ResidualBlock};
use crate::math::matrix::Matrix;
use crate::network::spec::ResnetSpec;

/// Residual multilayer perceptron producing one raw logit per output.
///
/// ```text
/// hidden = input_layer(x)                     (fixed parameter group)
/// hidden = hidden + dropout(relu(block(hidden)))   for each block
/// logits = classifier(hidden)
/// ```
#[derive(Debug, Clone)]
pub struct ResidualNetwork {
    pub spec: ResnetSpec,
    pub input_layer: Layer,
    pub blocks: Vec<ResidualBlock>,
    pub classifier: Layer,
    mode: Mode,
}

impl ResidualNetwork {
    /// Builds the network in training mode. The input projection is created
    /// frozen: it keeps its initial values for the lifetime of the network.
    pub fn new<R: Rng + ?Sized>(spec: ResnetSpec, rng: &mut R) -> ResidualNetwork {
        let input_layer = Layer::frozen(spec.num_hidden, spec.num_input_features, rng);
        let blocks = (0..spec.num_layers)
            .map(|_| ResidualBlock::new(spec.num_hidden, spec.dropout_rate, rng))
            .collect();
        let classifier = Layer::new(spec.num_outputs, spec.num_hidden, rng);

        ResidualNetwork {
            spec,
            input_layer,
            blocks,
            classifier,
            mode: Mode::Train,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn train(&mut self) {
        self.mode = Mode::Train;
    }

    pub fn eval(&mut self) {
        self.mode = Mode::Eval;
    }

    /// Forward pass over a `(batch, num_input_features)` matrix; caches what
    /// `backward` needs. Dropout follows the current mode.
    pub fn forward<R: Rng + ?Sized>(&mut self, input: &Matrix, rng: &mut R) -> Matrix {
        assert_eq!(
            input.cols, self.spec.num_input_features,
            "expected {} input features, got {}",
            self.spec.num_input_features, input.cols
        );

        let mut hidden = self.input_layer.feed_from(input);
        for block in &mut self.blocks {
            hidden = block.feed_from(&hidden, self.mode, rng);
        }
        self.classifier.feed_from(&hidden)
    }

    /// Inference-only forward pass: no caches and no dropout, whatever the mode.
    pub fn predict(&self, input: &Matrix) -> Matrix {
        assert_eq!(
            input.cols, self.spec.num_input_features,
            "expected {} input features, got {}",
            self.spec.num_input_features, input.cols
        );

        let mut hidden = self.input_layer.apply(input);
        for block in &self.blocks {
            hidden = block.apply(&hidden);
        }
        self.classifier.apply(&hidden)
    }

    /// Backpropagates `∂L/∂logits` through the last `forward`, accumulating
    /// gradients in every trainable layer. The frozen input projection is
    /// the first layer, so the pass stops before it.
    pub fn backward(&mut self, grad_logits: &Matrix) {
        let mut delta = self.classifier.backward(grad_logits);
        for block in self.blocks.iter_mut().rev() {
            delta = block.backward(&delta);
        }
    }

    pub fn zero_grad(&mut self) {
        self.input_layer.zero_grad();
        for block in &mut self.blocks {
            block.zero_grad();
        }
        self.classifier.zero_grad();
    }

    /// Every parameter group, input side first. The order is stable, so an
    /// optimizer may key its state by position.
    pub fn param_groups_mut(&mut self) -> Vec<&mut Layer> {
        let mut groups = Vec::with_capacity(self.blocks.len() + 2);
        groups.push(&mut self.input_layer);
        groups.extend(self.blocks.iter_mut().map(|b| &mut b.linear));
        groups.push(&mut self.classifier);
        groups
    }
}
