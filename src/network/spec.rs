use serde::{Serialize, Deserialize};

/// Architecture of a `ResidualNetwork`.
///
/// Fields:
/// - `num_input_features` — width of each input sample (2 for planar points)
/// - `num_layers`         — number of residual blocks
/// - `num_hidden`         — width of the hidden state carried through the blocks
/// - `dropout_rate`       — drop probability applied after each block's ReLU
/// - `num_outputs`        — number of logits produced per sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResnetSpec {
    pub num_input_features: usize,
    pub num_layers: usize,
    pub num_hidden: usize,
    pub dropout_rate: f64,
    pub num_outputs: usize,
}

impl Default for ResnetSpec {
    fn default() -> Self {
        ResnetSpec {
            num_input_features: 2,
            num_layers: 6,
            num_hidden: 128,
            dropout_rate: 0.01,
            num_outputs: 1,
        }
    }
}
