pub mod dense;
pub mod dropout;
pub mod residual;

pub use dense::Layer;
pub use dropout::{Dropout, Mode};
pub use residual::ResidualBlock;
