pub mod bce;

pub use bce::{BceLoss, binary_accuracy};
