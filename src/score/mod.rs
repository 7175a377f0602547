pub mod uncertainty;

pub use uncertainty::{class_zero_probability, normalize_by_max, uncertainty, OodSummary};
