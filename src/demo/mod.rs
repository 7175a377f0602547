pub mod config;
pub mod run;

pub use config::DemoConfig;
pub use run::{run, DemoOutcome};
