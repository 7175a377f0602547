pub mod network;
pub mod spec;

pub use network::ResidualNetwork;
pub use spec::ResnetSpec;
