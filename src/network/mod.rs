pub mod config;
pub mod network;
pub mod topology;

pub use config::NetworkConfig;
pub use network::Network;
pub use topology::Topology;
