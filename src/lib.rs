pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod train;
pub mod data;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::{Activation, ActivationFunction};
pub use network::{Network, NetworkConfig, Topology};
pub use loss::mse::MseLoss;
pub use train::{train_loop, TrainConfig};
pub use data::sample::Sample;
pub use error::{NetworkError, Result};
