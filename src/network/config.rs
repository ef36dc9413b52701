use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetworkError, Result};

pub const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// Hyperparameters fixed at construction time.
///
/// Every field has a default, so a partial JSON object such as
/// `{"learning_rate": 0.3}` deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub learning_rate: f64,
    pub activation: ActivationFunction,
    /// Seed for weight initialization. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            learning_rate: DEFAULT_LEARNING_RATE,
            activation: ActivationFunction::Sigmoid,
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_activation(mut self, activation: ActivationFunction) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_learning_rate(self.learning_rate)
    }
}

pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::config(format!(
            "learning rate must be a positive finite number, got {learning_rate}"
        )))
    }
}
