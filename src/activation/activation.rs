use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// A scalar nonlinearity paired with its derivative.
///
/// The derivative is expressed in terms of the node's *output* `y = f(x)`,
/// since that is what the forward pass caches and what backprop reads.
/// Implementors must keep the two consistent; the trainer never uses any
/// other derivative formula.
pub trait Activation {
    fn function(&self, x: f64) -> f64;

    /// `f'(x)` evaluated from `y = f(x)`.
    fn derivative(&self, output: f64) -> f64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    /// Logistic sigmoid `1 / (1 + e^-x)`.
    #[default]
    Sigmoid,
    Tanh,
    Identity,
    ReLU,
    LeakyReLU { alpha: f64 },
}

impl Activation for ActivationFunction {
    fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
        }
    }

    fn derivative(&self, output: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => output * (1.0 - output),
            ActivationFunction::Tanh => 1.0 - output * output,
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => if output > 0.0 { 1.0 } else { 0.0 },
            // alpha > 0 keeps the sign of the output equal to the sign of the input
            ActivationFunction::LeakyReLU { alpha } => if output > 0.0 { 1.0 } else { *alpha },
        }
    }
}
