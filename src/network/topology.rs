use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;

/// Ordered layer sizes `[n0, n1, ..., nL]`: input, zero or more hidden
/// layers, output.
///
/// A `Topology` can only be built through validating constructors, so
/// holding one guarantees at least two layers, each with at least one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology(Vec<usize>);

impl Topology {
    pub fn new(layers: Vec<usize>) -> Result<Topology> {
        if layers.len() < 2 {
            return Err(NetworkError::config(format!(
                "a network needs at least an input and an output layer, got {} layer(s)",
                layers.len()
            )));
        }
        if let Some(idx) = layers.iter().position(|&n| n == 0) {
            return Err(NetworkError::config(format!("layer {idx} has no nodes")));
        }
        Ok(Topology(layers))
    }

    /// Builds `[input, hidden..., output]`.
    pub fn from_parts(input: usize, hidden: &[usize], output: usize) -> Result<Topology> {
        let mut layers = Vec::with_capacity(hidden.len() + 2);
        layers.push(input);
        layers.extend_from_slice(hidden);
        layers.push(output);
        Topology::new(layers)
    }

    pub fn layers(&self) -> &[usize] {
        &self.0
    }

    pub fn input_size(&self) -> usize {
        self.0[0]
    }

    pub fn output_size(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Number of layer-to-layer transitions, i.e. weight matrices (`L`).
    pub fn transitions(&self) -> usize {
        self.0.len() - 1
    }

    /// `(n_i, n_{i+1})` for every transition.
    pub fn weight_shapes(&self) -> Vec<(usize, usize)> {
        self.0.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Total number of weights across all matrices.
    pub fn parameter_count(&self) -> usize {
        self.weight_shapes().iter().map(|(r, c)| r * c).sum()
    }

    /// Verifies that `weights` has one matrix per transition, each shaped
    /// `(n_i, n_{i+1})`.
    pub fn check_weights(&self, weights: &[Matrix]) -> Result<()> {
        let shapes = self.weight_shapes();
        if weights.len() != shapes.len() {
            return Err(NetworkError::config(format!(
                "expected {} weight matrices, got {}",
                shapes.len(),
                weights.len()
            )));
        }
        for (idx, (matrix, &expected)) in weights.iter().zip(&shapes).enumerate() {
            let ragged = matrix.data.len() != matrix.rows
                || matrix.data.iter().any(|row| row.len() != matrix.cols);
            if ragged || matrix.shape() != expected {
                return Err(NetworkError::config(format!(
                    "weight matrix {idx} must be {}x{}, got {}x{}",
                    expected.0, expected.1, matrix.rows, matrix.cols
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = NetworkError;

    fn try_from(layers: Vec<usize>) -> Result<Self> {
        Topology::new(layers)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Self {
        topology.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_layer() {
        assert!(matches!(Topology::new(vec![3]), Err(NetworkError::Configuration(_))));
        assert!(matches!(Topology::new(vec![]), Err(NetworkError::Configuration(_))));
    }

    #[test]
    fn rejects_empty_layer() {
        assert!(Topology::new(vec![3, 0, 2]).is_err());
        assert!(Topology::from_parts(0, &[], 1).is_err());
    }

    #[test]
    fn shapes_follow_layers() {
        let t = Topology::from_parts(5, &[6, 7], 3).unwrap();
        assert_eq!(t.layers(), &[5, 6, 7, 3]);
        assert_eq!(t.transitions(), 3);
        assert_eq!(t.weight_shapes(), vec![(5, 6), (6, 7), (7, 3)]);
        assert_eq!(t.parameter_count(), 30 + 42 + 21);
        assert_eq!(t.input_size(), 5);
        assert_eq!(t.output_size(), 3);
    }

    #[test]
    fn check_weights_catches_bad_shapes() {
        let t = Topology::new(vec![2, 3, 1]).unwrap();
        let good = vec![Matrix::zeros(2, 3), Matrix::zeros(3, 1)];
        assert!(t.check_weights(&good).is_ok());

        let transposed = vec![Matrix::zeros(3, 2), Matrix::zeros(3, 1)];
        assert!(t.check_weights(&transposed).is_err());

        let missing = vec![Matrix::zeros(2, 3)];
        assert!(t.check_weights(&missing).is_err());

        let mut lying = Matrix::zeros(2, 3);
        lying.data[1].pop();
        assert!(t.check_weights(&[lying, Matrix::zeros(3, 1)]).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let t: Topology = serde_json::from_str("[2, 4, 1]").unwrap();
        assert_eq!(t.layers(), &[2, 4, 1]);
        assert!(serde_json::from_str::<Topology>("[2]").is_err());
        assert_eq!(serde_json::to_string(&t).unwrap(), "[2,4,1]");
    }
}
