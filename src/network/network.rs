use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, trace};

use crate::activation::activation::{Activation, ActivationFunction};
use crate::error::{NetworkError, Result};
use crate::loss::mse::MseLoss;
use crate::math::{init::fan_in_uniform, matrix::Matrix};
use crate::network::config::{validate_learning_rate, NetworkConfig};
use crate::network::topology::Topology;

/// A fully connected feedforward network trained online by backpropagation.
///
/// `weights[i]` connects layer `i` to layer `i + 1` and is shaped
/// `(n_i, n_{i+1})`. The activation cache holds one vector per layer, input
/// and output included, and reflects only the most recent forward pass.
///
/// `fire` and `train` both take `&mut self` because they overwrite the
/// cache; share an instance across threads only behind a lock.
///
/// Deserialization goes through the same checks as [`Network::from_parts`].
#[derive(Debug, Clone, Serialize)]
pub struct Network<A = ActivationFunction> {
    topology: Topology,
    learning_rate: f64,
    activation: A,
    weights: Vec<Matrix>,
    #[serde(skip)]
    activations: Vec<Vec<f64>>,
}

/// Serialized shape of a [`Network`], validated before it becomes one.
#[derive(Deserialize)]
struct NetworkRecord<A> {
    topology: Topology,
    learning_rate: f64,
    activation: A,
    weights: Vec<Matrix>,
}

impl<'de, A> Deserialize<'de> for Network<A>
where
    A: Activation + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = NetworkRecord::<A>::deserialize(deserializer)?;
        Network::from_parts(record.topology, record.learning_rate, record.activation, record.weights)
            .map_err(de::Error::custom)
    }
}

impl Network<ActivationFunction> {
    /// Builds a network with fan-in scaled random weights.
    ///
    /// Weights are reproducible when `config.seed` is set; otherwise the
    /// generator is seeded from OS entropy.
    pub fn new(topology: Topology, config: NetworkConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(seeded = config.seed.is_some(), "seeding weight initializer");
        Network::with_rng(topology, config, &mut rng)
    }

    /// Like [`Network::new`] but draws initial weights from `rng`.
    /// `config.seed` is ignored.
    pub fn with_rng<R: Rng + ?Sized>(
        topology: Topology,
        config: NetworkConfig,
        rng: &mut R,
    ) -> Result<Self> {
        Network::random(topology, config.learning_rate, config.activation, rng)
    }

    /// Builds a network from preset weights, which must match the topology
    /// shape for shape.
    pub fn with_weights(
        topology: Topology,
        config: NetworkConfig,
        weights: Vec<Matrix>,
    ) -> Result<Self> {
        Network::from_parts(topology, config.learning_rate, config.activation, weights)
    }

    /// Serializes topology, hyperparameters, and weights to a pretty-printed
    /// JSON file. The activation cache is not saved.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads a network written by [`Network::save_json`].
    ///
    /// A file that violates a construction invariant is reported as
    /// `Configuration`, not as a JSON error.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let record: NetworkRecord<ActivationFunction> = serde_json::from_reader(reader)?;
        Network::from_parts(record.topology, record.learning_rate, record.activation, record.weights)
    }
}

impl<A: Activation> Network<A> {
    /// Builds a network with a custom activation and fan-in scaled random
    /// weights drawn from `rng`.
    pub fn random<R: Rng + ?Sized>(
        topology: Topology,
        learning_rate: f64,
        activation: A,
        rng: &mut R,
    ) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        let weights = topology.weight_shapes()
            .into_iter()
            .map(|(rows, cols)| fan_in_uniform(rows, cols, rng))
            .collect();
        debug!(
            layers = ?topology.layers(),
            parameters = topology.parameter_count(),
            learning_rate,
            "initialized random weights"
        );
        Ok(Network {
            topology,
            learning_rate,
            activation,
            weights,
            activations: Vec::new(),
        })
    }

    /// Builds a network with a custom activation from preset weights.
    pub fn from_parts(
        topology: Topology,
        learning_rate: f64,
        activation: A,
        weights: Vec<Matrix>,
    ) -> Result<Self> {
        let network = Network {
            topology,
            learning_rate,
            activation,
            weights,
            activations: Vec::new(),
        };
        network.validate()?;
        debug!(
            layers = ?network.topology.layers(),
            parameters = network.topology.parameter_count(),
            learning_rate,
            "loaded preset weights"
        );
        Ok(network)
    }

    fn validate(&self) -> Result<()> {
        validate_learning_rate(self.learning_rate)?;
        self.topology.check_weights(&self.weights)
    }

    /// Forward propagation.
    ///
    /// Computes every layer's activation from `input`, caches them all, and
    /// returns the output layer. On a length mismatch nothing is touched.
    pub fn fire(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        NetworkError::check_len("input", self.topology.input_size(), input.len())?;

        let mut activations = Vec::with_capacity(self.weights.len() + 1);
        let mut current = input.to_vec();
        for weights in &self.weights {
            let next = weights.vec_mul(&current)
                .into_iter()
                .map(|z| self.activation.function(z))
                .collect();
            activations.push(std::mem::replace(&mut current, next));
        }
        activations.push(current.clone());

        self.activations = activations;
        Ok(current)
    }

    /// One online gradient step on a single example.
    ///
    /// Runs a forward pass, then walks the transitions from the output back
    /// to the input. At each one, the error for the source layer is
    /// propagated through the weights as they were before this step, and
    /// every weight moves by `lr * err[k] * f'(out[k]) * in[j]`.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        NetworkError::check_len("target", self.topology.output_size(), target.len())?;
        let output = self.fire(input)?;

        let mut error = MseLoss::error(&output, target);
        trace!(error = ?error, "output error");

        for i in (0..self.weights.len()).rev() {
            let inputs = &self.activations[i];
            let outputs = &self.activations[i + 1];
            let weights = &mut self.weights[i];

            let propagated = if i > 0 { weights.mul_vec(&error) } else { Vec::new() };

            for (k, (&out, &err)) in outputs.iter().zip(&error).enumerate() {
                let delta = self.learning_rate * err * self.activation.derivative(out);
                for (row, &x) in weights.data.iter_mut().zip(inputs) {
                    row[k] += delta * x;
                }
            }

            error = propagated;
        }

        Ok(())
    }

    /// Per-layer activations from the latest forward pass, input first.
    /// Empty until `fire` or `train` has succeeded once.
    pub fn last_activations(&self) -> &[Vec<f64>] {
        &self.activations
    }

    /// Output layer of the latest forward pass.
    pub fn output(&self) -> Option<&[f64]> {
        self.activations.last().map(Vec::as_slice)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn activation(&self) -> &A {
        &self.activation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn preset(layers: Vec<usize>, weights: Vec<Vec<Vec<f64>>>) -> Network {
        let weights = weights.into_iter().map(|m| Matrix::from_rows(m).unwrap()).collect();
        Network::with_weights(Topology::new(layers).unwrap(), NetworkConfig::default(), weights)
            .unwrap()
    }

    #[test]
    fn cache_is_empty_before_first_pass() {
        let net = Network::new(Topology::new(vec![2, 2]).unwrap(), NetworkConfig::default()).unwrap();
        assert!(net.last_activations().is_empty());
        assert!(net.output().is_none());
    }

    #[test]
    fn fire_caches_every_layer() {
        let mut net = Network::new(
            Topology::new(vec![3, 4, 2]).unwrap(),
            NetworkConfig::default().with_seed(1),
        ).unwrap();
        let out = net.fire(&[0.1, 0.2, 0.3]).unwrap();
        let cache = net.last_activations();
        assert_eq!(cache.len(), 3);
        assert_eq!(cache[0], vec![0.1, 0.2, 0.3]);
        assert_eq!(cache[1].len(), 4);
        assert_eq!(cache[2], out);
        assert_eq!(net.output(), Some(out.as_slice()));
    }

    #[test]
    fn rejected_input_leaves_cache_alone() {
        let mut net = Network::new(
            Topology::new(vec![2, 1]).unwrap(),
            NetworkConfig::default().with_seed(3),
        ).unwrap();
        net.fire(&[0.5, 0.5]).unwrap();
        let before = net.last_activations().to_vec();
        assert!(net.fire(&[0.5]).is_err());
        assert_eq!(net.last_activations(), before.as_slice());
    }

    #[test]
    fn single_step_matches_hand_computation() {
        // 2 -> 1, weights [0.5, -0.5], lr 0.5
        let mut net = preset(vec![2, 1], vec![vec![vec![0.5], vec![-0.5]]]);
        net.train(&[1.0, 0.0], &[1.0]).unwrap();

        let out = 1.0 / (1.0 + (-0.5f64).exp());
        let delta = 0.5 * (1.0 - out) * out * (1.0 - out);
        assert_abs_diff_eq!(net.weights()[0].get(0, 0), 0.5 + delta, epsilon = 1e-12);
        // zero input leaves its weight unchanged
        assert_abs_diff_eq!(net.weights()[0].get(1, 0), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn hidden_error_uses_pre_update_weights() {
        // 1 -> 1 -> 1 with identity activation keeps the arithmetic exact.
        let topology = Topology::new(vec![1, 1, 1]).unwrap();
        let weights = vec![
            Matrix::from_rows(vec![vec![2.0]]).unwrap(),
            Matrix::from_rows(vec![vec![3.0]]).unwrap(),
        ];
        let mut net = Network::from_parts(topology, 0.1, ActivationFunction::Identity, weights).unwrap();
        net.train(&[1.0], &[10.0]).unwrap();

        // hidden = 2, output = 6, error = 4
        // w1 += 0.1 * 4 * 2 = 0.8 -> 3.8
        // hidden error = 3 * 4 = 12 (old weight), w0 += 0.1 * 12 * 1 = 1.2 -> 3.2
        assert_abs_diff_eq!(net.weights()[1].get(0, 0), 3.8, epsilon = 1e-12);
        assert_abs_diff_eq!(net.weights()[0].get(0, 0), 3.2, epsilon = 1e-12);
    }

    #[test]
    fn bad_target_leaves_weights_untouched() {
        let mut net = preset(vec![2, 1], vec![vec![vec![0.5], vec![-0.5]]]);
        let before = net.weights().to_vec();
        let err = net.train(&[1.0, 0.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, NetworkError::DimensionMismatch { what: "target", expected: 1, actual: 2 }));
        assert_eq!(net.weights(), before.as_slice());
        assert!(net.last_activations().is_empty());
    }

    #[test]
    fn preset_weights_must_match_topology() {
        let topology = Topology::new(vec![2, 3]).unwrap();
        let err = Network::with_weights(topology, NetworkConfig::default(), vec![Matrix::zeros(3, 2)])
            .unwrap_err();
        assert!(matches!(err, NetworkError::Configuration(_)));
    }

    #[test]
    fn rejects_non_positive_learning_rate() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let config = NetworkConfig::default().with_learning_rate(0.0);
        assert!(Network::new(topology, config).is_err());
    }
    #[test]
    fn deep_step_matches_hand_computation() {
        // 2 -> 3 -> 2 -> 1: non-square matrices catch a transposed backward pass.
        let mut net = preset(vec![2, 3, 2, 1], vec![
            vec![vec![0.9, 0.2, 0.1], vec![0.3, 0.8, 0.5]],
            vec![vec![0.3, 0.6], vec![0.7, 0.5], vec![0.2, 0.9]],
            vec![vec![0.09], vec![0.65]],
        ]);
        net.train(&[0.2, 0.05], &[0.2]).unwrap();

        let expected = [
            vec![
                vec![0.8955405094792994, 0.1958177670712147, 0.09349318219207729],
                vec![0.2988851273698248, 0.7989544417678037, 0.49837329554801935],
            ],
            vec![
                vec![0.2975832647384391, 0.5852095288005423],
                vec![0.6977092863869643, 0.4859807839697233],
                vec![0.19774779424051672, 0.8862164528524423],
            ],
            vec![vec![0.0572177920010956], vec![0.6127997795752076]],
        ];
        for (matrix, rows) in net.weights().iter().zip(&expected) {
            for (j, row) in rows.iter().enumerate() {
                for (k, &w) in row.iter().enumerate() {
                    assert_abs_diff_eq!(matrix.get(j, k), w, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn deserialize_rejects_bad_learning_rate() {
        let json = r#"{"topology":[2,1],"learning_rate":-3.0,"activation":"Sigmoid",
            "weights":[{"rows":2,"cols":1,"data":[[0.1],[0.2]]}]}"#;
        assert!(serde_json::from_str::<Network>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_wrong_matrix_count() {
        let json = r#"{"topology":[2,1],"learning_rate":0.5,"activation":"Sigmoid","weights":[]}"#;
        assert!(serde_json::from_str::<Network>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_ragged_rows() {
        let json = r#"{"topology":[2,2],"learning_rate":0.5,"activation":"Sigmoid",
            "weights":[{"rows":2,"cols":2,"data":[[0.1,0.2],[0.3]]}]}"#;
        assert!(serde_json::from_str::<Network>(json).is_err());
    }

    #[test]
    fn deserialize_accepts_valid_network() {
        let original = preset(vec![2, 1], vec![vec![vec![0.5], vec![-0.5]]]);
        let json = serde_json::to_string(&original).unwrap();
        let mut restored: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.weights(), original.weights());
        assert_eq!(restored.fire(&[0.5, 0.5]).unwrap().len(), 1);
    }
}
