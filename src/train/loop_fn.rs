use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::activation::activation::Activation;
use crate::data::sample::Sample;
use crate::error::{NetworkError, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs, one online step per sample,
/// and returns the mean loss measured after the **last completed epoch**.
///
/// The loop stops early if the `progress_tx` receiver has been dropped.
///
/// # Errors
/// `Configuration` if `samples` is empty; `DimensionMismatch` if any sample
/// does not fit the network. A mismatch aborts mid-epoch, so earlier
/// samples of that epoch have already been applied.
pub fn train_loop<A: Activation>(
    network: &mut Network<A>,
    samples: &[Sample],
    config: &TrainConfig,
) -> Result<f64> {
    if samples.is_empty() {
        return Err(NetworkError::config("cannot train on an empty sample set"));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<usize> = (0..samples.len()).collect();
    let mut last_loss = 0.0;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rng);
        }
        for &idx in &order {
            let sample = &samples[idx];
            network.train(&sample.input, &sample.target)?;
        }

        let mean_loss = evaluate(network, samples)?;
        last_loss = mean_loss;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            mean_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(epoch, mean_loss, elapsed_ms = stats.elapsed_ms, "epoch complete");

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                info!(epoch, "progress receiver dropped, stopping");
                break;
            }
        }
    }

    Ok(last_loss)
}

/// Mean squared error over `samples`, forward passes only.
pub fn evaluate<A: Activation>(network: &mut Network<A>, samples: &[Sample]) -> Result<f64> {
    if samples.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for sample in samples {
        let output = network.fire(&sample.input)?;
        total += MseLoss::loss(&output, &sample.target);
    }
    Ok(total / samples.len() as f64)
}

/// Fraction of samples whose strongest output matches the strongest target.
pub fn accuracy<A: Activation>(network: &mut Network<A>, samples: &[Sample]) -> Result<f64> {
    if samples.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for sample in samples {
        let output = network.fire(&sample.input)?;
        if argmax(&output) == argmax(&sample.target) {
            correct += 1;
        }
    }
    Ok(correct as f64 / samples.len() as f64)
}

/// Index of the maximum element in a slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
