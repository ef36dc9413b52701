// Demo driver.
//
//   backprop-nn                       train the soft AND gate and print outputs
//   backprop-nn <train.csv> [test.csv]  train a 784-100-10 digit classifier
//
// CSV records are `label,pixel0,...,pixel783` with pixels in [0, 255].
use std::process::ExitCode;

use backprop_nn::data::sample::{and_gate_samples, load_csv};
use backprop_nn::train::{accuracy, train_loop, TrainConfig};
use backprop_nn::{Network, NetworkConfig, Result, Topology};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DIGIT_EPOCHS: usize = 5;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [] => and_gate(),
        [train] => digits(train, None),
        [train, test] => digits(train, Some(test.as_str())),
        _ => {
            eprintln!("usage: backprop-nn [<train.csv> [test.csv]]");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn and_gate() -> Result<()> {
    let samples = and_gate_samples();
    let mut network = Network::new(Topology::new(vec![2, 1])?, NetworkConfig::default())?;

    let loss = train_loop(&mut network, &samples, &TrainConfig::new(10_000))?;
    info!(loss, "trained AND gate");

    for sample in &samples {
        let output = network.fire(&sample.input)?;
        println!("Input: {:?} -> Output: {:.4} (target {:.4})", sample.input, output[0], sample.target[0]);
    }
    Ok(())
}

fn digits(train_path: &str, test_path: Option<&str>) -> Result<()> {
    let train = load_csv(train_path, 10, 255.0)?;
    info!(samples = train.len(), path = train_path, "loaded training set");

    let topology = Topology::from_parts(784, &[100], 10)?;
    let mut network = Network::new(topology, NetworkConfig::default().with_learning_rate(0.3))?;

    let loss = train_loop(&mut network, &train, &TrainConfig::new(DIGIT_EPOCHS).shuffled(None))?;
    info!(loss, accuracy = accuracy(&mut network, &train)?, "training finished");

    if let Some(test_path) = test_path {
        let test = load_csv(test_path, 10, 255.0)?;
        info!(samples = test.len(), accuracy = accuracy(&mut network, &test)?, "test set");
    }
    Ok(())
}
