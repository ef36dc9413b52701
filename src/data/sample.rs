use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// "Off" value for soft-encoded inputs and targets.
pub const SOFT_LOW: f64 = 0.01;
/// "On" value for soft-encoded targets. Staying clear of 0 and 1 keeps the
/// sigmoid out of its flat tails.
pub const SOFT_HIGH: f64 = 0.99;

/// One training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Sample {
        Sample { input, target }
    }

    /// Parses a `label,v1,v2,...` record (the MNIST CSV layout).
    ///
    /// Values are rescaled with [`soft_scale`] against `max_value` and the
    /// label becomes a [`soft_one_hot`] target over `classes` outputs.
    /// `line_no` is only used in error messages. `max_value` must be a
    /// positive finite number.
    pub fn from_csv_record(line: &str, line_no: usize, classes: usize, max_value: f64) -> Result<Sample> {
        check_max_value(max_value)?;
        let parse_err = |reason: String| NetworkError::Parse { line: line_no, reason };

        let mut fields = line.trim().split(',');
        let label = fields.next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| parse_err("missing label".to_string()))?;
        let label: usize = label.trim().parse()
            .map_err(|e| parse_err(format!("bad label {label:?}: {e}")))?;

        let input = fields
            .map(|f| {
                f.trim().parse::<f64>()
                    .map(|v| soft_scale(v, max_value))
                    .map_err(|e| parse_err(format!("bad value {f:?}: {e}")))
            })
            .collect::<Result<Vec<f64>>>()?;
        if input.is_empty() {
            return Err(parse_err("record has no values".to_string()));
        }

        let target = soft_one_hot(label, classes).map_err(|_| {
            parse_err(format!("label {label} out of range for {classes} classes"))
        })?;

        Ok(Sample { input, target })
    }
}

fn check_max_value(max_value: f64) -> Result<()> {
    if max_value.is_finite() && max_value > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::config(format!(
            "max value must be a positive finite number, got {max_value}"
        )))
    }
}

/// Maps `value` in `[0, max]` onto `[0.01, 1.0]`: `value / max * 0.99 + 0.01`.
///
/// `max` must be positive; the CSV readers reject anything else.
pub fn soft_scale(value: f64, max: f64) -> f64 {
    (value / max * SOFT_HIGH + SOFT_LOW).clamp(SOFT_LOW, 1.0)
}

/// `classes` outputs at [`SOFT_LOW`], with [`SOFT_HIGH`] at `label`.
pub fn soft_one_hot(label: usize, classes: usize) -> Result<Vec<f64>> {
    if label >= classes {
        return Err(NetworkError::DimensionMismatch {
            what: "label",
            expected: classes,
            actual: label,
        });
    }
    let mut target = vec![SOFT_LOW; classes];
    target[label] = SOFT_HIGH;
    Ok(target)
}

/// Reads every non-blank line of a CSV file as a [`Sample`].
pub fn load_csv(path: impl AsRef<Path>, classes: usize, max_value: f64) -> Result<Vec<Sample>> {
    check_max_value(max_value)?;
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        samples.push(Sample::from_csv_record(&line, idx + 1, classes, max_value)?);
    }
    Ok(samples)
}

/// Soft-encoded AND gate: inputs at 0.01/0.99, targets taken from the
/// sigmoid of a `[0.99, 0.99]` weighted sum so that a 2-1 network can
/// represent them exactly.
pub fn and_gate_samples() -> Vec<Sample> {
    vec![
        Sample::new(vec![SOFT_HIGH, SOFT_HIGH], vec![0.876554595392]),
        Sample::new(vec![SOFT_HIGH, SOFT_LOW], vec![0.729087922349]),
        Sample::new(vec![SOFT_LOW, SOFT_LOW], vec![0.50494983829]),
        Sample::new(vec![SOFT_LOW, SOFT_HIGH], vec![0.729087922349]),
    ]
}

/// Soft-encoded XOR gate. Not linearly separable; needs a hidden layer.
pub fn xor_gate_samples() -> Vec<Sample> {
    vec![
        Sample::new(vec![SOFT_HIGH, SOFT_HIGH], vec![SOFT_LOW]),
        Sample::new(vec![SOFT_HIGH, SOFT_LOW], vec![SOFT_HIGH]),
        Sample::new(vec![SOFT_LOW, SOFT_LOW], vec![SOFT_LOW]),
        Sample::new(vec![SOFT_LOW, SOFT_HIGH], vec![SOFT_HIGH]),
    ]
}
