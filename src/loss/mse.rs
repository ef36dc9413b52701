/// Squared-error measures over one output vector.
///
/// Training never returns a loss; these exist so callers can watch
/// convergence from the outside.
pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((expected - predicted)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len().max(1) as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (b - a).powi(2))
            .sum::<f64>() / n
    }

    /// Per-output error: expected - predicted.
    ///
    /// This is the output-layer error gradient backprop starts from.
    pub fn error(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| b - a)
            .collect()
    }

    /// Largest |expected - predicted| over all outputs.
    pub fn max_abs_error(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (b - a).abs())
            .fold(0.0, f64::max)
    }
}
