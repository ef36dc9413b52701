use thiserror::Error;

/// Errors raised while building, running, or persisting a network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Invalid topology, learning rate, or preset weights. Construction aborts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A vector handed to `fire`/`train` does not match the layer it feeds.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A dataset record could not be decoded.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

impl NetworkError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        NetworkError::Configuration(msg.into())
    }

    pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(NetworkError::DimensionMismatch { what, expected, actual })
        }
    }
}
