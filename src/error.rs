//! Error types for the voc-eval library.

use thiserror::Error;

/// Result type for voc-eval operations.
pub type Result<T> = std::result::Result<T, VocEvalError>;

/// Error types that can occur during detection evaluation.
#[derive(Error, Debug)]
pub enum VocEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Bounding box with non-finite coordinates or non-positive width/height.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Confidence score outside [0, 1] or not finite.
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    /// IoU or confidence threshold outside [0, 1].
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Configuration value that cannot be used.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Two sequences that must be parallel have different lengths.
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    /// Recall requested against a total ground-truth count of zero.
    #[error("Zero denominator: {0}")]
    ZeroDenominator(String),

    /// Number of per-image outcomes differs from the declared image count.
    #[error("Outcome count mismatch: declared {declared} images, got {actual} outcomes")]
    OutcomeCountMismatch { declared: usize, actual: usize },
}
