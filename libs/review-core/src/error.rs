//! Error types for review-core.

use thiserror::Error;

/// Result type alias using ValidationError.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Caller mistakes rejected before any state is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("quality {0} is outside 0..=5")]
    QualityOutOfRange(u8),

    #[error("expected a quality 0-5 or again/hard/good/easy, got {0:?}")]
    UnrecognizedQuality(String),

    #[error("at least one expected answer is required")]
    NoCandidates,

    #[error("threshold {0} is outside 0..=100")]
    InvalidThreshold(f64),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}
