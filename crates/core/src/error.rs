//! Error types for visual comparison

use thiserror::Error;

/// Result type alias using [`VisualError`]
pub type VisualResult<T> = std::result::Result<T, VisualError>;

/// Errors surfaced by the comparator and baseline store.
///
/// A similarity score below the acceptance threshold is NOT an error;
/// it is reported through `ComparisonResult::passed`.
#[derive(Error, Debug)]
pub enum VisualError {
    #[error("Invalid threshold {value}: must be within 0.0..=1.0")]
    InvalidThreshold { value: f64 },

    #[error("Invalid baseline name '{0}': must be non-empty, using only alphanumerics, '-' and '_'")]
    InvalidName(String),

    #[error("Dimension mismatch: baseline is {baseline_width}x{baseline_height}, capture is {capture_width}x{capture_height}")]
    DimensionMismatch {
        baseline_width: u32,
        baseline_height: u32,
        capture_width: u32,
        capture_height: u32,
    },

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
