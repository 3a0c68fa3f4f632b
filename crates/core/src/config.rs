//! Comparator configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{VisualError, VisualResult};

/// Default acceptance threshold: captures must score at least this
/// similarity against their baseline to pass.
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// Default SSIM window size in pixels.
pub const DEFAULT_WINDOW_SIZE: u32 = 8;

/// Configuration for visual comparison.
///
/// All fields have documented defaults; a partial TOML file fills in the
/// rest. The baseline directory is owned by an explicitly constructed
/// [`crate::store::BaselineStore`] handle rather than shared global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Directory containing baseline screenshots
    pub baseline_dir: PathBuf,

    /// Directory for generated diff images
    pub diff_dir: PathBuf,

    /// Acceptance threshold (0.0 - 1.0); similarity must meet or exceed it
    pub threshold: f64,

    /// SSIM window size in pixels (images are tiled into windows this size)
    pub window_size: u32,

    /// Whether to render a highlighted diff image when a comparison differs
    pub write_diff_images: bool,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            baseline_dir: PathBuf::from("test-results/baselines"),
            diff_dir: PathBuf::from("test-results/diffs"),
            threshold: DEFAULT_THRESHOLD,
            window_size: DEFAULT_WINDOW_SIZE,
            write_diff_images: true,
        }
    }
}

impl VisualConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> VisualResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges.
    pub fn validate(&self) -> VisualResult<()> {
        validate_threshold(self.threshold)?;
        if self.window_size == 0 {
            return Err(VisualError::InvalidConfig(
                "window_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check that a threshold lies within [0.0, 1.0].
pub fn validate_threshold(value: f64) -> VisualResult<()> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(VisualError::InvalidThreshold { value });
    }
    Ok(())
}
