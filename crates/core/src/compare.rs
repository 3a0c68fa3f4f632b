//! Baseline comparison of screenshot captures
//!
//! The comparator owns a [`BaselineStore`] handle and a [`VisualConfig`].
//! A comparison never mutates an existing baseline: a missing baseline is
//! created from the capture, an existing one is only replaced through
//! [`Comparator::update_baseline`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::{validate_threshold, VisualConfig};
use crate::diff::{pixel_diff, render_diff};
use crate::error::{VisualError, VisualResult};
use crate::ssim::ssim;
use crate::store::{validate_name, BaselineStore};

/// Outcome of comparing a capture against its named baseline.
///
/// Produced fresh per call; the comparator persists nothing but baselines
/// and optional diff artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Logical baseline name
    pub name: String,

    /// Structural similarity score in [0.0, 1.0]
    pub similarity: f64,

    /// Acceptance threshold the score was judged against
    pub threshold: f64,

    /// Whether the similarity met or exceeded the threshold
    pub passed: bool,

    /// Whether this call created the baseline instead of comparing
    pub baseline_created: bool,

    /// Percentage of pixels differing beyond the per-channel tolerance
    pub diff_percent: f64,

    /// Path to the rendered diff image, if one was written
    pub diff_image_path: Option<PathBuf>,
}

/// Visual regression comparator.
pub struct Comparator {
    store: BaselineStore,
    config: VisualConfig,
}

impl Comparator {
    /// Create a comparator over an explicit baseline store.
    ///
    /// Fails if the configuration is out of range (threshold outside
    /// [0, 1], zero window size).
    pub fn new(store: BaselineStore, config: VisualConfig) -> VisualResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// The baseline store this comparator reads and writes.
    pub fn store(&self) -> &BaselineStore {
        &self.store
    }

    /// Compare capture bytes against the named baseline using the
    /// configured default threshold.
    pub fn compare(&self, name: &str, capture: &[u8]) -> VisualResult<ComparisonResult> {
        self.compare_with_threshold(name, capture, self.config.threshold)
    }

    /// Compare a capture read from `path` against the named baseline.
    pub fn compare_file(&self, name: &str, path: &Path) -> VisualResult<ComparisonResult> {
        let capture = std::fs::read(path)?;
        self.compare(name, &capture)
    }

    /// Compare capture bytes against the named baseline with an explicit
    /// threshold.
    ///
    /// The threshold is validated before any image decoding. A similarity
    /// below the threshold is reported via `passed = false`, never as an
    /// error. If no baseline exists for `name`, the capture becomes the
    /// baseline and the result reports `baseline_created = true`.
    pub fn compare_with_threshold(
        &self,
        name: &str,
        capture: &[u8],
        threshold: f64,
    ) -> VisualResult<ComparisonResult> {
        validate_threshold(threshold)?;
        validate_name(name)?;

        let Some(baseline_bytes) = self.store.load(name)? else {
            // First sighting of this name: the capture becomes the baseline.
            image::load_from_memory(capture)?;
            self.store.save(name, capture)?;
            info!("No baseline for '{}', created from capture", name);
            return Ok(ComparisonResult {
                name: name.to_string(),
                similarity: 1.0,
                threshold,
                passed: true,
                baseline_created: true,
                diff_percent: 0.0,
                diff_image_path: None,
            });
        };

        let capture_img = image::load_from_memory(capture)?;

        // Byte-identical inputs short-circuit to an exact 1.0.
        if sha256_hex(capture) == sha256_hex(&baseline_bytes) {
            debug!("Capture matches baseline '{}' exactly (same hash)", name);
            return Ok(ComparisonResult {
                name: name.to_string(),
                similarity: 1.0,
                threshold,
                passed: true,
                baseline_created: false,
                diff_percent: 0.0,
                diff_image_path: None,
            });
        }

        let baseline_img = image::load_from_memory(&baseline_bytes)?;

        let (bw, bh) = (baseline_img.width(), baseline_img.height());
        let (cw, ch) = (capture_img.width(), capture_img.height());
        if (bw, bh) != (cw, ch) {
            return Err(VisualError::DimensionMismatch {
                baseline_width: bw,
                baseline_height: bh,
                capture_width: cw,
                capture_height: ch,
            });
        }

        let similarity = ssim(
            &baseline_img.to_luma8(),
            &capture_img.to_luma8(),
            self.config.window_size,
        );

        let baseline_rgba = baseline_img.to_rgba8();
        let capture_rgba = capture_img.to_rgba8();
        let diff = pixel_diff(&baseline_rgba, &capture_rgba);

        let diff_image_path = if self.config.write_diff_images && diff.differing > 0 {
            Some(self.write_diff_image(name, &baseline_rgba, &capture_rgba)?)
        } else {
            None
        };

        let passed = similarity >= threshold;
        if passed {
            debug!(
                "'{}' passed: similarity {:.4} (threshold {:.2}), {:.2}% pixels differ",
                name,
                similarity,
                threshold,
                diff.percent()
            );
        } else {
            warn!(
                "Visual regression in '{}': similarity {:.4} below threshold {:.2}, {:.2}% pixels differ",
                name,
                similarity,
                threshold,
                diff.percent()
            );
        }

        Ok(ComparisonResult {
            name: name.to_string(),
            similarity,
            threshold,
            passed,
            baseline_created: false,
            diff_percent: diff.percent(),
            diff_image_path,
        })
    }

    /// Explicitly overwrite the stored baseline for `name` with `capture`.
    ///
    /// The capture must decode as an image; undecodable bytes never reach
    /// the store.
    pub fn update_baseline(&self, name: &str, capture: &[u8]) -> VisualResult<()> {
        validate_name(name)?;
        image::load_from_memory(capture)?;
        self.store.save(name, capture)?;
        info!("Baseline updated for '{}'", name);
        Ok(())
    }

    /// Overwrite the stored baseline for `name` with a capture read from
    /// `path`.
    pub fn update_baseline_from_file(&self, name: &str, path: &Path) -> VisualResult<()> {
        let capture = std::fs::read(path)?;
        self.update_baseline(name, &capture)
    }

    /// Delete previously rendered diff images.
    pub fn clean_diffs(&self) -> VisualResult<()> {
        if !self.config.diff_dir.exists() {
            return Ok(());
        }
        for entry in std::fs::read_dir(&self.config.diff_dir)? {
            let entry = entry?;
            std::fs::remove_file(entry.path())?;
        }
        Ok(())
    }

    fn write_diff_image(
        &self,
        name: &str,
        baseline: &image::RgbaImage,
        capture: &image::RgbaImage,
    ) -> VisualResult<PathBuf> {
        std::fs::create_dir_all(&self.config.diff_dir)?;
        let path = self.config.diff_dir.join(format!("{}-diff.png", name));
        render_diff(baseline, capture)
            .save(&path)
            .map_err(VisualError::Decode)?;
        debug!("Diff image written to {}", path.display());
        Ok(path)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
