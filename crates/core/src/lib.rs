//! VisReg Core - Visual Regression Comparator
//!
//! This crate compares freshly captured screenshots against named baseline
//! images and reports whether they are structurally similar enough to pass:
//! - Baselines live in a filesystem-backed store, keyed by logical name
//! - First comparison for a name creates its baseline; only an explicit
//!   update ever overwrites one
//! - Similarity is windowed SSIM over grayscale, tolerant of anti-aliasing
//!   and sub-pixel rendering noise
//! - A score below the threshold is a reportable outcome, not an error
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     Comparator                            │
//! │   compare(name, capture, threshold) -> ComparisonResult  │
//! │   update_baseline(name, capture)                          │
//! ├──────────────┬──────────────┬─────────────────────────────┤
//! │ BaselineStore│   ssim()     │  pixel_diff()/render_diff() │
//! │ name -> PNG  │ windowed     │  diff metrics + artifact    │
//! │ on disk      │ similarity   │  rendering                  │
//! └──────────────┴──────────────┴─────────────────────────────┘
//! ```

pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod ssim;
pub mod store;

pub use compare::{Comparator, ComparisonResult};
pub use config::{VisualConfig, DEFAULT_THRESHOLD, DEFAULT_WINDOW_SIZE};
pub use error::{VisualError, VisualResult};
pub use store::BaselineStore;
