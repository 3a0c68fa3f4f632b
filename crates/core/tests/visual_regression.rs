//! End-to-end comparator behavior against a real on-disk baseline store.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tempfile::TempDir;

use visreg_core::{BaselineStore, Comparator, VisualConfig, VisualError};

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// A deterministic screenshot-like image with visible structure.
fn screenshot(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        // Header band, sidebar and a body gradient
        if y < height / 8 {
            Rgba([40, 44, 52, 255])
        } else if x < width / 6 {
            Rgba([30, 30, 30, 255])
        } else {
            Rgba([
                (200 + (x % 20)) as u8,
                (200 + (y % 20)) as u8,
                220,
                255,
            ])
        }
    })
}

fn comparator_in(tmp: &TempDir) -> Comparator {
    let store = BaselineStore::open(tmp.path().join("baselines")).unwrap();
    let config = VisualConfig {
        diff_dir: tmp.path().join("diffs"),
        ..Default::default()
    };
    Comparator::new(store, config).unwrap()
}

#[test]
fn self_comparison_scores_exactly_one() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);
    let capture = png_bytes(&screenshot(120, 80));

    let created = cmp.compare("homepage_layout", &capture).unwrap();
    assert!(created.baseline_created);

    // Byte-identical re-comparison, even with the strictest threshold
    let result = cmp
        .compare_with_threshold("homepage_layout", &capture, 1.0)
        .unwrap();
    assert!(!result.baseline_created);
    assert_eq!(result.similarity, 1.0);
    assert!(result.passed);
    assert_eq!(result.diff_percent, 0.0);
}

#[test]
fn first_comparison_always_creates_baseline() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);

    // Near-black capture would fail any comparison, but the first call
    // for a name never compares
    let capture = png_bytes(&RgbaImage::from_pixel(64, 64, Rgba([1, 1, 1, 255])));
    let result = cmp
        .compare_with_threshold("brand_new_page", &capture, 1.0)
        .unwrap();

    assert!(result.baseline_created);
    assert!(result.passed);
    assert_eq!(result.similarity, 1.0);
    assert_eq!(cmp.store().list().unwrap(), vec!["brand_new_page"]);
}

#[test]
fn comparison_is_deterministic_and_read_only() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);

    cmp.compare("dashboard", &png_bytes(&screenshot(100, 100)))
        .unwrap();

    // A slightly different capture, compared repeatedly
    let mut altered = screenshot(100, 100);
    for x in 20..40 {
        for y in 20..40 {
            altered.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
    }
    let capture = png_bytes(&altered);

    let first = cmp.compare("dashboard", &capture).unwrap();
    let second = cmp.compare("dashboard", &capture).unwrap();
    let third = cmp.compare("dashboard", &capture).unwrap();

    assert_eq!(first.similarity.to_bits(), second.similarity.to_bits());
    assert_eq!(second.similarity.to_bits(), third.similarity.to_bits());
    assert!(first.similarity < 1.0);
}

#[test]
fn mismatched_dimensions_fail_instead_of_scoring_low() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);

    cmp.compare("homepage_layout", &png_bytes(&screenshot(120, 80)))
        .unwrap();

    // Slightly cropped capture
    let cropped = png_bytes(&screenshot(118, 80));
    match cmp.compare("homepage_layout", &cropped) {
        Err(VisualError::DimensionMismatch {
            baseline_width,
            baseline_height,
            capture_width,
            capture_height,
        }) => {
            assert_eq!((baseline_width, baseline_height), (120, 80));
            assert_eq!((capture_width, capture_height), (118, 80));
        }
        other => panic!("expected DimensionMismatch, got {:?}", other),
    }
}

#[test]
fn update_baseline_then_compare_passes() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);

    cmp.compare("settings", &png_bytes(&screenshot(90, 60)))
        .unwrap();

    // Intentional redesign: update the baseline, then re-compare
    let redesigned = png_bytes(&RgbaImage::from_pixel(90, 60, Rgba([250, 250, 250, 255])));
    cmp.update_baseline("settings", &redesigned).unwrap();

    let result = cmp
        .compare_with_threshold("settings", &redesigned, 1.0)
        .unwrap();
    assert_eq!(result.similarity, 1.0);
    assert!(result.passed);
    assert!(!result.baseline_created);
}

#[test]
fn threshold_validated_before_any_decoding() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);

    let result = cmp.compare_with_threshold("page", b"\x00\x01garbage", 1.2);
    match result {
        Err(VisualError::InvalidThreshold { value }) => assert_eq!(value, 1.2),
        other => panic!("expected InvalidThreshold, got {:?}", other),
    }
    // The garbage capture was never persisted as a baseline
    assert!(cmp.store().list().unwrap().is_empty());
}

#[test]
fn below_threshold_is_reported_not_raised() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);

    let black = png_bytes(&RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255])));
    let white = png_bytes(&RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255])));

    cmp.compare("contrast", &black).unwrap();
    let result = cmp.compare("contrast", &white).unwrap();

    assert!(!result.passed);
    assert!(result.similarity < 0.95);
    assert!(result.diff_percent > 99.0);
    // A diff artifact is rendered for the failing comparison
    let diff_path = result.diff_image_path.expect("diff image path");
    assert!(diff_path.exists());
}

#[test]
fn anti_aliasing_noise_still_passes_default_threshold() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);

    let base = screenshot(160, 120);
    cmp.compare("article", &png_bytes(&base)).unwrap();

    // Perturb scattered pixels by one or two levels, as sub-pixel
    // rendering differences between runs would
    let mut jittered = base.clone();
    for i in 0..60u32 {
        let x = (i * 37) % 160;
        let y = (i * 23) % 120;
        let p = jittered.get_pixel_mut(x, y);
        p.0[0] = p.0[0].saturating_add(3);
        p.0[1] = p.0[1].saturating_add(3);
        p.0[2] = p.0[2].saturating_add(3);
    }

    let result = cmp.compare("article", &png_bytes(&jittered)).unwrap();
    assert!(
        result.passed,
        "similarity {} should pass default threshold",
        result.similarity
    );
    assert!(result.similarity < 1.0);
}

#[test]
fn comparison_result_serializes_to_json() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);
    let capture = png_bytes(&screenshot(50, 50));

    let result = cmp.compare("homepage_layout", &capture).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"homepage_layout\""));
    assert!(json.contains("\"baseline_created\":true"));
}

#[test]
fn compare_file_reads_capture_from_disk() {
    let tmp = TempDir::new().unwrap();
    let cmp = comparator_in(&tmp);

    let capture_path = tmp.path().join("capture.png");
    std::fs::write(&capture_path, png_bytes(&screenshot(40, 40))).unwrap();

    let result = cmp.compare_file("from_disk", &capture_path).unwrap();
    assert!(result.baseline_created);

    let again = cmp.compare_file("from_disk", &capture_path).unwrap();
    assert_eq!(again.similarity, 1.0);
}
