//! Structural similarity (SSIM) scoring over grayscale images
//!
//! Screenshot pairs from non-deterministic rendering differ by
//! anti-aliasing and sub-pixel placement, so raw pixel equality and
//! mean-squared error are too brittle as a pass/fail basis. SSIM compares
//! windowed luminance, contrast and structure instead, which tolerates
//! those rendering artifacts while still catching layout regressions.

use image::GrayImage;

/// Stabilization constant C1 = (0.01 * 255)^2
const C1: f64 = 6.5025;

/// Stabilization constant C2 = (0.03 * 255)^2
const C2: f64 = 58.5225;

/// Compute the mean SSIM score between two grayscale images.
///
/// The images are tiled into `window x window` blocks (partial blocks at
/// the right and bottom edges are included); the final score is the mean
/// block score, clamped to [0.0, 1.0].
///
/// Both images must have identical, non-zero dimensions and `window`
/// must be at least 1; callers validate this before invoking.
/// Byte-identical inputs score exactly 1.0: every block evaluates the
/// same expression for numerator and denominator.
pub fn ssim(a: &GrayImage, b: &GrayImage, window: u32) -> f64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    debug_assert!(window >= 1);

    let (width, height) = a.dimensions();
    let mut total = 0.0f64;
    let mut blocks = 0u64;

    let mut y0 = 0u32;
    while y0 < height {
        let y1 = (y0 + window).min(height);
        let mut x0 = 0u32;
        while x0 < width {
            let x1 = (x0 + window).min(width);
            total += block_score(a, b, x0, x1, y0, y1);
            blocks += 1;
            x0 = x1;
        }
        y0 = y1;
    }

    (total / blocks as f64).clamp(0.0, 1.0)
}

/// SSIM score for a single block: (2 μa μb + C1)(2 σab + C2) /
/// ((μa² + μb² + C1)(σa² + σb² + C2)), using population statistics.
fn block_score(a: &GrayImage, b: &GrayImage, x0: u32, x1: u32, y0: u32, y1: u32) -> f64 {
    let mut sum_a = 0.0f64;
    let mut sum_b = 0.0f64;
    let mut sum_aa = 0.0f64;
    let mut sum_bb = 0.0f64;
    let mut sum_ab = 0.0f64;

    for y in y0..y1 {
        for x in x0..x1 {
            let pa = f64::from(a.get_pixel(x, y).0[0]);
            let pb = f64::from(b.get_pixel(x, y).0[0]);
            sum_a += pa;
            sum_b += pb;
            sum_aa += pa * pa;
            sum_bb += pb * pb;
            sum_ab += pa * pb;
        }
    }

    let n = f64::from((x1 - x0) * (y1 - y0));
    let mu_a = sum_a / n;
    let mu_b = sum_b / n;
    let var_a = sum_aa / n - mu_a * mu_a;
    let var_b = sum_bb / n - mu_b * mu_b;
    let cov = sum_ab / n - mu_a * mu_b;

    let numerator = (2.0 * mu_a * mu_b + C1) * (2.0 * cov + C2);
    let denominator = (mu_a * mu_a + mu_b * mu_b + C1) * (var_a + var_b + C2);

    numerator / denominator
}
