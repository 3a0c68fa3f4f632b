//! Pixel-difference metrics and diff image rendering

use image::{Pixel, Rgba, RgbaImage};

/// Per-channel tolerance when counting differing pixels.
///
/// Absorbs small color deltas from anti-aliasing and PNG re-encoding.
pub const CHANNEL_TOLERANCE: u8 = 5;

/// Count of differing pixels between two equally sized images.
#[derive(Debug, Clone, Copy)]
pub struct PixelDiff {
    /// Pixels whose channel delta exceeds the tolerance
    pub differing: u64,

    /// Total pixels compared
    pub total: u64,
}

impl PixelDiff {
    /// Percentage of differing pixels (0.0 - 100.0).
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.differing as f64 / self.total as f64) * 100.0
    }
}

/// Count pixels that differ between two images of identical dimensions.
pub fn pixel_diff(a: &RgbaImage, b: &RgbaImage) -> PixelDiff {
    debug_assert_eq!(a.dimensions(), b.dimensions());

    let total = u64::from(a.width()) * u64::from(a.height());
    let differing = a
        .pixels()
        .zip(b.pixels())
        .filter(|(pa, pb)| pixels_differ(pa, pb))
        .count() as u64;

    PixelDiff { differing, total }
}

/// Render a diff image: differing pixels in solid red over a dimmed copy
/// of the capture, so regressions stand out at a glance.
pub fn render_diff(baseline: &RgbaImage, capture: &RgbaImage) -> RgbaImage {
    debug_assert_eq!(baseline.dimensions(), capture.dimensions());

    let (width, height) = capture.dimensions();
    let mut diff_img = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let pb = baseline.get_pixel(x, y);
            let pc = capture.get_pixel(x, y);

            if pixels_differ(pb, pc) {
                diff_img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            } else {
                let channels = pc.channels();
                diff_img.put_pixel(
                    x,
                    y,
                    Rgba([channels[0] / 2, channels[1] / 2, channels[2] / 2, 255]),
                );
            }
        }
    }

    diff_img
}

/// Whether two pixels differ beyond the per-channel tolerance.
fn pixels_differ(a: &Rgba<u8>, b: &Rgba<u8>) -> bool {
    a.channels()
        .iter()
        .zip(b.channels())
        .any(|(ca, cb)| (i16::from(*ca) - i16::from(*cb)).unsigned_abs() > u16::from(CHANNEL_TOLERANCE))
}
