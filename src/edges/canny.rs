//! Canny edge detector on 8-bit grayscale input.
//!
//! Sobel gradients (L1 magnitude), 4-direction non-maximum suppression, then a
//! double threshold with hysteresis: responses above `high` seed edges and
//! responses above `low` are kept when 8-connected to a seed.
use super::grad::sobel_gradients;
use super::nms::suppress_non_maxima;
use crate::image::{ImageF32, ImageU8};

/// Hysteresis thresholds on the L1 Sobel magnitude (intensity scale `[0, 255]`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CannyThresholds {
    pub low: f32,
    pub high: f32,
}

impl Default for CannyThresholds {
    fn default() -> Self {
        Self {
            low: 30.0,
            high: 150.0,
        }
    }
}

/// Binary edge mask with values `0.0` or `1.0`.
pub fn canny(gray: &ImageU8<'_>, thresholds: CannyThresholds) -> ImageF32 {
    let (low, high) = if thresholds.low <= thresholds.high {
        (thresholds.low, thresholds.high)
    } else {
        (thresholds.high, thresholds.low)
    };
    let grad = sobel_gradients(&gray.to_f32());
    let candidates = suppress_non_maxima(&grad, low);
    hysteresis(&candidates, high)
}

/// Flood strong pixels (`> high`) through 8-connected non-zero candidates.
fn hysteresis(candidates: &ImageF32, high: f32) -> ImageF32 {
    let (w, h) = (candidates.w, candidates.h);
    let mut mask = ImageF32::new(w, h);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if candidates.get(x, y) > high && mask.get(x, y) == 0.0 {
                mask.set(x, y, 1.0);
                stack.push((x, y));
            }
            while let Some((cx, cy)) = stack.pop() {
                for ny in cy.saturating_sub(1)..=(cy + 1).min(h - 1) {
                    for nx in cx.saturating_sub(1)..=(cx + 1).min(w - 1) {
                        if mask.get(nx, ny) == 0.0 && candidates.get(nx, ny) > 0.0 {
                            mask.set(nx, ny, 1.0);
                            stack.push((nx, ny));
                        }
                    }
                }
            }
        }
    }
    mask
}
