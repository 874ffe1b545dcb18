//! Non-maximum suppression along the quantized gradient direction.
//!
//! The gradient angle is binned to 0°, 45°, 90° or 135° and each pixel is
//! compared with its two neighbours across the edge. On the horizontal and
//! vertical bins the comparison is strict towards the previous neighbour and
//! non-strict towards the next one, so a two-pixel plateau (a sharp step under
//! a 3×3 kernel) keeps exactly one pixel. The outermost 1-pixel frame is
//! always suppressed.
use crate::edges::grad::Grad;
use crate::image::{ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.414_213_57;

/// Gradient magnitude with every non-maximum pixel, and every pixel at or below
/// `floor`, set to zero.
pub fn suppress_non_maxima(grad: &Grad, floor: f32) -> ImageF32 {
    let w = grad.mag.w;
    let h = grad.mag.h;
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let out_row = out.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= floor {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0) == (gy >= 0.0);

            let keep = if abs_gy <= abs_gx * TAN_22_5_DEG {
                mag > mag_row[x - 1] && mag >= mag_row[x + 1]
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                mag > mag_prev[x] && mag >= mag_next[x]
            } else if same_sign {
                mag > mag_prev[x - 1] && mag > mag_next[x + 1]
            } else {
                mag > mag_prev[x + 1] && mag > mag_next[x - 1]
            };

            if keep {
                out_row[x] = mag;
            }
        }
    }

    out
}
