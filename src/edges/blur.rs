//! Separable Gaussian smoothing with mirror-reflect borders.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// A separable 1D filter applied along rows, then columns.
pub trait SeparableFilter {
    /// Taps in left-to-right order; the centre tap sits at `taps().len() / 2`.
    fn taps(&self) -> &[f32];
}

/// Sampled, normalised Gaussian.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<f32>,
}

impl GaussianKernel {
    /// Kernel of radius `floor(truncate·sigma + 0.5)` with weights
    /// `exp(-x² / 2σ²)` normalised to sum one. A non-positive sigma yields the
    /// identity kernel.
    pub fn new(sigma: f32, truncate: f32) -> Self {
        if !(sigma > 0.0) {
            return Self { taps: vec![1.0] };
        }
        let radius = (truncate * sigma + 0.5).floor().max(0.0) as i32;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f32> = (-radius..=radius)
            .map(|x| (-(x * x) as f32 / denom).exp())
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps }
    }

    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Mirror index into `0..n` for the `d c b a | a b c d` border convention.
#[inline]
fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let mut m = i.rem_euclid(period);
    if m >= n {
        m = period - 1 - m;
    }
    m as usize
}

/// Convolve `src` with `filter` horizontally then vertically.
pub fn separable_blur<F: SeparableFilter>(src: &ImageF32, filter: &F) -> ImageF32 {
    let taps = filter.taps();
    let (w, h) = (src.w, src.h);
    if w == 0 || h == 0 || taps.is_empty() {
        return src.clone();
    }
    let r = (taps.len() / 2) as isize;

    let mut tmp = ImageF32::new(w, h);
    for y in 0..h {
        let row = src.row(y);
        let out = tmp.row_mut(y);
        for (x, o) in out.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                acc += t * row[reflect_index(x as isize + k as isize - r, w)];
            }
            *o = acc;
        }
    }

    let mut dst = ImageF32::new(w, h);
    for y in 0..h {
        let out = dst.row_mut(y);
        for (k, &t) in taps.iter().enumerate() {
            let row = tmp.row(reflect_index(y as isize + k as isize - r, h));
            for (o, &v) in out.iter_mut().zip(row) {
                *o += t * v;
            }
        }
    }
    dst
}
