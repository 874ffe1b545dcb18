//! Edge-likelihood field: Canny mask blurred into a soft `[0, 1]` score.
use super::blur::{separable_blur, GaussianKernel};
use super::canny::{canny, CannyThresholds};
use crate::error::{CalibError, Result, Stage};
use crate::image::{ImageF32, ImageU8, ImageView};
use log::debug;
use std::time::Instant;

/// Parameters for [`EdgeLikelihoodField::build`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeLikelihoodParams {
    pub canny_low: f32,
    pub canny_high: f32,
    pub blur_sigma: f32,
    /// Kernel half-width in units of sigma.
    pub blur_truncate: f32,
}

impl Default for EdgeLikelihoodParams {
    fn default() -> Self {
        // A 5-pixel kernel at sigma 1: truncate = ((5 - 1) / 2 - 0.5) / 1.
        Self {
            canny_low: 30.0,
            canny_high: 150.0,
            blur_sigma: 1.0,
            blur_truncate: 1.5,
        }
    }
}

/// Per-pixel edge likelihood in `[0, 1]`, same extent as the source image.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLikelihoodField {
    values: ImageF32,
}

impl EdgeLikelihoodField {
    /// Detect edges in `gray` and blur the binary mask.
    pub fn build(gray: &ImageU8<'_>, params: &EdgeLikelihoodParams) -> Result<Self> {
        if gray.w == 0 || gray.h == 0 {
            return Err(CalibError::validation(
                Stage::EdgeField,
                None,
                "image has no pixels",
            ));
        }
        let start = Instant::now();
        let mask = canny(
            gray,
            CannyThresholds {
                low: params.canny_low,
                high: params.canny_high,
            },
        );
        let kernel = GaussianKernel::new(params.blur_sigma, params.blur_truncate);
        let mut values = separable_blur(&mask, &kernel);
        for v in &mut values.data {
            *v = v.clamp(0.0, 1.0);
        }
        debug!(
            "edge field {}x{}: {} edge pixels, {:.2} ms",
            gray.w,
            gray.h,
            mask.data.iter().filter(|&&v| v > 0.0).count(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(Self { values })
    }

    /// Wrap precomputed likelihoods; values must lie in `[0, 1]`.
    pub fn from_values(values: ImageF32) -> Result<Self> {
        if values.data.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(CalibError::validation(
                Stage::EdgeField,
                None,
                "likelihood values must lie in [0, 1]",
            ));
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.values.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.values.h
    }

    #[inline]
    pub fn contains(&self, p: [i32; 2]) -> bool {
        self.values.contains(p[0], p[1])
    }

    /// Likelihood at `p`, `None` outside the field.
    #[inline]
    pub fn at(&self, p: [i32; 2]) -> Option<f32> {
        self.values.sample(p[0], p[1])
    }

    pub fn values(&self) -> &ImageF32 {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;

    fn square(size: usize) -> GrayImageU8 {
        let data = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (8..24).contains(&x) && (8..24).contains(&y) {
                    230
                } else {
                    15
                }
            })
            .collect();
        GrayImageU8::new(size, size, data).expect("buffer size")
    }

    #[test]
    fn field_is_bounded_and_peaks_on_edges() {
        let img = square(32);
        let field =
            EdgeLikelihoodField::build(&img.as_view(), &EdgeLikelihoodParams::default()).expect("field");
        assert_eq!((field.width(), field.height()), (32, 32));
        let (lo, hi) = field.values().value_range().expect("non-empty");
        assert!(lo >= 0.0 && hi <= 1.0);
        // Left side of the square: the kept column is x = 7.
        let on_edge = field.at([7, 16]).expect("inside");
        let off_edge = field.at([2, 16]).expect("inside");
        assert!(on_edge > 0.3);
        assert_eq!(off_edge, 0.0);
        assert_eq!(field.at([32, 0]), None);
    }

    #[test]
    fn build_is_deterministic() {
        let img = square(32);
        let params = EdgeLikelihoodParams::default();
        let a = EdgeLikelihoodField::build(&img.as_view(), &params).expect("a");
        let b = EdgeLikelihoodField::build(&img.as_view(), &params).expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let values = ImageF32::from_fn(2, 2, |x, _| x as f32 * 2.0);
        assert!(EdgeLikelihoodField::from_values(values).is_err());
    }
}
