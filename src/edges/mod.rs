//! Edge detection and the edge-likelihood field used by the refiner.
//!
//! - Sobel gradients with L1 magnitude and replicated borders.
//! - Canny-style non-maximum suppression and hysteresis.
//! - Separable Gaussian blur with mirror-reflect borders.
//! - [`EdgeLikelihoodField`]: the blurred Canny mask, values in `[0, 1]`.

pub mod blur;
pub mod canny;
pub mod grad;
pub mod likelihood;
pub mod nms;

pub use blur::{separable_blur, GaussianKernel, SeparableFilter};
pub use canny::{canny, CannyThresholds};
pub use grad::{sobel_gradients, Grad};
pub use likelihood::{EdgeLikelihoodField, EdgeLikelihoodParams};
pub use nms::suppress_non_maxima;
