use crate::edges::EdgeLikelihoodParams;
use serde::Deserialize;

/// Optional overrides for the edge-likelihood field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EdgeFieldConfig {
    pub canny_low: Option<f32>,
    pub canny_high: Option<f32>,
    pub blur_sigma: Option<f32>,
    /// Kernel half-width in units of sigma.
    pub blur_truncate: Option<f32>,
}

impl EdgeFieldConfig {
    pub fn resolve(&self) -> EdgeLikelihoodParams {
        let mut p = EdgeLikelihoodParams::default();
        if let Some(v) = self.canny_low {
            p.canny_low = v;
        }
        if let Some(v) = self.canny_high {
            p.canny_high = v;
        }
        if let Some(v) = self.blur_sigma {
            p.blur_sigma = v;
        }
        if let Some(v) = self.blur_truncate {
            p.blur_truncate = v;
        }
        p
    }
}
