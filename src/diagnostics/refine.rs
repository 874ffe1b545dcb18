use crate::refine::{EdgeRefinement, RefinePolicy};
use crate::types::{Axis, PixelEdge};
use serde::Serialize;

/// Per-edge refinement outcome in native pixel coordinates.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRefineSample {
    pub axis: Axis,
    /// Edge index within its axis.
    pub index: usize,
    pub input: PixelEdge,
    #[serde(flatten)]
    pub result: EdgeRefinement,
}

/// Summary of one refinement pass over a calibration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineReport {
    pub radius: u32,
    pub policy: RefinePolicy,
    pub elapsed_ms: f64,
    pub replaced: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_score: Option<f64>,
    pub samples: Vec<EdgeRefineSample>,
}

impl RefineReport {
    pub fn new(
        radius: u32,
        policy: RefinePolicy,
        samples: Vec<EdgeRefineSample>,
        elapsed_ms: f64,
    ) -> Self {
        let replaced = samples.iter().filter(|s| s.result.replaced).count();
        let mean_score = (!samples.is_empty()).then(|| {
            samples.iter().map(|s| s.result.score).sum::<f64>() / samples.len() as f64
        });
        Self {
            radius,
            policy,
            elapsed_ms,
            replaced,
            mean_score,
            samples,
        }
    }
}
