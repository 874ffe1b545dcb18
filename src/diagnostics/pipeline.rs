use crate::calib::{CalibrationType, VanishingPoint};
use crate::canvas::CanvasMapping;
use crate::diagnostics::{RefineReport, TimingBreakdown};
use crate::record::PosedCalibration;
use crate::types::CameraPose;
use serde::Serialize;

/// Everything computed for one image of the pair.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub name: String,
    pub mapping: CanvasMapping,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refine: Option<RefineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagate: Option<PropagateSummary>,
    pub calibration_type: CalibrationType,
    pub vanishing_points: Vec<VanishingPoint>,
    pub pose: CameraPose,
}

impl ImageReport {
    pub fn new(name: impl Into<String>, mapping: CanvasMapping, posed: &PosedCalibration) -> Self {
        Self {
            name: name.into(),
            mapping,
            refine: None,
            propagate: None,
            calibration_type: posed.calibration_type(),
            vanishing_points: posed.vanishing_points().to_vec(),
            pose: posed.pose().clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagateSummary {
    pub correspondences: usize,
    pub neighbors: usize,
    pub edges: usize,
}

/// Report written by the pipeline binary.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub images: Vec<ImageReport>,
    pub timings: TimingBreakdown,
}
