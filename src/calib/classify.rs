use crate::error::{CalibError, Result, Stage};
use crate::record::GuideSegments;
use crate::types::Axis;
use serde::Serialize;

/// Which calibration mode the guide segments allow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CalibrationType {
    /// All three axes carry guide segments.
    Normal,
    /// One axis is missing; the optical centre is assumed at the canvas centre.
    Centered { missing: Axis },
}

impl CalibrationType {
    pub fn missing_axis(&self) -> Option<Axis> {
        match self {
            CalibrationType::Normal => None,
            CalibrationType::Centered { missing } => Some(*missing),
        }
    }

    /// Axes whose vanishing points are measured, in ascending order.
    pub fn known_axes(&self) -> Vec<Axis> {
        Axis::ALL
            .into_iter()
            .filter(|&a| Some(a) != self.missing_axis())
            .collect()
    }
}

/// Decide the calibration mode from which axes carry guide points.
///
/// Axes are scanned cyclically: for `dim` in 0..3 the first `dim` whose axis
/// is empty while `dim+1` and `dim+2` are not yields `Centered`. Two or more
/// empty axes cannot be calibrated and are rejected.
pub fn classify(segments: &GuideSegments) -> Result<CalibrationType> {
    let empty: Vec<Axis> = Axis::ALL
        .into_iter()
        .filter(|&a| segments.is_empty_axis(a))
        .collect();
    if empty.len() >= 2 {
        return Err(CalibError::validation(
            Stage::Classify,
            None,
            format!("{} axes have no guide segments, at most one may be empty", empty.len()),
        ));
    }

    for dim in 0..3 {
        let axis = |offset: usize| Axis::ALL[(dim + offset) % 3];
        if segments.is_empty_axis(axis(0))
            && !segments.is_empty_axis(axis(1))
            && !segments.is_empty_axis(axis(2))
        {
            return Ok(CalibrationType::Centered { missing: axis(0) });
        }
    }
    Ok(CalibrationType::Normal)
}
