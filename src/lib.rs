#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod calib;
pub mod canvas;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod record;
pub mod stereo;
pub mod types;

// Lower-level building blocks, public for tooling and tests.
pub mod edges;
pub mod refine;
pub mod viz;

// --- High-level re-exports -------------------------------------------------

pub use crate::calib::{CalibrationType, VanishingPoint};
pub use crate::canvas::{CanvasMapping, CanvasSize};
pub use crate::edges::{EdgeLikelihoodField, EdgeLikelihoodParams};
pub use crate::error::{CalibError, Result, Stage};
pub use crate::record::{
    stereo_twin_name, CalibrationRecord, ClassifiedCalibration, GuideSegments, PosedCalibration,
    RawCalibration, RefinedCalibration,
};
pub use crate::refine::{refine_calibration, CancelToken, RefineParams, RefinePolicy};
pub use crate::stereo::{propagate_calibration, CorrespondenceSet};
pub use crate::types::{Axis, CameraPose, PixelEdge, PixelPoint};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use vanishing_calib::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> vanishing_calib::Result<()> {
/// let record = read_record(Path::new("scene_left.json"))?;
/// let posed = RawCalibration::from_record(record)?
///     .classify()?
///     .pose(CanvasSize::default())?;
/// println!("camera at {:?}", posed.pose().position);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::io::{read_record, write_record};
    pub use crate::{
        Axis, CalibError, CalibrationRecord, CanvasMapping, CanvasSize, EdgeLikelihoodField,
        RawCalibration,
    };
}
