use super::{CalibrationRecord, GuideSegments};
use crate::calib::{self, CalibrationType, VanishingPoint};
use crate::canvas::CanvasSize;
use crate::diagnostics::RefineReport;
use crate::error::Result;
use crate::types::CameraPose;
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// Identity of a record, carried unchanged through every stage.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordMeta {
    pub name: String,
    pub extension: String,
    /// Uninterpreted keys of the source file.
    pub extra: BTreeMap<String, Value>,
}

impl RecordMeta {
    fn into_record(self, segments: GuideSegments) -> CalibrationRecord {
        CalibrationRecord {
            name: self.name,
            extension: self.extension,
            guide_points: segments.into_axes(),
            vanishing_points: None,
            camera_base: None,
            optical_center: None,
            camera_position: None,
            extra: self.extra,
        }
    }
}

/// Validated guide segments in canvas coordinates, nothing derived yet.
#[derive(Clone, Debug, PartialEq)]
pub struct RawCalibration {
    meta: RecordMeta,
    segments: GuideSegments,
}

impl RawCalibration {
    pub fn new(meta: RecordMeta, segments: GuideSegments) -> Self {
        Self { meta, segments }
    }

    /// Validate a persisted record. Previously derived pose fields are
    /// dropped; they are recomputed from the segments.
    pub fn from_record(record: CalibrationRecord) -> Result<Self> {
        let segments = GuideSegments::new(record.guide_points)?;
        Ok(Self {
            meta: RecordMeta {
                name: record.name,
                extension: record.extension,
                extra: record.extra,
            },
            segments,
        })
    }

    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    pub fn segments(&self) -> &GuideSegments {
        &self.segments
    }

    pub fn with_segments(self, segments: GuideSegments) -> Self {
        Self {
            meta: self.meta,
            segments,
        }
    }

    pub fn classify(self) -> Result<ClassifiedCalibration> {
        let calibration_type = calib::classify(&self.segments)?;
        debug!("{}: calibration type {:?}", self.meta.name, calibration_type);
        Ok(ClassifiedCalibration {
            raw: self,
            calibration_type,
        })
    }

    pub fn into_record(self) -> CalibrationRecord {
        self.meta.into_record(self.segments)
    }
}

/// Segments plus the calibration mode they allow.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedCalibration {
    raw: RawCalibration,
    calibration_type: CalibrationType,
}

impl ClassifiedCalibration {
    pub fn calibration_type(&self) -> CalibrationType {
        self.calibration_type
    }

    pub fn raw(&self) -> &RawCalibration {
        &self.raw
    }

    /// Vanishing points and camera pose. `canvas` supplies the optical centre
    /// assumed in centered mode.
    pub fn pose(self, canvas: CanvasSize) -> Result<PosedCalibration> {
        let vanishing_points = calib::vanishing_points(&self.raw.segments, self.calibration_type)?;
        let pose = calib::solve_pose(&vanishing_points, self.calibration_type, canvas)?;
        Ok(PosedCalibration {
            classified: self,
            vanishing_points,
            pose,
        })
    }
}

/// Fully calibrated record, ready to persist.
#[derive(Clone, Debug, PartialEq)]
pub struct PosedCalibration {
    classified: ClassifiedCalibration,
    vanishing_points: Vec<VanishingPoint>,
    pose: CameraPose,
}

impl PosedCalibration {
    pub fn meta(&self) -> &RecordMeta {
        &self.classified.raw.meta
    }

    pub fn calibration_type(&self) -> CalibrationType {
        self.classified.calibration_type
    }

    /// Measured vanishing points only; a synthesized one is not included.
    pub fn vanishing_points(&self) -> &[VanishingPoint] {
        &self.vanishing_points
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn segments(&self) -> &GuideSegments {
        &self.classified.raw.segments
    }

    pub fn into_record(self) -> CalibrationRecord {
        let PosedCalibration {
            classified,
            vanishing_points,
            pose,
        } = self;
        let mut record = classified.raw.into_record();
        record.vanishing_points = Some(
            vanishing_points
                .iter()
                .map(|vp| [vp.pos.x, vp.pos.y])
                .collect(),
        );
        record.camera_base = Some(pose.flattened_basis());
        record.optical_center = Some([pose.optical_center.x, pose.optical_center.y]);
        record.camera_position = Some([pose.position.x, pose.position.y, pose.position.z]);
        record
    }
}

/// Segments snapped onto image edges, with per-edge scores.
#[derive(Clone, Debug)]
pub struct RefinedCalibration {
    raw: RawCalibration,
    report: RefineReport,
}

impl RefinedCalibration {
    pub fn new(raw: RawCalibration, report: RefineReport) -> Self {
        Self { raw, report }
    }

    pub fn report(&self) -> &RefineReport {
        &self.report
    }

    pub fn segments(&self) -> &GuideSegments {
        &self.raw.segments
    }

    pub fn into_raw(self) -> RawCalibration {
        self.raw
    }

    pub fn classify(self) -> Result<ClassifiedCalibration> {
        self.raw.classify()
    }

    pub fn into_record(self) -> CalibrationRecord {
        self.raw.into_record()
    }
}
