//! Persisted calibration record and its staged in-memory forms.
//!
//! The JSON record written by the marking tool grows as stages run: guide
//! points first, then vanishing points and camera pose. In memory that record
//! is split into stage types ([`RawCalibration`] → [`ClassifiedCalibration`]
//! → [`PosedCalibration`], plus [`RefinedCalibration`] for refined segments)
//! so a stage can only be invoked on the output of its predecessor.
//!
//! Key names follow the files produced by the marking tool (`nomeImagem`,
//! `pontosguia`, ...); English aliases are accepted when reading.

mod naming;
mod segments;
mod stages;

pub use naming::stereo_twin_name;
pub use segments::GuideSegments;
pub use stages::{
    ClassifiedCalibration, PosedCalibration, RawCalibration, RecordMeta, RefinedCalibration,
};

use crate::error::Result;
use crate::types::PixelPoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// On-disk calibration record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    #[serde(rename = "nomeImagem", alias = "name")]
    pub name: String,
    #[serde(rename = "extensao", alias = "extension")]
    pub extension: String,
    /// Canvas-space guide points for the X, Y and Z axes.
    #[serde(rename = "pontosguia", alias = "guide_points")]
    pub guide_points: [Vec<PixelPoint>; 3],
    #[serde(
        rename = "pontosfuga",
        alias = "vanishing_points",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vanishing_points: Option<Vec<[f64; 2]>>,
    #[serde(
        rename = "base",
        alias = "camera_base",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub camera_base: Option<[f64; 9]>,
    #[serde(
        rename = "centrooptico",
        alias = "optical_center",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub optical_center: Option<[f64; 2]>,
    #[serde(
        rename = "camera",
        alias = "camera_position",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub camera_position: Option<[f64; 3]>,
    /// Keys this crate does not interpret, kept so a rewrite does not lose them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CalibrationRecord {
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        guide_points: [Vec<PixelPoint>; 3],
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            guide_points,
            vanishing_points: None,
            camera_base: None,
            optical_center: None,
            camera_position: None,
            extra: BTreeMap::new(),
        }
    }

    /// `name.extension`, the image file this record describes.
    pub fn image_file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    pub fn is_posed(&self) -> bool {
        self.camera_base.is_some() && self.camera_position.is_some()
    }

    /// Drop every field derived from the guide points.
    pub fn clear_pose(&mut self) {
        self.vanishing_points = None;
        self.camera_base = None;
        self.optical_center = None;
        self.camera_position = None;
    }

    /// Independent copy describing the other image of a stereo pair.
    ///
    /// `naming` maps this record's name to the twin's (see
    /// [`stereo_twin_name`]). The copy shares nothing with `self`.
    pub fn derive_twin<F>(&self, naming: F) -> Result<CalibrationRecord>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let mut twin = self.clone();
        twin.name = naming(&self.name)?;
        Ok(twin)
    }
}
