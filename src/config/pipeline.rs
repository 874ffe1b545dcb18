use super::edge::EdgeFieldConfig;
use super::refine::RefineConfig;
use crate::canvas::CanvasSize;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration of the `calib_pipeline` binary.
#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    /// Calibration record of the source image (`*_left.json` or `*_right.json`).
    pub record: PathBuf,
    /// Directory holding `<name>.<extension>` images; defaults to the record's directory.
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
    #[serde(default)]
    pub canvas: Option<CanvasSize>,
    #[serde(default)]
    pub edge_field: EdgeFieldConfig,
    #[serde(default)]
    pub refine: RefineConfig,
    #[serde(default)]
    pub stereo: Option<StereoConfig>,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct StereoConfig {
    /// JSON file with `source` / `target` point lists in native pixels.
    pub correspondences: PathBuf,
    /// Refine the propagated twin segments before posing.
    #[serde(default = "default_true")]
    pub refine_twin: bool,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    #[serde(default)]
    pub overlays: bool,
    #[serde(default)]
    pub save_edge_fields: bool,
}

fn default_true() -> bool {
    true
}

impl PipelineConfig {
    pub fn canvas(&self) -> CanvasSize {
        self.canvas.unwrap_or_default()
    }

    pub fn image_dir(&self) -> PathBuf {
        match &self.image_dir {
            Some(dir) => dir.clone(),
            None => self
                .record
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default(),
        }
    }
}
