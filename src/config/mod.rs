//! JSON configuration for the pipeline binary.
//!
//! Sections hold optional overrides that `resolve()` into concrete parameter
//! structs; absent keys keep the library defaults.

pub mod edge;
pub mod pipeline;
pub mod refine;

pub use edge::EdgeFieldConfig;
pub use pipeline::{OutputConfig, PipelineConfig, StereoConfig};
pub use refine::RefineConfig;

use crate::error::{CalibError, Result};
use std::fs;
use std::path::Path;

pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let data = fs::read_to_string(path)
        .map_err(|e| CalibError::Config(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&data)
        .map_err(|e| CalibError::Config(format!("failed to parse {}: {e}", path.display())))
}
