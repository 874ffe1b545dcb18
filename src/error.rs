//! Error taxonomy shared by every pipeline stage.
//!
//! Every failure carries the [`Stage`] that produced it and, when it is tied
//! to one guide axis, the [`Axis`]. None of the errors are retried internally:
//! the computations are deterministic, so callers must supply corrected input.

use crate::types::Axis;
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage attached to an error for context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Canvas,
    Classify,
    VanishingPoints,
    Pose,
    EdgeField,
    Refine,
    Propagate,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Canvas => "canvas",
            Stage::Classify => "classify",
            Stage::VanishingPoints => "vanishing-points",
            Stage::Pose => "pose",
            Stage::EdgeField => "edge-field",
            Stage::Refine => "refine",
            Stage::Propagate => "propagate",
            Stage::Persist => "persist",
        };
        f.write_str(label)
    }
}

/// Renders an optional axis as ` (axis X)` or nothing.
struct AxisSuffix<'a>(&'a Option<Axis>);

impl fmt::Display for AxisSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(axis) => write!(f, " (axis {axis})"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CalibError {
    /// Malformed input: odd point counts, too many empty axes, too few edges.
    #[error("{stage}: invalid input{}: {reason}", AxisSuffix(.axis))]
    Validation {
        stage: Stage,
        axis: Option<Axis>,
        reason: String,
    },
    /// Parallel guide lines, negative square roots, NaN.
    #[error("{stage}: geometric inconsistency{}: {reason}", AxisSuffix(.axis))]
    GeometricInconsistency {
        stage: Stage,
        axis: Option<Axis>,
        reason: String,
    },
    /// Not enough data to compute anything meaningful.
    #[error("{stage}: insufficient data: {reason}")]
    InsufficientData { stage: Stage, reason: String },
    #[error("{stage}: cancelled")]
    Cancelled { stage: Stage },
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image codec failure for {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("JSON codec failure for {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration: {0}")]
    Config(String),
}

impl CalibError {
    pub(crate) fn validation(stage: Stage, axis: Option<Axis>, reason: impl Into<String>) -> Self {
        CalibError::Validation {
            stage,
            axis,
            reason: reason.into(),
        }
    }

    pub(crate) fn geometric(stage: Stage, axis: Option<Axis>, reason: impl Into<String>) -> Self {
        CalibError::GeometricInconsistency {
            stage,
            axis,
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(stage: Stage, reason: impl Into<String>) -> Self {
        CalibError::InsufficientData {
            stage,
            reason: reason.into(),
        }
    }

    /// Stage that raised the error, when it came from a computation stage.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CalibError::Validation { stage, .. }
            | CalibError::GeometricInconsistency { stage, .. }
            | CalibError::InsufficientData { stage, .. }
            | CalibError::Cancelled { stage } => Some(*stage),
            _ => None,
        }
    }

    /// Axis the error refers to, if any.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            CalibError::Validation { axis, .. }
            | CalibError::GeometricInconsistency { axis, .. } => *axis,
            _ => None,
        }
    }
}

pub type Result<T, E = CalibError> = std::result::Result<T, E>;
