//! Calibration from guide segments: classification, vanishing points, pose.

pub mod classify;
pub mod pose;
pub mod vp;

pub use classify::{classify, CalibrationType};
pub use pose::{pose_from_vanishing_points, solve_pose};
pub use vp::{axis_vanishing_point, line_intersection, triangle_area, vanishing_points, VanishingPoint};
