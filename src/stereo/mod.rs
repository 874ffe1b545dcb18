//! Stereo-pair support: correspondences, keypoint matching and guide-segment
//! propagation onto the twin image.

pub mod correspondences;
pub mod matcher;
pub mod propagate;

pub use correspondences::CorrespondenceSet;
pub use matcher::{ratio_test_matches, Keypoint, KeypointMatcher, StaticMatcher, DEFAULT_RATIO};
pub use propagate::{propagate_calibration, propagate_edge, propagate_segments, MAX_NEIGHBORS};
