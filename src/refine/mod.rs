//! Edge-likelihood-guided refinement of guide-segment endpoints.
//!
//! Each endpoint is probed along the edge normal over `±r` pixels with
//! `r = ceil(min(width, height) / 100)`; every pairing of probe pixels is
//! scored by the mean likelihood along its Bresenham line and the best pair
//! replaces the edge (see [`RefinePolicy`]).
//!
//! - [`raster`]: allocation-free Bresenham iterator.
//! - [`probe`]: probe radius and perpendicular candidate pixels.
//! - [`search`]: the per-edge search, scoring and cancellation.
//! - [`driver`]: batches over edges, segments and whole calibrations, with
//!   optional Rayon fan-out.

pub mod driver;
pub mod probe;
pub mod raster;
pub mod search;

pub use driver::{refine_calibration, refine_edges, refine_segments, ParallelRefineOptions};
pub use probe::probe_radius;
pub use raster::BresenhamLine;
pub use search::{
    refine_edge, score_line, CancelToken, EdgeRefinement, RefineParams, RefinePolicy,
};
