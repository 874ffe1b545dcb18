//! Serializable reports for the refinement stage and the pipeline binary.

pub mod pipeline;
pub mod refine;
pub mod timing;

pub use pipeline::{ImageReport, PipelineReport, PropagateSummary};
pub use refine::{EdgeRefineSample, RefineReport};
pub use timing::{timed, StageTiming, TimingBreakdown};
