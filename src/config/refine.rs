use crate::refine::{CancelToken, ParallelRefineOptions, RefineParams, RefinePolicy};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Skip refinement entirely when false.
    pub enabled: bool,
    pub policy: Option<RefinePolicy>,
    /// Probe half-length override in native pixels.
    pub radius: Option<u32>,
    pub parallel: Option<bool>,
    pub min_edges_for_parallel: Option<usize>,
    /// Abort a refinement pass that runs longer than this.
    pub timeout_ms: Option<u64>,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: None,
            radius: None,
            parallel: None,
            min_edges_for_parallel: None,
            timeout_ms: None,
        }
    }
}

impl RefineConfig {
    pub fn resolve(&self) -> RefineParams {
        let mut p = RefineParams::default();
        if let Some(v) = self.policy {
            p.policy = v;
        }
        if self.radius.is_some() {
            p.radius = self.radius;
        }
        p
    }

    pub fn parallel_options(&self) -> ParallelRefineOptions {
        let mut opts = ParallelRefineOptions::default();
        if let Some(enabled) = self.parallel {
            let min = self.min_edges_for_parallel.unwrap_or(1);
            opts = if enabled {
                ParallelRefineOptions::new(true, min)
            } else {
                ParallelRefineOptions::disabled()
            };
        } else if let Some(min) = self.min_edges_for_parallel {
            opts = ParallelRefineOptions::new(cfg!(feature = "parallel"), min);
        }
        opts
    }

    /// Fresh token; the deadline starts counting now.
    pub fn cancel_token(&self) -> CancelToken {
        match self.timeout_ms {
            Some(ms) => CancelToken::with_timeout(Duration::from_millis(ms)),
            None => CancelToken::new(),
        }
    }
}
