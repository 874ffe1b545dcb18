//! Exhaustive endpoint search for a single guide edge.
//!
//! Every pairing of a probe pixel around `p0` with a probe pixel around `p1`
//! is scored by the mean likelihood along its Bresenham line. The first pair
//! reaching the strict maximum wins.

use super::probe::{edge_normal, probe_points, probe_radius};
use super::raster::BresenhamLine;
use crate::edges::EdgeLikelihoodField;
use crate::error::{CalibError, Result, Stage};
use crate::types::{PixelEdge, PixelPoint};
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What to do when the best candidate is no better than the input edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefinePolicy {
    /// The best candidate always replaces the input, even at score 0.
    #[default]
    AlwaysReplace,
    /// The input edge is scored too and kept unless a candidate is strictly better.
    ReplaceIfImproved,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RefineParams {
    pub policy: RefinePolicy,
    /// Probe half-length; `None` derives it from the image size.
    pub radius: Option<u32>,
}

impl RefineParams {
    pub fn radius_for(&self, field: &EdgeLikelihoodField) -> u32 {
        self.radius
            .unwrap_or_else(|| probe_radius(field.width(), field.height()))
    }
}

/// Cooperative cancellation: a shared flag plus an optional deadline.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Request cancellation; visible to every clone.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub(crate) fn check(&self, stage: Stage) -> Result<()> {
        if self.is_cancelled() {
            Err(CalibError::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}

/// Outcome of refining one edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRefinement {
    pub edge: PixelEdge,
    pub score: f64,
    /// Score of the input edge; only computed under `ReplaceIfImproved`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_score: Option<f64>,
    pub replaced: bool,
}

/// Mean likelihood along the rasterized segment; `None` if it leaves the field.
pub fn score_line(field: &EdgeLikelihoodField, p0: PixelPoint, p1: PixelPoint) -> Option<f64> {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for p in BresenhamLine::new(p0, p1) {
        sum += field.at(p)? as f64;
        count += 1;
    }
    Some(sum / count as f64)
}

fn in_bounds_probe(
    field: &EdgeLikelihoodField,
    p: PixelPoint,
    normal: &nalgebra::Vector2<f64>,
    radius: u32,
) -> Result<Vec<PixelPoint>> {
    let all = probe_points(p, normal, radius);
    let total = all.len();
    let kept: Vec<PixelPoint> = all.into_iter().filter(|&q| field.contains(q)).collect();
    if kept.is_empty() {
        return Err(CalibError::insufficient(
            Stage::Refine,
            format!("no probe pixel around {p:?} lies inside the image"),
        ));
    }
    if kept.len() < total {
        warn!(
            "discarded {} out-of-bounds candidates around {p:?}",
            total - kept.len()
        );
    }
    Ok(kept)
}

/// Snap `edge` onto the locally best-scoring edge pixels.
pub fn refine_edge(
    field: &EdgeLikelihoodField,
    edge: &PixelEdge,
    params: &RefineParams,
    cancel: &CancelToken,
) -> Result<EdgeRefinement> {
    let normal = edge_normal(edge)?;
    let radius = params.radius_for(field);
    let cands0 = in_bounds_probe(field, edge.p0, &normal, radius)?;
    let cands1 = in_bounds_probe(field, edge.p1, &normal, radius)?;

    let mut best: Option<(f64, PixelPoint, PixelPoint)> = None;
    for &c0 in &cands0 {
        cancel.check(Stage::Refine)?;
        for &c1 in &cands1 {
            let Some(score) = score_line(field, c0, c1) else {
                continue;
            };
            if best.map_or(true, |(s, _, _)| score > s) {
                best = Some((score, c0, c1));
            }
        }
    }
    let (score, b0, b1) = best.ok_or_else(|| {
        CalibError::insufficient(Stage::Refine, "no candidate pair could be scored")
    })?;
    let candidate = PixelEdge::new(b0, b1);

    let result = match params.policy {
        RefinePolicy::AlwaysReplace => EdgeRefinement {
            edge: candidate,
            score,
            original_score: None,
            replaced: candidate != *edge,
        },
        RefinePolicy::ReplaceIfImproved => {
            let original = score_line(field, edge.p0, edge.p1);
            match original {
                Some(orig) if score <= orig => EdgeRefinement {
                    edge: *edge,
                    score: orig,
                    original_score: original,
                    replaced: false,
                },
                _ => EdgeRefinement {
                    edge: candidate,
                    score,
                    original_score: original,
                    replaced: candidate != *edge,
                },
            }
        }
    };
    trace!(
        "refined {:?}->{:?} to {:?}->{:?} (score {:.4})",
        edge.p0,
        edge.p1,
        result.edge.p0,
        result.edge.p1,
        result.score
    );
    Ok(result)
}
