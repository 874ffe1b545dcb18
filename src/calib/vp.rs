//! Vanishing points from pairwise guide-line intersections.
//!
//! Each known axis contributes every unordered pair of its edges; the axis
//! vanishing point is the plain mean of those intersections. Intersections use
//! signed-area interpolation along the second edge, which fails only when the
//! two lines are parallel (or degenerate).

use super::classify::CalibrationType;
use crate::error::{CalibError, Result, Stage};
use crate::record::GuideSegments;
use crate::types::{Axis, LineEdge};
use log::debug;
use nalgebra::Vector2;
use serde::Serialize;

/// Vanishing point estimate for one axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VanishingPoint {
    pub axis: Axis,
    pub pos: Vector2<f64>,
    /// Number of pairwise intersections averaged into `pos`.
    pub support: usize,
}

/// Twice the signed area of triangle `(p, q, r)`.
#[inline]
pub fn triangle_area(p: &Vector2<f64>, q: &Vector2<f64>, r: &Vector2<f64>) -> f64 {
    p.x * q.y + q.x * r.y + r.x * p.y - p.y * q.x - q.y * r.x - r.y * p.x
}

/// Intersection of the infinite lines through `e1` and `e2`.
///
/// Returns `None` when the lines are parallel or either edge is degenerate.
pub fn line_intersection(e1: &LineEdge, e2: &LineEdge) -> Option<Vector2<f64>> {
    let (p, q) = (&e1.p0, &e1.p1);
    let (r, s) = (&e2.p0, &e2.p1);
    let a1 = triangle_area(p, q, r);
    let a2 = triangle_area(q, p, s);
    let denom = a1 + a2;
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let amp = a1 / denom;
    let point = r * (1.0 - amp) + s * amp;
    (point.x.is_finite() && point.y.is_finite()).then_some(point)
}

/// Mean of all pairwise intersections of `edges`.
pub fn axis_vanishing_point(axis: Axis, edges: &[LineEdge]) -> Result<VanishingPoint> {
    if edges.len() < 2 {
        return Err(CalibError::validation(
            Stage::VanishingPoints,
            Some(axis),
            format!("need at least 2 guide edges, found {}", edges.len()),
        ));
    }

    let mut sum = Vector2::zeros();
    let mut count = 0usize;
    for (i, e1) in edges.iter().enumerate() {
        for (j, e2) in edges.iter().enumerate().skip(i + 1) {
            let point = line_intersection(e1, e2).ok_or_else(|| {
                CalibError::geometric(
                    Stage::VanishingPoints,
                    Some(axis),
                    format!("guide edges {i} and {j} are parallel or degenerate"),
                )
            })?;
            sum += point;
            count += 1;
        }
    }
    let pos = sum / count as f64;
    debug!(
        "vanishing point {axis}: ({:.2}, {:.2}) from {count} intersections",
        pos.x, pos.y
    );
    Ok(VanishingPoint {
        axis,
        pos,
        support: count,
    })
}

/// Vanishing points for every known axis, ordered X, Y, Z without the missing one.
pub fn vanishing_points(
    segments: &GuideSegments,
    calibration_type: CalibrationType,
) -> Result<Vec<VanishingPoint>> {
    calibration_type
        .known_axes()
        .into_iter()
        .map(|axis| {
            let edges: Vec<LineEdge> = segments.edges(axis).map(|e| e.to_f64()).collect();
            axis_vanishing_point(axis, &edges)
        })
        .collect()
}
