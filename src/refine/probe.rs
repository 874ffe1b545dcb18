//! Candidate endpoints perpendicular to a guide edge.
use super::raster::BresenhamLine;
use crate::error::{CalibError, Result, Stage};
use crate::types::{PixelEdge, PixelPoint};
use nalgebra::Vector2;

/// Probe half-length for an image: `ceil(min(width, height) / 100)`.
pub fn probe_radius(width: usize, height: usize) -> u32 {
    (width.min(height) as f64 / 100.0).ceil() as u32
}

/// Unit normal of the edge direction `p0 - p1`.
///
/// The difference is taken in `f64`; records may carry any `i32`.
pub fn edge_normal(edge: &PixelEdge) -> Result<Vector2<f64>> {
    let e = edge.to_f64();
    let d = e.p0 - e.p1;
    let len = d.norm();
    if len == 0.0 {
        return Err(CalibError::geometric(
            Stage::Refine,
            None,
            format!("edge {:?} -> {:?} has zero length", edge.p0, edge.p1),
        ));
    }
    let u = d / len;
    Ok(Vector2::new(-u.y, u.x))
}

/// Pixels of the probe segment `round(p + r·n) → round(p - r·n)`, rounding
/// half-way cases to even.
pub fn probe_points(p: PixelPoint, normal: &Vector2<f64>, radius: u32) -> Vec<PixelPoint> {
    let r = radius as f64;
    let (px, py) = (p[0] as f64, p[1] as f64);
    let up = [
        (px + r * normal.x).round_ties_even() as i32,
        (py + r * normal.y).round_ties_even() as i32,
    ];
    let down = [
        (px - r * normal.x).round_ties_even() as i32,
        (py - r * normal.y).round_ties_even() as i32,
    ];
    BresenhamLine::new(up, down).collect()
}
