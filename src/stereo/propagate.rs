//! Guide-segment transfer between the two images of a stereo pair.
//!
//! Each endpoint looks up its `K = min(100, n)` nearest correspondence source
//! points and averages their source → target translations. Both endpoints of
//! an edge then move by the mean of the two endpoint translations, so an edge
//! is shifted rigidly and keeps its direction.

use super::correspondences::CorrespondenceSet;
use crate::canvas::CanvasMapping;
use crate::error::{CalibError, Result, Stage};
use crate::record::{CalibrationRecord, GuideSegments};
use crate::types::{PixelEdge, PixelPoint};
use log::debug;
use nalgebra::Vector2;

/// Upper bound on the neighbours averaged per endpoint.
pub const MAX_NEIGHBORS: usize = 100;

/// Mean translation of the `k` correspondences nearest to `p`.
///
/// Ties in distance keep the correspondence order.
fn local_translation(set: &CorrespondenceSet, p: Vector2<f64>, k: usize) -> Vector2<f64> {
    let source = set.source();
    let target = set.target();
    let mut order: Vec<(f64, usize)> = source
        .iter()
        .enumerate()
        .map(|(i, s)| ((s - p).norm_squared(), i))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));

    let sum: Vector2<f64> = order[..k]
        .iter()
        .map(|&(_, i)| target[i] - source[i])
        .sum();
    sum / k as f64
}

fn round_point(p: Vector2<f64>) -> PixelPoint {
    [p.x.round_ties_even() as i32, p.y.round_ties_even() as i32]
}

/// Move one native-pixel edge into the other image.
pub fn propagate_edge(set: &CorrespondenceSet, edge: &PixelEdge) -> Result<PixelEdge> {
    if set.is_empty() {
        return Err(CalibError::insufficient(
            Stage::Propagate,
            "no correspondences between the images",
        ));
    }
    let k = set.len().min(MAX_NEIGHBORS);
    let e = edge.to_f64();
    let shift = (local_translation(set, e.p0, k) + local_translation(set, e.p1, k)) / 2.0;
    Ok(PixelEdge::new(round_point(e.p0 + shift), round_point(e.p1 + shift)))
}

/// Propagate every edge of every axis; segments are in native pixels.
pub fn propagate_segments(
    set: &CorrespondenceSet,
    segments: &GuideSegments,
) -> Result<GuideSegments> {
    if set.is_empty() {
        return Err(CalibError::insufficient(
            Stage::Propagate,
            "no correspondences between the images",
        ));
    }
    let mut out: [Vec<PixelEdge>; 3] = Default::default();
    for (dst, edges) in out.iter_mut().zip(segments.edges_by_axis()) {
        *dst = edges
            .iter()
            .map(|e| propagate_edge(set, e))
            .collect::<Result<_>>()?;
    }
    debug!(
        "propagated {} edges using {} correspondences",
        segments.total_edges(),
        set.len()
    );
    Ok(GuideSegments::from_edges(out))
}

/// Propose the twin's canvas-space guide points.
///
/// `twin` is a record derived from the source (see
/// [`CalibrationRecord::derive_twin`]); its guide points are still the
/// source's, in source canvas coordinates. They are mapped to native pixels
/// with `source_map`, propagated, and mapped onto the twin's canvas with
/// `target_map`. Pose fields are cleared since they described the source.
pub fn propagate_calibration(
    twin: &CalibrationRecord,
    set: &CorrespondenceSet,
    source_map: &CanvasMapping,
    target_map: &CanvasMapping,
) -> Result<CalibrationRecord> {
    let segments = GuideSegments::new(twin.guide_points.clone())?;
    let native = segments.map_points(|p| source_map.to_native_px(p));
    let moved = propagate_segments(set, &native)?;
    let canvas = moved.map_points(|p| target_map.to_canvas_px(p));

    let mut out = twin.clone();
    out.guide_points = canvas.into_axes();
    out.clear_pose();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasSize;

    fn v(x: f64, y: f64) -> Vector2<f64> {
        Vector2::new(x, y)
    }

    #[test]
    fn uniform_shift_moves_edges_rigidly() {
        let set = CorrespondenceSet::from_pairs(
            (0..10).map(|i| (v(i as f64 * 30.0, 50.0), v(i as f64 * 30.0 + 12.0, 47.0))),
        );
        let out = propagate_edge(&set, &PixelEdge::new([5, 5], [200, 90])).expect("edge");
        assert_eq!(out, PixelEdge::new([17, 2], [212, 87]));
    }

    #[test]
    fn nearest_neighbours_dominate_with_many_points() {
        // 150 points: the 100 nearest to the left edge carry +4 in x, the far
        // ones +40. K = 100 so only the near group counts.
        let pairs = (0..150).map(|i| {
            let (x, dx) = if i < 100 { (i as f64, 4.0) } else { (5000.0 + i as f64, 40.0) };
            (v(x, 0.0), v(x + dx, 0.0))
        });
        let set = CorrespondenceSet::from_pairs(pairs);
        let out = propagate_edge(&set, &PixelEdge::new([0, 0], [10, 0])).expect("edge");
        assert_eq!(out, PixelEdge::new([4, 0], [14, 0]));
    }

    #[test]
    fn half_pixel_shift_rounds_to_even() {
        let set = CorrespondenceSet::from_pairs([(v(0.0, 0.0), v(0.5, 0.5))]);
        let out = propagate_edge(&set, &PixelEdge::new([0, 1], [2, 3])).expect("edge");
        assert_eq!(out, PixelEdge::new([0, 2], [2, 4]));
    }

    #[test]
    fn empty_set_is_insufficient() {
        let set = CorrespondenceSet::default();
        let err = propagate_edge(&set, &PixelEdge::new([0, 0], [1, 1])).expect_err("empty");
        assert!(matches!(err, CalibError::InsufficientData { .. }));
        let segments = GuideSegments::default();
        assert!(propagate_segments(&set, &segments).is_err());
    }

    #[test]
    fn calibration_round_trips_through_native_space() {
        let map = CanvasMapping::fit(2400, 1600, CanvasSize::default()).expect("map");
        let mut twin = CalibrationRecord::new(
            "hall_right",
            "jpg",
            [vec![[100, 100], [500, 120]], vec![], vec![[10, 10], [10, 300]]],
        );
        twin.camera_base = Some([0.0; 9]);
        // +20 native pixels = +10 canvas pixels at scale 0.5.
        let set = CorrespondenceSet::from_pairs([(v(0.0, 0.0), v(20.0, 0.0))]);
        let out = propagate_calibration(&twin, &set, &map, &map).expect("propagate");
        assert_eq!(out.guide_points[0], vec![[110, 100], [510, 120]]);
        assert_eq!(out.guide_points[2], vec![[20, 10], [20, 300]]);
        assert!(!out.is_posed());
        assert_eq!(out.name, "hall_right");
    }
}
