use super::search::{refine_edge, CancelToken, EdgeRefinement, RefineParams};
use crate::canvas::CanvasMapping;
use crate::diagnostics::{EdgeRefineSample, RefineReport};
use crate::edges::EdgeLikelihoodField;
use crate::error::{CalibError, Result, Stage};
use crate::record::{GuideSegments, RawCalibration, RefinedCalibration};
use crate::types::{Axis, PixelEdge};
use log::debug;
use std::time::Instant;

/// Controls whether a batch of edges is refined sequentially or with Rayon.
#[derive(Clone, Copy, Debug)]
pub struct ParallelRefineOptions {
    enabled: bool,
    min_edges_for_parallel: usize,
}

impl ParallelRefineOptions {
    pub fn new(enabled: bool, min_edges_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_edges_for_parallel: min_edges_for_parallel.max(1),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_edges_for_parallel: usize::MAX,
        }
    }

    /// Returns true when parallel refinement should be used for `edge_count`.
    pub fn should_parallelize(&self, edge_count: usize) -> bool {
        self.enabled && edge_count >= self.min_edges_for_parallel
    }
}

impl Default for ParallelRefineOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_edges_for_parallel: 4,
        }
    }
}

/// Refine a batch of edges in native pixel space; output keeps input order.
///
/// Parallel execution needs the `parallel` feature; without it the options
/// are ignored and edges run sequentially.
pub fn refine_edges(
    field: &EdgeLikelihoodField,
    edges: &[PixelEdge],
    params: &RefineParams,
    cancel: &CancelToken,
    parallel: ParallelRefineOptions,
) -> Result<Vec<EdgeRefinement>> {
    if edges.is_empty() {
        return Ok(Vec::new());
    }

    if parallel.should_parallelize(edges.len()) {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            return edges
                .par_iter()
                .map(|edge| refine_edge(field, edge, params, cancel))
                .collect();
        }
    }

    edges
        .iter()
        .map(|edge| refine_edge(field, edge, params, cancel))
        .collect()
}

/// Refine every edge of every axis. Segments are in native pixels.
pub fn refine_segments(
    field: &EdgeLikelihoodField,
    segments: &GuideSegments,
    params: &RefineParams,
    cancel: &CancelToken,
    parallel: ParallelRefineOptions,
) -> Result<(GuideSegments, RefineReport)> {
    let start = Instant::now();
    let mut tagged: Vec<(Axis, usize, PixelEdge)> = Vec::with_capacity(segments.total_edges());
    for axis in Axis::ALL {
        tagged.extend(segments.edges(axis).enumerate().map(|(i, e)| (axis, i, e)));
    }
    let inputs: Vec<PixelEdge> = tagged.iter().map(|&(_, _, e)| e).collect();
    let results = refine_edges(field, &inputs, params, cancel, parallel)?;

    let mut refined: [Vec<PixelEdge>; 3] = Default::default();
    let mut samples = Vec::with_capacity(results.len());
    for ((axis, index, input), result) in tagged.into_iter().zip(results) {
        refined[axis.index()].push(result.edge);
        samples.push(EdgeRefineSample {
            axis,
            index,
            input,
            result,
        });
    }

    let report = RefineReport::new(
        params.radius_for(field),
        params.policy,
        samples,
        start.elapsed().as_secs_f64() * 1000.0,
    );
    debug!(
        "refined {} edges, {} replaced, mean score {:?}",
        report.samples.len(),
        report.replaced,
        report.mean_score
    );
    Ok((GuideSegments::from_edges(refined), report))
}

/// Refine a canvas-space calibration against the field of its native image.
///
/// Guide points are mapped canvas → native, refined, and mapped back; both
/// integer conversions truncate like the stored records do.
pub fn refine_calibration(
    raw: RawCalibration,
    field: &EdgeLikelihoodField,
    mapping: &CanvasMapping,
    params: &RefineParams,
    cancel: &CancelToken,
    parallel: ParallelRefineOptions,
) -> Result<RefinedCalibration> {
    if (mapping.image_width as usize, mapping.image_height as usize)
        != (field.width(), field.height())
    {
        return Err(CalibError::validation(
            Stage::Refine,
            None,
            format!(
                "canvas mapping is for a {}x{} image but the field is {}x{}",
                mapping.image_width,
                mapping.image_height,
                field.width(),
                field.height()
            ),
        ));
    }
    let native = raw.segments().map_points(|p| mapping.to_native_px(p));
    let (refined, report) = refine_segments(field, &native, params, cancel, parallel)?;
    let canvas = refined.map_points(|p| mapping.to_canvas_px(p));
    Ok(RefinedCalibration::new(raw.with_segments(canvas), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;

    fn grid_field() -> EdgeLikelihoodField {
        // Bright row 40 and bright column 70.
        EdgeLikelihoodField::from_values(ImageF32::from_fn(200, 100, |x, y| {
            if y == 40 || x == 70 {
                1.0
            } else {
                0.0
            }
        }))
        .expect("field")
    }

    #[test]
    fn parallel_options_thresholds() {
        assert!(!ParallelRefineOptions::disabled().should_parallelize(1000));
        let opts = ParallelRefineOptions::new(true, 0);
        assert!(opts.should_parallelize(1));
    }

    #[test]
    fn segments_keep_axis_and_order() {
        let field = grid_field();
        let segments = GuideSegments::new([
            vec![[10, 41], [150, 41]],
            vec![[71, 10], [71, 90], [69, 5], [69, 95]],
            vec![],
        ])
        .expect("segments");
        let (refined, report) = refine_segments(
            &field,
            &segments,
            &RefineParams::default(),
            &CancelToken::new(),
            ParallelRefineOptions::new(true, 1),
        )
        .expect("refine");
        assert_eq!(refined.edge_count(Axis::X), 1);
        assert_eq!(refined.edge_count(Axis::Y), 2);
        assert!(refined.is_empty_axis(Axis::Z));
        assert!(refined.edges(Axis::X).all(|e| e.p0[1] == 40 && e.p1[1] == 40));
        assert!(refined.edges(Axis::Y).all(|e| e.p0[0] == 70 && e.p1[0] == 70));
        assert_eq!(report.samples.len(), 3);
        assert_eq!(report.samples[2].axis, Axis::Y);
        assert_eq!(report.samples[2].index, 1);
        assert_eq!(report.replaced, 3);
    }

    #[test]
    fn mismatched_mapping_is_rejected() {
        let field = grid_field();
        let mapping =
            CanvasMapping::fit(400, 200, crate::canvas::CanvasSize::default()).expect("map");
        let raw = RawCalibration::from_record(crate::record::CalibrationRecord::new(
            "a_left",
            "png",
            [vec![], vec![], vec![]],
        ))
        .expect("raw");
        let err = refine_calibration(
            raw,
            &field,
            &mapping,
            &RefineParams::default(),
            &CancelToken::new(),
            ParallelRefineOptions::disabled(),
        )
        .expect_err("size mismatch");
        assert!(matches!(err, CalibError::Validation { stage: Stage::Refine, .. }));
    }
}
