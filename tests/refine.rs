mod common;

use common::synthetic_image::checkerboard_u8;
use vanishing_calib::record::{CalibrationRecord, GuideSegments};
use vanishing_calib::refine::{refine_edge, refine_segments, ParallelRefineOptions};
use vanishing_calib::types::Axis;
use vanishing_calib::{
    refine_calibration, CancelToken, CanvasMapping, CanvasSize, EdgeLikelihoodField,
    EdgeLikelihoodParams, PixelEdge, RawCalibration, RefineParams, RefinePolicy,
};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;
const CELL: usize = 32;

fn checkerboard_field() -> EdgeLikelihoodField {
    let image = checkerboard_u8(WIDTH, HEIGHT, CELL);
    EdgeLikelihoodField::build(&image.as_view(), &EdgeLikelihoodParams::default())
        .expect("edge field")
}

#[test]
fn refiner_snaps_onto_checkerboard_row() {
    let _ = env_logger::builder().is_test(true).try_init();
    let field = checkerboard_field();
    // Canny keeps the upper side of each cell boundary: row 31 for y = 32.
    let edge = PixelEdge::new([40, 34], [600, 33]);
    let out = refine_edge(&field, &edge, &RefineParams::default(), &CancelToken::new())
        .expect("refine");

    assert_eq!(out.edge.p0[1], 31);
    assert_eq!(out.edge.p1[1], 31);
    assert!((out.edge.p0[0] - 40).abs() <= 1);
    assert!((out.edge.p1[0] - 600).abs() <= 1);
    assert!(out.replaced);
    assert!(out.score > 0.3, "score {}", out.score);
}

#[test]
fn refined_endpoints_stay_within_probe_radius() {
    let field = checkerboard_field();
    let params = RefineParams::default();
    let radius = params.radius_for(&field) as f64;
    let segments = GuideSegments::new([
        vec![[20, 60], [300, 66], [100, 130], [500, 125]],
        vec![[93, 20], [97, 400], [220, 50], [226, 300]],
        vec![],
    ])
    .expect("segments");

    let (refined, report) = refine_segments(
        &field,
        &segments,
        &params,
        &CancelToken::new(),
        ParallelRefineOptions::new(true, 1),
    )
    .expect("refine");
    assert_eq!(report.samples.len(), 4);
    for axis in [Axis::X, Axis::Y] {
        for (before, after) in segments.edges(axis).zip(refined.edges(axis)) {
            for (p, q) in [(before.p0, after.p0), (before.p1, after.p1)] {
                let dx = (p[0] - q[0]) as f64;
                let dy = (p[1] - q[1]) as f64;
                // Rounding the probe ends can add up to half a pixel per axis.
                assert!(dx.hypot(dy) <= radius + 1.0, "{p:?} -> {q:?}");
            }
        }
    }
}

#[test]
fn repeated_passes_never_lower_the_score() {
    let field = checkerboard_field();
    let params = RefineParams {
        policy: RefinePolicy::ReplaceIfImproved,
        radius: None,
    };
    let cancel = CancelToken::new();
    let mut edge = PixelEdge::new([70, 100], [560, 92]);
    let mut last = f64::NEG_INFINITY;
    for _ in 0..3 {
        let out = refine_edge(&field, &edge, &params, &cancel).expect("refine");
        assert!(out.score >= last, "{} < {last}", out.score);
        last = out.score;
        edge = out.edge;
    }
    assert!(last > 0.0);
}

#[test]
fn repeated_default_passes_never_lower_the_score() {
    let field = checkerboard_field();
    let params = RefineParams::default();
    let cancel = CancelToken::new();
    let edges = [
        PixelEdge::new([70, 100], [560, 92]),
        PixelEdge::new([45, 20], [300, 410]),
        PixelEdge::new([600, 30], [150, 450]),
        PixelEdge::new([10, 470], [630, 5]),
        PixelEdge::new([221, 60], [233, 420]),
    ];
    for start in edges {
        let mut edge = start;
        let mut last = f64::NEG_INFINITY;
        for pass in 0..4 {
            let out = refine_edge(&field, &edge, &params, &cancel).expect("refine");
            assert!(
                out.score >= last,
                "{start:?} pass {pass}: {} < {last}",
                out.score
            );
            assert_eq!(out.original_score, None);
            last = out.score;
            edge = out.edge;
        }
    }
}

#[test]
fn extreme_record_coordinates_are_rejected() {
    let field = checkerboard_field();
    let mapping =
        CanvasMapping::fit(WIDTH as u32, HEIGHT as u32, CanvasSize::default()).expect("mapping");
    let record = CalibrationRecord::new(
        "board_left",
        "png",
        [vec![[2_000_000_000, 5], [-2_000_000_000, 5]], vec![], vec![]],
    );
    let raw = RawCalibration::from_record(record).expect("raw");
    let err = refine_calibration(
        raw,
        &field,
        &mapping,
        &RefineParams::default(),
        &CancelToken::new(),
        ParallelRefineOptions::disabled(),
    )
    .expect_err("endpoints lie outside the image");
    assert!(matches!(
        err,
        vanishing_calib::CalibError::InsufficientData { .. }
    ));

    let clamped = PixelEdge::new([i32::MAX, 40], [i32::MIN, 40]);
    assert!(refine_edge(&field, &clamped, &RefineParams::default(), &CancelToken::new()).is_err());
}

#[test]
fn calibration_is_refined_through_the_canvas() {
    let _ = env_logger::builder().is_test(true).try_init();
    let field = checkerboard_field();
    let mapping =
        CanvasMapping::fit(WIDTH as u32, HEIGHT as u32, CanvasSize::default()).expect("mapping");

    // Two marks just below the native row 63 boundary, in canvas pixels.
    let p0 = mapping.to_canvas_px([40, 66]);
    let p1 = mapping.to_canvas_px([600, 65]);
    let record = CalibrationRecord::new("board_left", "png", [vec![p0, p1], vec![], vec![]]);
    let raw = RawCalibration::from_record(record).expect("raw");

    let refined = refine_calibration(
        raw,
        &field,
        &mapping,
        &RefineParams::default(),
        &CancelToken::new(),
        ParallelRefineOptions::disabled(),
    )
    .expect("refine");

    let edge = refined.segments().edges(Axis::X).next().expect("edge");
    let expected_y = mapping.to_canvas_px([0, 63])[1];
    assert_eq!(edge.p0[1], expected_y);
    assert_eq!(edge.p1[1], expected_y);
    assert_eq!(refined.report().samples.len(), 1);
    assert_eq!(refined.report().replaced, 1);

    let out = refined.into_record();
    assert_eq!(out.name, "board_left");
    assert!(!out.is_posed());
}

#[test]
fn cancelled_refinement_reports_cancellation() {
    let field = checkerboard_field();
    let cancel = CancelToken::new();
    cancel.cancel();
    let segments = GuideSegments::new([vec![[20, 60], [300, 66]], vec![], vec![]])
        .expect("segments");
    let err = refine_segments(
        &field,
        &segments,
        &RefineParams::default(),
        &cancel,
        ParallelRefineOptions::disabled(),
    )
    .expect_err("cancelled");
    assert!(matches!(err, vanishing_calib::CalibError::Cancelled { .. }));
}
