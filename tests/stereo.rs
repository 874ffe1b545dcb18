mod common;

use approx::assert_relative_eq;
use common::synthetic_image::{guide_points_towards, projected_vanishing_points, scene_rotation};
use nalgebra::Vector2;
use vanishing_calib::image::GrayImageU8;
use vanishing_calib::record::CalibrationRecord;
use vanishing_calib::stereo::{
    ratio_test_matches, Keypoint, KeypointMatcher, StaticMatcher, DEFAULT_RATIO,
};
use vanishing_calib::{
    propagate_calibration, stereo_twin_name, CalibError, CanvasMapping, CanvasSize,
    CorrespondenceSet, RawCalibration,
};

/// 10×10 grid of matches shifted by `shift` native pixels.
fn shifted_grid(shift: Vector2<f64>) -> CorrespondenceSet {
    CorrespondenceSet::from_pairs((0..100).map(|i| {
        let p = Vector2::new((i % 10) as f64 * 240.0, (i / 10) as f64 * 160.0);
        (p, p + shift)
    }))
}

fn posed_left() -> CalibrationRecord {
    let vps = projected_vanishing_points(&scene_rotation());
    let record = CalibrationRecord::new("atrium_left", "jpg", guide_points_towards(&vps));
    RawCalibration::from_record(record)
        .and_then(|raw| raw.classify())
        .and_then(|c| c.pose(CanvasSize::default()))
        .expect("pose")
        .into_record()
}

#[test]
fn twin_record_is_independent_copy() {
    let left = posed_left();
    let mut right = left.derive_twin(stereo_twin_name).expect("twin");
    assert_eq!(right.name, "atrium_right");
    assert_eq!(right.extension, "jpg");
    assert_eq!(right.guide_points, left.guide_points);

    right.guide_points[0].clear();
    assert!(!left.guide_points[0].is_empty());
    assert_eq!(left.name, "atrium_left");
}

#[test]
fn propagated_twin_poses_like_its_source() {
    let _ = env_logger::builder().is_test(true).try_init();
    let left = posed_left();
    let twin = left.derive_twin(stereo_twin_name).expect("twin");
    // 2400×1600 images sit on the canvas at scale 0.5 with no letterbox.
    let mapping = CanvasMapping::fit(2400, 1600, CanvasSize::default()).expect("mapping");
    let set = shifted_grid(Vector2::new(-40.0, 0.0));

    let proposed = propagate_calibration(&twin, &set, &mapping, &mapping).expect("propagate");
    assert!(!proposed.is_posed());
    for (moved, original) in proposed.guide_points.iter().zip(&left.guide_points) {
        assert_eq!(moved.len(), original.len());
        for (m, o) in moved.iter().zip(original) {
            assert_eq!(*m, [o[0] - 20, o[1]]);
        }
    }

    let right = RawCalibration::from_record(proposed)
        .and_then(|raw| raw.classify())
        .and_then(|c| c.pose(CanvasSize::default()))
        .expect("twin pose");
    let left_position = left.camera_position.expect("left camera");
    let right_position = right.pose().position;
    assert_relative_eq!(right_position.x, left_position[0] - 20.0, epsilon = 1e-6);
    assert_relative_eq!(right_position.y, left_position[1], epsilon = 1e-6);
    assert_relative_eq!(right_position.z, left_position[2], epsilon = 1e-6);
}

#[test]
fn empty_correspondences_are_insufficient() {
    let twin = posed_left().derive_twin(stereo_twin_name).expect("twin");
    let mapping = CanvasMapping::fit(2400, 1600, CanvasSize::default()).expect("mapping");
    let err = propagate_calibration(&twin, &CorrespondenceSet::default(), &mapping, &mapping)
        .expect_err("empty");
    assert!(matches!(err, CalibError::InsufficientData { .. }));
}

#[test]
fn correspondence_file_must_pair_up() {
    let ok: CorrespondenceSet =
        serde_json::from_str(r#"{"source": [[1.0, 2.0]], "target": [[3.0, 4.0]]}"#)
            .expect("parse");
    assert_eq!(ok.len(), 1);
    let bad = serde_json::from_str::<CorrespondenceSet>(
        r#"{"source": [[1.0, 2.0]], "target": []}"#,
    );
    assert!(bad.is_err());
}

#[test]
fn matchers_feed_propagation() {
    let gray = GrayImageU8::new(4, 4, vec![0; 16]).expect("image");
    let set = shifted_grid(Vector2::new(12.0, 0.0));
    let served = StaticMatcher::new(set.clone())
        .match_images(&gray.as_view(), &gray.as_view())
        .expect("match");
    assert_eq!(served, set);

    let kp = |x: f64, d: [f32; 2]| Keypoint {
        pos: Vector2::new(x, 10.0),
        descriptor: d.to_vec(),
    };
    let source = [kp(100.0, [1.0, 0.0]), kp(300.0, [0.0, 1.0])];
    let target = [kp(112.0, [0.9, 0.1]), kp(312.0, [0.1, 0.9]), kp(900.0, [5.0, 5.0])];
    let matched = ratio_test_matches(&source, &target, DEFAULT_RATIO).expect("ratio");
    assert_eq!(matched.len(), 2);
    for (s, t) in matched.pairs() {
        assert_relative_eq!(t.x - s.x, 12.0);
    }
}
