//! Optical centre, camera position and orientation from vanishing points.
//!
//! With three vanishing points the optical centre is the orthocentre of the
//! vanishing-point triangle, found as the intersection of two altitudes. With
//! two, the optical centre is assumed at the canvas centre and a third
//! vanishing point is synthesized along the perpendicular of the known pair.
//!
//! Both cases end the same way: the camera sits at depth
//! `z = -sqrt((|FxFy|² - |FxO|² - |FyO|²) / 2)` below the optical centre and
//! the basis vectors point from the camera to each vanishing point.

use super::classify::CalibrationType;
use super::vp::{line_intersection, VanishingPoint};
use crate::canvas::CanvasSize;
use crate::error::{CalibError, Result, Stage};
use crate::types::{Axis, CameraPose, LineEdge};
use log::debug;
use nalgebra::{Vector2, Vector3};

/// Permutation putting `[known0, known1, synthetic]` into X, Y, Z order,
/// indexed by the missing axis.
const CENTERED_ORDER: [[usize; 3]; 3] = [[2, 0, 1], [0, 2, 1], [0, 1, 2]];

/// Recover the camera pose for the given calibration type.
///
/// `vanishing_points` must hold the known axes in X, Y, Z order, as produced by
/// [`super::vanishing_points`]. `canvas` provides the assumed optical centre in
/// centered mode.
pub fn solve_pose(
    vanishing_points: &[VanishingPoint],
    calibration_type: CalibrationType,
    canvas: CanvasSize,
) -> Result<CameraPose> {
    let expected = calibration_type.known_axes();
    let axes: Vec<Axis> = vanishing_points.iter().map(|vp| vp.axis).collect();
    if axes != expected {
        return Err(CalibError::validation(
            Stage::Pose,
            None,
            format!("expected vanishing points for {expected:?}, got {axes:?}"),
        ));
    }

    let (canonical, optical_center) = match calibration_type {
        CalibrationType::Normal => {
            let f = [
                vanishing_points[0].pos,
                vanishing_points[1].pos,
                vanishing_points[2].pos,
            ];
            (f, orthocenter(&f)?)
        }
        CalibrationType::Centered { missing } => {
            let co = canvas.center();
            let f = complete_centered(
                vanishing_points[0].pos,
                vanishing_points[1].pos,
                co,
                missing,
            )?;
            (f, co)
        }
    };

    pose_from_vanishing_points(&canonical, optical_center)
}

/// `q + vb * (va·vb)/|vb|²`: foot of the projection of `va` onto `vb`, offset by `q`.
fn project_onto(va: Vector2<f64>, vb: Vector2<f64>, q: Vector2<f64>) -> Result<Vector2<f64>> {
    let denom = vb.norm_squared();
    if denom == 0.0 {
        return Err(CalibError::geometric(
            Stage::Pose,
            None,
            "two vanishing points coincide",
        ));
    }
    Ok(vb * (va.dot(&vb) / denom) + q)
}

/// Orthocentre of the vanishing-point triangle.
fn orthocenter(f: &[Vector2<f64>; 3]) -> Result<Vector2<f64>> {
    let [fx, fy, fz] = *f;
    let hx = project_onto(fx - fy, fz - fy, fy)?;
    let hy = project_onto(fy - fz, fx - fz, fz)?;
    line_intersection(&LineEdge::new(fx, hx), &LineEdge::new(fy, hy)).ok_or_else(|| {
        CalibError::geometric(
            Stage::Pose,
            None,
            "altitudes of the vanishing-point triangle do not intersect",
        )
    })
}

/// Synthesize the missing vanishing point and return all three in X, Y, Z order.
fn complete_centered(
    fx: Vector2<f64>,
    fy: Vector2<f64>,
    co: Vector2<f64>,
    missing: Axis,
) -> Result<[Vector2<f64>; 3]> {
    let d = fy - fx;
    let n = Vector2::new(-d.y, d.x);
    let num = co.norm_squared() + fx.dot(&fy) - co.dot(&(fx - fy));
    let den = fx.dot(&n) - co.dot(&n);
    if den == 0.0 || !den.is_finite() {
        return Err(CalibError::geometric(
            Stage::Pose,
            Some(missing),
            "known vanishing line passes through the assumed optical centre",
        ));
    }
    let fz = co + n * (num / den);
    debug!(
        "synthesized vanishing point {missing}: ({:.2}, {:.2})",
        fz.x, fz.y
    );

    let found = [fx, fy, fz];
    let order = CENTERED_ORDER[missing.index()];
    Ok([found[order[0]], found[order[1]], found[order[2]]])
}

/// Camera position and basis from canonical vanishing points and optical centre.
pub fn pose_from_vanishing_points(
    f: &[Vector2<f64>; 3],
    optical_center: Vector2<f64>,
) -> Result<CameraPose> {
    let [fx, fy, _] = *f;
    let z2 = (fx - fy).norm_squared()
        - (fx - optical_center).norm_squared()
        - (fy - optical_center).norm_squared();
    if !(z2 >= 0.0) || !z2.is_finite() {
        return Err(CalibError::geometric(
            Stage::Pose,
            None,
            format!("squared camera depth is {z2:.3}; guide lines are not mutually orthogonal"),
        ));
    }
    let z = -(z2 / 2.0).sqrt();
    let position = Vector3::new(optical_center.x, optical_center.y, z);

    let mut basis = [Vector3::zeros(); 3];
    for (axis, (slot, vp)) in Axis::ALL.iter().zip(basis.iter_mut().zip(f.iter())) {
        let dir = Vector3::new(vp.x, vp.y, 0.0) - position;
        let norm = dir.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(CalibError::geometric(
                Stage::Pose,
                Some(*axis),
                "vanishing point coincides with the camera centre",
            ));
        }
        *slot = dir / norm;
    }

    debug!(
        "pose: optical centre ({:.2}, {:.2}), camera depth {:.2}",
        optical_center.x, optical_center.y, z
    );
    Ok(CameraPose {
        basis,
        optical_center,
        position,
    })
}
