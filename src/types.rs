use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer pixel coordinate `[x, y]`, the persisted form of guide points.
pub type PixelPoint = [i32; 2];

/// One of the three orthogonal world directions a guide segment follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(label)
    }
}

/// A guide edge given by its two integer endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelEdge {
    pub p0: PixelPoint,
    pub p1: PixelPoint,
}

impl PixelEdge {
    pub fn new(p0: PixelPoint, p1: PixelPoint) -> Self {
        Self { p0, p1 }
    }

    pub fn to_f64(&self) -> LineEdge {
        LineEdge {
            p0: Vector2::new(self.p0[0] as f64, self.p0[1] as f64),
            p1: Vector2::new(self.p1[0] as f64, self.p1[1] as f64),
        }
    }
}

/// Floating point edge used by the geometric solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineEdge {
    pub p0: Vector2<f64>,
    pub p1: Vector2<f64>,
}

impl LineEdge {
    pub fn new(p0: Vector2<f64>, p1: Vector2<f64>) -> Self {
        Self { p0, p1 }
    }
}

/// Camera pose recovered from vanishing points.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CameraPose {
    /// Rows are the unit X, Y, Z world directions seen from the camera.
    pub basis: [Vector3<f64>; 3],
    /// Principal point on the image plane.
    pub optical_center: Vector2<f64>,
    /// Camera centre; `z` is negative (in front of the image plane).
    pub position: Vector3<f64>,
}

impl CameraPose {
    /// Row-major `[Xx, Xy, Xz, Yx, ..., Zz]`.
    pub fn flattened_basis(&self) -> [f64; 9] {
        let mut out = [0.0; 9];
        for (row, v) in self.basis.iter().enumerate() {
            out[row * 3] = v.x;
            out[row * 3 + 1] = v.y;
            out[row * 3 + 2] = v.z;
        }
        out
    }
}
