use nalgebra::{Rotation3, Vector2};
use vanishing_calib::image::GrayImageU8;
use vanishing_calib::PixelPoint;

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> GrayImageU8 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            img[y * width + x] = if sum & 1 == 0 { 32 } else { 220 };
        }
    }
    GrayImageU8::new(width, height, img).expect("buffer matches dimensions")
}

/// Principal point and focal length of the synthetic camera, canvas pixels.
pub const PRINCIPAL_POINT: [f64; 2] = [600.0, 400.0];
pub const FOCAL: f64 = 800.0;

/// Rotation of the synthetic scene axes relative to the camera.
pub fn scene_rotation() -> Rotation3<f64> {
    Rotation3::from_euler_angles(0.3, -0.5, 0.2)
}

/// Exact vanishing points of the rotated X, Y and Z axes.
pub fn projected_vanishing_points(rotation: &Rotation3<f64>) -> [Vector2<f64>; 3] {
    let m = rotation.matrix();
    std::array::from_fn(|i| {
        let col = m.column(i);
        Vector2::new(
            PRINCIPAL_POINT[0] + FOCAL * col.x / col.z,
            PRINCIPAL_POINT[1] + FOCAL * col.y / col.z,
        )
    })
}

/// Integer guide points for the synthetic camera: three edges per axis, each
/// starting at a fixed point and heading 250 px towards the vanishing point.
pub fn guide_points_towards(vps: &[Vector2<f64>; 3]) -> [Vec<PixelPoint>; 3] {
    const STARTS: [[[i32; 2]; 3]; 3] = [
        [[300, 200], [350, 650], [900, 300]],
        [[200, 150], [800, 200], [1000, 600]],
        [[150, 600], [700, 700], [1100, 250]],
    ];
    std::array::from_fn(|axis| {
        let vp = vps[axis];
        let mut points = Vec::with_capacity(6);
        for start in STARTS[axis] {
            let p = Vector2::new(start[0] as f64, start[1] as f64);
            let q = p + (vp - p).normalize() * 250.0;
            points.push(start);
            points.push([q.x.round() as i32, q.y.round() as i32]);
        }
        points
    })
}
