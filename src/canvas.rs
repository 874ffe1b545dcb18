//! Native-pixel ↔ display-canvas coordinate mapping.
//!
//! Guide points are marked on a fixed-size canvas (1200×800 by default) onto
//! which the image is scaled to fit and centred along the slack dimension. The
//! persisted records store canvas coordinates; the edge refiner and the stereo
//! propagator work in native pixels.
//!
//! Integer conversions truncate toward zero in both directions, which is how
//! the marking tool and the stored records round. An integer round trip
//! native → canvas → native is within one pixel only when the image is
//! upscaled; a downscaled image loses up to `ceil(1 / scale)` native pixels
//! (about 4 px for a 4000×3000 image). The floating point conversions are
//! exact inverses of each other.

use crate::error::{CalibError, Result, Stage};
use crate::types::PixelPoint;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Display canvas extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl CanvasSize {
    /// Canvas midpoint, used as the assumed optical centre in centered mode.
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// Scale plus letterbox offsets mapping an image onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CanvasMapping {
    pub scale: f64,
    pub offset_x: i32,
    pub offset_y: i32,
    pub image_width: u32,
    pub image_height: u32,
    pub canvas: CanvasSize,
}

impl CanvasMapping {
    /// Fit an `image_width × image_height` image into `canvas`, preserving its
    /// aspect ratio. The slack dimension is split evenly (truncated).
    pub fn fit(image_width: u32, image_height: u32, canvas: CanvasSize) -> Result<Self> {
        if image_width == 0 || image_height == 0 || canvas.width == 0 || canvas.height == 0 {
            return Err(CalibError::validation(
                Stage::Canvas,
                None,
                format!(
                    "cannot map a {image_width}x{image_height} image onto a {}x{} canvas",
                    canvas.width, canvas.height
                ),
            ));
        }
        let (iw, ih) = (image_width as f64, image_height as f64);
        let (cw, ch) = (canvas.width as f64, canvas.height as f64);
        let aspect_canvas = cw / ch;
        let aspect_image = iw / ih;

        let (scale, offset_x, offset_y) = if aspect_canvas > aspect_image {
            let scale = ch / ih;
            (scale, ((cw - scale * iw) / 2.0).trunc() as i32, 0)
        } else {
            let scale = cw / iw;
            (scale, 0, ((ch - scale * ih) / 2.0).trunc() as i32)
        };

        Ok(Self {
            scale,
            offset_x,
            offset_y,
            image_width,
            image_height,
            canvas,
        })
    }

    /// Size of the scaled image inside the canvas.
    pub fn scaled_extent(&self) -> (u32, u32) {
        (
            (self.scale * self.image_width as f64) as u32,
            (self.scale * self.image_height as f64) as u32,
        )
    }

    #[inline]
    pub fn to_canvas(&self, p: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.scale * p.x + self.offset_x as f64,
            self.scale * p.y + self.offset_y as f64,
        )
    }

    #[inline]
    pub fn to_native(&self, p: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            (p.x - self.offset_x as f64) / self.scale,
            (p.y - self.offset_y as f64) / self.scale,
        )
    }

    /// Native pixel → canvas pixel, truncating.
    #[inline]
    pub fn to_canvas_px(&self, p: PixelPoint) -> PixelPoint {
        let c = self.to_canvas(Vector2::new(p[0] as f64, p[1] as f64));
        [c.x as i32, c.y as i32]
    }

    /// Canvas pixel → native pixel, truncating.
    #[inline]
    pub fn to_native_px(&self, p: PixelPoint) -> PixelPoint {
        let n = self.to_native(Vector2::new(p[0] as f64, p[1] as f64));
        [n.x as i32, n.y as i32]
    }
}
