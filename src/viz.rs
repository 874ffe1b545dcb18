//! Diagnostic overlays of guide segments on the display canvas.
use crate::canvas::{CanvasMapping, CanvasSize};
use crate::error::Result;
use crate::image::io::save_rgb_image;
use crate::record::GuideSegments;
use crate::refine::BresenhamLine;
use crate::types::{Axis, PixelEdge, PixelPoint};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::PathBuf;

/// Receives canvas-space guide segments for display.
pub trait SegmentSink {
    fn show(&mut self, label: &str, image: &RgbImage, segments: &GuideSegments) -> Result<()>;
}

/// Red, green and blue for the X, Y and Z axes.
pub const AXIS_COLORS: [Rgb<u8>; 3] = [Rgb([255, 0, 0]), Rgb([0, 255, 0]), Rgb([0, 0, 255])];

/// Letterboxes the image onto the canvas, draws the segments and saves a PNG
/// per label into `out_dir`.
#[derive(Clone, Debug)]
pub struct OverlayRenderer {
    out_dir: PathBuf,
    mapping: CanvasMapping,
    thickness: u32,
}

impl OverlayRenderer {
    pub fn new(out_dir: impl Into<PathBuf>, mapping: CanvasMapping) -> Self {
        Self {
            out_dir: out_dir.into(),
            mapping,
            thickness: 1,
        }
    }

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Canvas image with `segments` drawn on top.
    pub fn render(&self, image: &RgbImage, segments: &GuideSegments) -> RgbImage {
        let canvas = self.mapping.canvas;
        let mut out = RgbImage::new(canvas.width, canvas.height);
        let (sw, sh) = self.mapping.scaled_extent();
        if sw > 0 && sh > 0 {
            let scaled = imageops::resize(image, sw, sh, FilterType::Triangle);
            imageops::overlay(
                &mut out,
                &scaled,
                self.mapping.offset_x as i64,
                self.mapping.offset_y as i64,
            );
        }
        let half = (self.thickness / 2) as i32;
        for axis in Axis::ALL {
            let color = AXIS_COLORS[axis.index()];
            for edge in segments.edges(axis) {
                let Some(edge) = clip_to_canvas(&edge, canvas, half) else {
                    continue;
                };
                for [x, y] in BresenhamLine::new(edge.p0, edge.p1) {
                    for dy in -half..=half {
                        for dx in -half..=half {
                            put(&mut out, x + dx, y + dy, color);
                        }
                    }
                }
            }
        }
        out
    }
}

/// Liang-Barsky clip of `edge` to the canvas grown by `margin` pixels.
///
/// Records may hold coordinates far outside the canvas; only the visible part
/// is rasterized. `None` when nothing of the edge is visible.
fn clip_to_canvas(edge: &PixelEdge, canvas: CanvasSize, margin: i32) -> Option<PixelEdge> {
    let e = edge.to_f64();
    let m = margin as f64;
    let (xmin, ymin) = (-m, -m);
    let (xmax, ymax) = (canvas.width as f64 - 1.0 + m, canvas.height as f64 - 1.0 + m);
    let d = e.p1 - e.p0;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-d.x, e.p0.x - xmin),
        (d.x, xmax - e.p0.x),
        (-d.y, e.p0.y - ymin),
        (d.y, ymax - e.p0.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    let at = |t: f64| -> PixelPoint {
        let p = e.p0 + d * t;
        [p.x.round() as i32, p.y.round() as i32]
    };
    Some(PixelEdge::new(at(t0), at(t1)))
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

impl SegmentSink for OverlayRenderer {
    fn show(&mut self, label: &str, image: &RgbImage, segments: &GuideSegments) -> Result<()> {
        let path = self.out_dir.join(format!("{label}.png"));
        save_rgb_image(&self.render(image, segments), &path)?;
        log::info!("overlay written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_axes_in_their_colors() {
        let mapping = CanvasMapping::fit(60, 40, CanvasSize { width: 120, height: 80 })
            .expect("mapping");
        let renderer = OverlayRenderer::new("unused", mapping);
        let image = RgbImage::from_pixel(60, 40, Rgb([10, 10, 10]));
        let segments = GuideSegments::new([
            vec![[5, 5], [50, 5]],
            vec![[5, 20], [5, 70]],
            vec![[100, 10], [100, 60]],
        ])
        .expect("segments");
        let out = renderer.render(&image, &segments);
        assert_eq!(out.dimensions(), (120, 80));
        assert_eq!(*out.get_pixel(20, 5), AXIS_COLORS[0]);
        assert_eq!(*out.get_pixel(5, 40), AXIS_COLORS[1]);
        assert_eq!(*out.get_pixel(100, 30), AXIS_COLORS[2]);
        assert_eq!(*out.get_pixel(60, 40), Rgb([10, 10, 10]));
    }

    #[test]
    fn far_out_segments_are_clipped() {
        let canvas = CanvasSize { width: 120, height: 80 };
        let mapping = CanvasMapping::fit(60, 40, canvas).expect("mapping");
        let renderer = OverlayRenderer::new("unused", mapping);
        let segments = GuideSegments::new([
            vec![[-2_000_000_000, 30], [2_000_000_000, 30]],
            vec![[i32::MIN, i32::MIN], [i32::MIN + 10, i32::MIN]],
            vec![],
        ])
        .expect("segments");
        let out = renderer.render(&RgbImage::new(60, 40), &segments);
        assert_eq!(*out.get_pixel(0, 30), AXIS_COLORS[0]);
        assert_eq!(*out.get_pixel(119, 30), AXIS_COLORS[0]);

        let clipped = clip_to_canvas(&PixelEdge::new([-50, 10], [200, 10]), canvas, 0)
            .expect("visible");
        assert_eq!(clipped, PixelEdge::new([0, 10], [119, 10]));
        assert!(clip_to_canvas(&PixelEdge::new([0, -5], [100, -5]), canvas, 1).is_none());
    }

    #[test]
    fn sink_saves_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mapping = CanvasMapping::fit(30, 20, CanvasSize { width: 60, height: 40 })
            .expect("mapping");
        let mut renderer = OverlayRenderer::new(dir.path(), mapping).with_thickness(3);
        let image = RgbImage::new(30, 20);
        renderer
            .show("pair_left", &image, &GuideSegments::default())
            .expect("show");
        assert!(dir.path().join("pair_left.png").exists());
    }
}
