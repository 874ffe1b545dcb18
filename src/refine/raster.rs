//! Integer line rasterization.
use crate::types::PixelPoint;

/// Bresenham rasterization of the closed segment `start..=end`.
///
/// Yields `max(|dx|, |dy|) + 1` pixels, `start` first and `end` last, without
/// allocating. Error terms are kept in `i64` so any pair of `i32` endpoints
/// is accepted.
#[derive(Clone, Debug)]
pub struct BresenhamLine {
    x: i32,
    y: i32,
    x1: i32,
    y1: i32,
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: PixelPoint, end: PixelPoint) -> Self {
        let [x0, y0] = start;
        let [x1, y1] = end;
        let dx = (i64::from(x1) - i64::from(x0)).abs();
        let dy = -(i64::from(y1) - i64::from(y0)).abs();
        Self {
            x: x0,
            y: y0,
            x1,
            y1,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = PixelPoint;

    fn next(&mut self) -> Option<PixelPoint> {
        if self.done {
            return None;
        }
        let current = [self.x, self.y];
        if self.x == self.x1 && self.y == self.y1 {
            self.done = true;
            return Some(current);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            if self.x == self.x1 {
                self.done = true;
                return Some(current);
            }
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            if self.y == self.y1 {
                self.done = true;
                return Some(current);
            }
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}
