//! Pixel storage, clipped drawing regions and segment clipping.
//!
//! [`PixelBuffer`] owns pixels. [`Canvas`] borrows a rectangle of one and
//! exposes the drawing primitives the plotting code needs.

mod buffer;
mod canvas;

pub use buffer::PixelBuffer;
pub use canvas::{Canvas, Font};

use crate::geom::{PixelPoint, Rect};

/// Clip a segment to the pixels of `rect` (Cohen–Sutherland).
pub(crate) fn clip_segment(
    start: PixelPoint,
    end: PixelPoint,
    rect: Rect,
) -> Option<(PixelPoint, PixelPoint)> {
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const TOP: u8 = 4;
    const BOTTOM: u8 = 8;

    if rect.is_empty() {
        return None;
    }
    let (min_x, min_y) = (f64::from(rect.x), f64::from(rect.y));
    let (max_x, max_y) = (f64::from(rect.right() - 1), f64::from(rect.bottom() - 1));
    let region_code = |(x, y): (f64, f64)| {
        let mut code = 0;
        if x < min_x {
            code |= LEFT;
        } else if x > max_x {
            code |= RIGHT;
        }
        if y < min_y {
            code |= TOP;
        } else if y > max_y {
            code |= BOTTOM;
        }
        code
    };

    let mut start = (f64::from(start.x), f64::from(start.y));
    let mut end = (f64::from(end.x), f64::from(end.y));
    let mut out_start = region_code(start);
    let mut out_end = region_code(end);

    loop {
        if (out_start | out_end) == 0 {
            let round = |(x, y): (f64, f64)| PixelPoint::new(x.round() as i32, y.round() as i32);
            return Some((round(start), round(end)));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let point = if (out_code & TOP) != 0 {
            (start.0 + dx * (min_y - start.1) / dy, min_y)
        } else if (out_code & BOTTOM) != 0 {
            (start.0 + dx * (max_y - start.1) / dy, max_y)
        } else if (out_code & RIGHT) != 0 {
            (max_x, start.1 + dy * (max_x - start.0) / dx)
        } else {
            (min_x, start.1 + dy * (min_x - start.0) / dx)
        };

        if out_code == out_start {
            start = point;
            out_start = region_code(start);
        } else {
            end = point;
            out_end = region_code(end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_segment_inside() {
        let rect = Rect::new(0, 0, 11, 11);
        let start = PixelPoint::new(2, 2);
        let end = PixelPoint::new(8, 8);
        let clipped = clip_segment(start, end, rect).expect("segment should clip");
        assert_eq!(clipped, (start, end));
    }

    #[test]
    fn clip_segment_crossing() {
        let rect = Rect::new(0, 0, 11, 11);
        let clipped = clip_segment(PixelPoint::new(-10, 5), PixelPoint::new(20, 5), rect)
            .expect("crosses rect");
        assert_eq!(clipped, (PixelPoint::new(0, 5), PixelPoint::new(10, 5)));
        let diagonal = clip_segment(PixelPoint::new(-5, -5), PixelPoint::new(15, 15), rect)
            .expect("crosses rect");
        assert_eq!(diagonal, (PixelPoint::new(0, 0), PixelPoint::new(10, 10)));
    }

    #[test]
    fn clip_segment_outside() {
        let rect = Rect::new(0, 0, 11, 11);
        let (from, to) = (PixelPoint::new(-5, -1), PixelPoint::new(20, -1));
        assert!(clip_segment(from, to, rect).is_none());
        let (from, to) = (PixelPoint::new(1, 1), PixelPoint::new(2, 2));
        assert!(clip_segment(from, to, Rect::new(0, 0, 0, 5)).is_none());
    }
}
