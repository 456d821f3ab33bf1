//! Affine mapping from value space into pixel space.

use crate::bounds::Range;
use crate::geom::PixelPoint;

/// Per-axis scale and offset: `pixel = value * scale + offset`.
///
/// Y is inverted so larger values land on smaller row indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// X scale.
    pub xs: f64,
    /// X offset.
    pub xd: f64,
    /// Y scale.
    pub ys: f64,
    /// Y offset.
    pub yd: f64,
}

impl Transform {
    /// Fit the value ranges into a `width × height` area inset by `border`.
    ///
    /// A degenerate range maps with unit scale.
    pub fn fit(x: Range, y: Range, width: i32, height: i32, border: i32) -> Self {
        let xs = if x.max != x.min {
            f64::from(width - 2 * border) / (x.max - x.min)
        } else {
            1.0
        };
        let xd = f64::from(border) - x.min * xs;
        let ys = if y.max != y.min {
            f64::from(height - 2 * border) / (y.min - y.max)
        } else {
            1.0
        };
        let yd = f64::from(height) - y.min * ys - f64::from(border);
        Self { xs, xd, ys, yd }
    }

    /// Pixel column of an X value.
    pub fn px(&self, x: f64) -> i32 {
        (x * self.xs + self.xd) as i32
    }

    /// Pixel row of a Y value.
    pub fn py(&self, y: f64) -> i32 {
        (y * self.ys + self.yd) as i32
    }

    /// Pixel position of a value pair.
    pub fn to_pixel(&self, x: f64, y: f64) -> PixelPoint {
        PixelPoint::new(self.px(x), self.py(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_inside_border() {
        let transform = Transform::fit(Range::new(0.0, 10.0), Range::new(0.0, 10.0), 300, 200, 50);
        assert_eq!(transform.to_pixel(0.0, 0.0), PixelPoint::new(50, 150));
        assert_eq!(transform.to_pixel(10.0, 10.0), PixelPoint::new(250, 50));
        assert_eq!(transform.px(5.0), 150);
    }

    #[test]
    fn degenerate_range_uses_unit_scale() {
        let transform = Transform::fit(Range::new(2.0, 2.0), Range::new(1.0, 1.0), 100, 100, 10);
        assert_eq!(transform.xs, 1.0);
        assert_eq!(transform.ys, 1.0);
        assert_eq!(transform.px(2.0), 10);
        assert_eq!(transform.py(1.0), 90);
        assert_eq!(transform.py(0.0), 89);
    }
}
