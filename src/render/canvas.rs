//! Clipped drawing regions over a [`PixelBuffer`].

use std::convert::Infallible;

use embedded_graphics::geometry::{Point as EgPoint, Size as EgSize};
use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X10, FONT_6X13, FONT_9X15, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use super::{PixelBuffer, clip_segment};
use crate::color::Color;
use crate::geom::{PixelPoint, Rect, Size};

/// Bitmap font sizes available for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    /// 5×8 glyphs, used for tick labels.
    Tiny,
    /// 6×10 glyphs, used for legends.
    #[default]
    Small,
    /// 6×13 glyphs, used for view titles.
    Medium,
    /// 9×15 glyphs.
    Large,
    /// 10×20 glyphs.
    Huge,
}

impl Font {
    /// Largest font whose glyph height does not exceed `height` pixels.
    pub fn for_height(height: f64) -> Self {
        match height {
            h if h >= 20.0 => Self::Huge,
            h if h >= 15.0 => Self::Large,
            h if h >= 13.0 => Self::Medium,
            h if h >= 10.0 => Self::Small,
            _ => Self::Tiny,
        }
    }

    fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Self::Tiny => &FONT_5X8,
            Self::Small => &FONT_6X10,
            Self::Medium => &FONT_6X13,
            Self::Large => &FONT_9X15,
            Self::Huge => &FONT_10X20,
        }
    }

    /// Pixel extent of a single line of text.
    pub fn text_size(self, text: &str) -> Size {
        let font = self.mono();
        let count = text.chars().count() as u32;
        let width = if count == 0 {
            0
        } else {
            count * font.character_size.width + (count - 1) * font.character_spacing
        };
        Size::new(width, font.character_size.height)
    }

    /// Distance from the glyph top to the baseline.
    pub fn ascent(self) -> i32 {
        self.mono().baseline as i32
    }
}

impl From<Color> for Rgb888 {
    fn from(color: Color) -> Self {
        Rgb888::new(color.r, color.g, color.b)
    }
}

/// A rectangle of a [`PixelBuffer`] with its own coordinate origin.
///
/// Coordinates passed to drawing methods are relative to the top-left corner
/// of the region; anything outside the region or the buffer is discarded.
/// Colors are drawn opaque, translucency goes through a
/// [`Compositor`](crate::Compositor).
pub struct Canvas<'a> {
    buffer: &'a mut PixelBuffer,
    rect: Rect,
}

impl<'a> Canvas<'a> {
    /// Region `rect` of `buffer`.
    pub fn new(buffer: &'a mut PixelBuffer, rect: Rect) -> Self {
        Self { buffer, rect }
    }

    /// The whole buffer.
    pub fn full(buffer: &'a mut PixelBuffer) -> Self {
        let rect = buffer.bounds();
        Self { buffer, rect }
    }

    /// Shorter-lived canvas over the same region.
    pub fn reborrow(&mut self) -> Canvas<'_> {
        Canvas {
            buffer: &mut *self.buffer,
            rect: self.rect,
        }
    }

    /// Region in buffer coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Region width.
    pub fn width(&self) -> i32 {
        self.rect.width.max(0)
    }

    /// Region height.
    pub fn height(&self) -> i32 {
        self.rect.height.max(0)
    }

    /// Part of the region backed by the buffer, in buffer coordinates.
    pub(crate) fn clip(&self) -> Rect {
        self.rect.intersect(&self.buffer.bounds())
    }

    fn local_bounds(&self) -> Rect {
        self.clip().translate(-self.rect.x, -self.rect.y)
    }

    /// Color at a local pixel.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if !self.local_bounds().contains(x, y) {
            return None;
        }
        self.buffer.get(self.rect.x + x, self.rect.y + y)
    }

    /// Set a local pixel.
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if self.local_bounds().contains(x, y) {
            self.buffer.put(self.rect.x + x, self.rect.y + y, color);
        }
    }

    fn span(&mut self, y: i32, x0: i32, x1: i32, color: Color) {
        let local = self.local_bounds();
        if y < local.y || y >= local.bottom() {
            return;
        }
        let (x0, x1) = (x0.max(local.x), x1.min(local.right()));
        let (left, top) = (self.rect.x, self.rect.y);
        self.buffer.fill_span(top + y, left + x0, left + x1, color);
    }

    /// Fill the whole region.
    pub fn fill(&mut self, color: Color) {
        let clip = self.clip();
        self.buffer.fill_rect(clip, color);
    }

    /// Fill the rectangle spanned by two corners, both inclusive.
    pub fn fill_corners(&mut self, a: PixelPoint, b: PixelPoint, color: Color) {
        let local = self.local_bounds();
        let rows = a.y.min(b.y).max(local.y)..=a.y.max(b.y).min(local.bottom() - 1);
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x).saturating_add(1));
        for y in rows {
            self.span(y, x0, x1, color);
        }
    }

    /// Fill a local rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.fill_corners(
            PixelPoint::new(rect.x, rect.y),
            PixelPoint::new(rect.right() - 1, rect.bottom() - 1),
            color,
        );
    }

    /// One-pixel outline of the rectangle spanned by two inclusive corners.
    pub fn stroke_corners(&mut self, a: PixelPoint, b: PixelPoint, color: Color) {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        self.fill_corners(PixelPoint::new(x0, y0), PixelPoint::new(x1, y0), color);
        self.fill_corners(PixelPoint::new(x0, y1), PixelPoint::new(x1, y1), color);
        self.fill_corners(PixelPoint::new(x0, y0), PixelPoint::new(x0, y1), color);
        self.fill_corners(PixelPoint::new(x1, y0), PixelPoint::new(x1, y1), color);
    }

    /// One-pixel line between two points, clipped to the region.
    pub fn line(&mut self, from: PixelPoint, to: PixelPoint, color: Color) {
        let Some((from, to)) = clip_segment(from, to, self.local_bounds()) else {
            return;
        };
        let line = Line::new(EgPoint::new(from.x, from.y), EgPoint::new(to.x, to.y));
        let style = PrimitiveStyle::with_stroke(color.into(), 1);
        let _ = line.into_styled(style).draw(self);
    }

    /// Fill a convex polygon, edges included.
    pub fn fill_convex(&mut self, points: &[PixelPoint], color: Color) {
        let Some(top) = points.iter().map(|p| p.y).min() else {
            return;
        };
        let bottom = points.iter().map(|p| p.y).max().unwrap_or(top);
        let local = self.local_bounds();
        let edges = points.iter().zip(points.iter().cycle().skip(1));
        let edges: Vec<(PixelPoint, PixelPoint)> = edges.map(|(a, b)| (*a, *b)).collect();
        for y in top.max(local.y)..=bottom.min(local.bottom() - 1) {
            let mut span: Option<(f64, f64)> = None;
            for &(a, b) in &edges {
                let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
                if y < lo || y > hi {
                    continue;
                }
                let (ax, ay) = (f64::from(a.x), f64::from(a.y));
                let (bx, by) = (f64::from(b.x), f64::from(b.y));
                let xs = if a.y == b.y {
                    [ax, bx]
                } else {
                    let x = ax + (f64::from(y) - ay) / (by - ay) * (bx - ax);
                    [x, x]
                };
                span = Some(match span {
                    None => (xs[0].min(xs[1]), xs[0].max(xs[1])),
                    Some((l, r)) => (l.min(xs[0]).min(xs[1]), r.max(xs[0]).max(xs[1])),
                });
            }
            if let Some((l, r)) = span {
                let (x0, x1) = (l.round() as i32, (r.round() as i32).saturating_add(1));
                self.span(y, x0, x1, color);
            }
        }
    }

    /// Fill a disc of `radius` pixels around `center`.
    pub fn fill_circle(&mut self, center: PixelPoint, radius: i32, color: Color) {
        let radius = i64::from(radius.max(0));
        let local = self.local_bounds();
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let first = (cy - radius).max(i64::from(local.y));
        let last = (cy + radius).min(i64::from(local.bottom()) - 1);
        for y in first..=last {
            let dy = y - cy;
            let half = ((radius * radius - dy * dy) as f64).sqrt().floor() as i64;
            let (x0, x1) = (cx - half, cx + half + 1);
            self.span(y as i32, saturate(x0), saturate(x1), color);
        }
    }

    /// One-pixel circle outline.
    pub fn stroke_circle(&mut self, center: PixelPoint, radius: i32, color: Color) {
        let radius = radius.max(0);
        let local = self.local_bounds();
        let (cx, cy, r) = (i64::from(center.x), i64::from(center.y), i64::from(radius));
        if cx + r < i64::from(local.x)
            || cx - r >= i64::from(local.right())
            || cy + r < i64::from(local.y)
            || cy - r >= i64::from(local.bottom())
        {
            return;
        }
        let diameter = 2 * radius.unsigned_abs() + 1;
        let circle = Circle::with_center(EgPoint::new(center.x, center.y), diameter);
        let _ = circle
            .into_styled(PrimitiveStyle::with_stroke(color.into(), 1))
            .draw(self);
    }

    /// Draw text with its baseline starting at `origin`.
    pub fn text(&mut self, text: &str, origin: PixelPoint, font: Font, color: Color) {
        let style = MonoTextStyle::new(font.mono(), color.into());
        let origin = EgPoint::new(origin.x, origin.y);
        let text = Text::with_baseline(text, origin, style, Baseline::Alphabetic);
        let _ = text.draw(self);
    }

    /// Copy `image` into the region at its origin.
    pub fn image(&mut self, image: &PixelBuffer) {
        let clip = self.clip();
        let (x, y) = (clip.x - self.rect.x, clip.y - self.rect.y);
        let visible = image.region(Rect::new(x, y, clip.width, clip.height));
        self.buffer.paste(&visible, clip.offset());
    }

    /// Copy of the visible region.
    pub(crate) fn snapshot(&self) -> PixelBuffer {
        self.buffer.region(self.clip())
    }

    /// Blend a snapshot-shaped buffer back over the visible region.
    pub(crate) fn blend_back(&mut self, layer: &PixelBuffer, weight: f32) {
        let at = self.clip().offset();
        self.buffer.blend(layer, at, weight);
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> EgSize {
        EgSize::new(self.width() as u32, self.height() as u32)
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let color = Color::rgb(color.r(), color.g(), color.b());
            self.put(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let rect = Rect::new(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
        );
        self.fill_rect(rect, Color::rgb(color.r(), color.g(), color.b()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> PixelBuffer {
        PixelBuffer::new(Size::new(40, 30), Color::BLACK)
    }

    #[test]
    fn drawing_is_clipped_to_region() {
        let mut buffer = buffer();
        let mut canvas = Canvas::new(&mut buffer, Rect::new(10, 10, 5, 5));
        canvas.fill(Color::WHITE);
        let (from, to) = (PixelPoint::new(-100, 2), PixelPoint::new(100, 2));
        canvas.line(from, to, Color::RED);
        assert_eq!(buffer.get(9, 10), Some(Color::BLACK));
        assert_eq!(buffer.get(10, 10), Some(Color::WHITE));
        assert_eq!(buffer.get(14, 12), Some(Color::RED));
        assert_eq!(buffer.get(15, 12), Some(Color::BLACK));
    }

    #[test]
    fn region_beyond_buffer_is_safe() {
        let mut buffer = buffer();
        let mut canvas = Canvas::new(&mut buffer, Rect::new(35, 25, 20, 20));
        canvas.fill_circle(PixelPoint::new(2, 2), 1_000_000, Color::GREEN);
        let triangle = [
            PixelPoint::new(-5, -5),
            PixelPoint::new(50, -5),
            PixelPoint::new(50, 50),
        ];
        canvas.fill_convex(&triangle, Color::BLUE);
        assert_eq!(canvas.get(6, 0), None);
        assert_eq!(buffer.get(39, 25), Some(Color::BLUE));
        assert_eq!(buffer.get(34, 25), Some(Color::BLACK));
    }

    #[test]
    fn corners_are_inclusive() {
        let mut buffer = buffer();
        let mut canvas = Canvas::full(&mut buffer);
        canvas.fill_corners(PixelPoint::new(5, 6), PixelPoint::new(2, 3), Color::WHITE);
        assert_eq!(canvas.get(2, 3), Some(Color::WHITE));
        assert_eq!(canvas.get(5, 6), Some(Color::WHITE));
        assert_eq!(canvas.get(6, 6), Some(Color::BLACK));
        canvas.stroke_corners(PixelPoint::new(10, 10), PixelPoint::new(14, 14), Color::RED);
        assert_eq!(canvas.get(10, 12), Some(Color::RED));
        assert_eq!(canvas.get(12, 12), Some(Color::BLACK));
    }

    #[test]
    fn circles_and_polygons_cover_center() {
        let mut buffer = buffer();
        let mut canvas = Canvas::full(&mut buffer);
        canvas.fill_circle(PixelPoint::new(10, 10), 3, Color::GREEN);
        assert_eq!(canvas.get(10, 13), Some(Color::GREEN));
        assert_eq!(canvas.get(13, 13), Some(Color::BLACK));
        canvas.fill_convex(
            &[
                PixelPoint::new(20, 5),
                PixelPoint::new(30, 5),
                PixelPoint::new(30, 15),
                PixelPoint::new(20, 15),
            ],
            Color::BLUE,
        );
        assert_eq!(canvas.get(25, 10), Some(Color::BLUE));
        assert_eq!(canvas.get(30, 15), Some(Color::BLUE));
        canvas.stroke_circle(PixelPoint::new(5, 25), 2, Color::RED);
        assert_eq!(canvas.get(5, 25), Some(Color::BLACK));
    }

    #[test]
    fn text_lands_above_baseline() {
        let mut buffer = buffer();
        let mut canvas = Canvas::full(&mut buffer);
        canvas.text("8", PixelPoint::new(2, 20), Font::Small, Color::WHITE);
        let lit = (10..20).any(|y| (2..8).any(|x| canvas.get(x, y) == Some(Color::WHITE)));
        assert!(lit);
        assert!((0..40).all(|x| canvas.get(x, 25) == Some(Color::BLACK)));
        assert_eq!(Font::Small.text_size("abc"), Size::new(18, 10));
        assert_eq!(Font::Small.text_size(""), Size::new(0, 10));
    }
}
