//! Owned RGB8 pixel storage.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::color::Color;
use crate::error::PlotError;
use crate::geom::{Offset, Rect, Size};

/// Row-major RGB8 image, three bytes per pixel.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Allocate a buffer filled with one color.
    pub fn new(size: Size, fill: Color) -> Self {
        let pixels = size.width as usize * size.height as usize;
        let mut data = Vec::with_capacity(pixels * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&fill.channels());
        }
        Self {
            width: size.width,
            height: size.height,
            data,
        }
    }

    /// Wrap raw RGB8 bytes. Returns `None` when the length does not match.
    pub fn from_raw(size: Size, data: Vec<u8>) -> Option<Self> {
        (data.len() == size.width as usize * size.height as usize * 3).then_some(Self {
            width: size.width,
            height: size.height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Rectangle covering the whole buffer.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Check whether the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Raw RGB8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }

    /// Color at a pixel, `None` outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.index(x, y)?;
        Some(Color::rgb(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Set a pixel; writes outside the buffer are dropped.
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 3].copy_from_slice(&color.channels());
        }
    }

    /// Fill a horizontal run `x0..x1` on row `y`, clipped to the buffer.
    pub(crate) fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: Color) {
        if y < 0 || y as u32 >= self.height {
            return;
        }
        let x0 = x0.max(0);
        let x1 = x1.min(self.width as i32);
        if x0 >= x1 {
            return;
        }
        let start = (y as usize * self.width as usize + x0 as usize) * 3;
        let end = start + (x1 - x0) as usize * 3;
        let rgb = color.channels();
        for pixel in self.data[start..end].chunks_exact_mut(3) {
            pixel.copy_from_slice(&rgb);
        }
    }

    /// Fill a rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.intersect(&self.bounds());
        for y in rect.y..rect.bottom() {
            self.fill_span(y, rect.x, rect.right(), color);
        }
    }

    /// Copy out a region. The region is clipped to the buffer first.
    pub fn region(&self, rect: Rect) -> PixelBuffer {
        let rect = rect.intersect(&self.bounds());
        let size = rect.size();
        let mut out = PixelBuffer::new(size, Color::BLACK);
        let row = size.width as usize * 3;
        for dy in 0..rect.height {
            if let (Some(src), Some(dst)) = (self.index(rect.x, rect.y + dy), out.index(0, dy)) {
                let source = &self.data[src..src + row];
                out.data[dst..dst + row].copy_from_slice(source);
            }
        }
        out
    }

    /// Paste `src` with its top-left corner at `at`, clipped to this buffer.
    pub fn paste(&mut self, src: &PixelBuffer, at: Offset) {
        let target =
            Rect::new(at.x, at.y, src.width as i32, src.height as i32).intersect(&self.bounds());
        if target.is_empty() {
            return;
        }
        let row = target.width as usize * 3;
        for y in target.y..target.bottom() {
            let source = src.index(target.x - at.x, y - at.y);
            let (Some(s), Some(d)) = (source, self.index(target.x, y)) else {
                continue;
            };
            self.data[d..d + row].copy_from_slice(&src.data[s..s + row]);
        }
    }

    /// Blend `src` over this buffer at `at`: `dst = src * weight + dst * (1 - weight)`.
    pub fn blend(&mut self, src: &PixelBuffer, at: Offset, weight: f32) {
        let weight = weight.clamp(0.0, 1.0);
        let target =
            Rect::new(at.x, at.y, src.width as i32, src.height as i32).intersect(&self.bounds());
        if target.is_empty() {
            return;
        }
        let row = target.width as usize * 3;
        for y in target.y..target.bottom() {
            let source = src.index(target.x - at.x, y - at.y);
            let (Some(s), Some(d)) = (source, self.index(target.x, y)) else {
                continue;
            };
            let src_row = &src.data[s..s + row];
            for (dst, &value) in self.data[d..d + row].iter_mut().zip(src_row) {
                let mixed = f32::from(value) * weight + f32::from(*dst) * (1.0 - weight);
                *dst = mixed.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    /// New buffer of `size` holding this buffer's overlapping content, with
    /// the remaining area set to `fill`.
    pub fn regrow(&self, size: Size, fill: Color) -> PixelBuffer {
        let mut out = PixelBuffer::new(size, fill);
        if !self.is_empty() && !size.is_empty() {
            out.paste(self, Offset::default());
        }
        out
    }

    /// Rescale to `size` with bilinear filtering.
    pub fn resized(&self, size: Size) -> PixelBuffer {
        if size == self.size() {
            return self.clone();
        }
        if self.is_empty() || size.is_empty() {
            return PixelBuffer::new(size, Color::BLACK);
        }
        let scaled = imageops::resize(
            &self.to_image(),
            size.width,
            size.height,
            FilterType::Triangle,
        );
        PixelBuffer::from(scaled)
    }

    /// Copy into an `image` buffer.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    /// Encode as PNG at maximum compression.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), PlotError> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        let encoder =
            PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
        encoder.write_image(&self.data, self.width, self.height, ExtendedColorType::Rgb8)?;
        Ok(())
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_every_pixel() {
        let buffer = PixelBuffer::new(Size::new(4, 3), Color::rgb(1, 2, 3));
        assert_eq!(buffer.as_bytes().len(), 36);
        assert_eq!(buffer.get(3, 2), Some(Color::rgb(1, 2, 3)));
        assert_eq!(buffer.get(4, 0), None);
        assert_eq!(buffer.get(-1, 0), None);
    }

    #[test]
    fn from_raw_checks_length() {
        let buffer =
            PixelBuffer::from_raw(Size::new(2, 1), vec![1, 2, 3, 4, 5, 6]).expect("two pixels");
        assert_eq!(buffer.get(0, 0), Some(Color::rgb(1, 2, 3)));
        assert_eq!(buffer.get(1, 0), Some(Color::rgb(4, 5, 6)));
        assert!(PixelBuffer::from_raw(Size::new(2, 1), vec![0; 5]).is_none());
        assert!(PixelBuffer::from_raw(Size::new(2, 2), vec![0; 6]).is_none());
    }

    #[test]
    fn regrow_preserves_overlap() {
        let mut buffer = PixelBuffer::new(Size::new(10, 10), Color::BLACK);
        buffer.put(7, 8, Color::RED);
        let grown = buffer.regrow(Size::new(20, 15), Color::GRAY);
        assert_eq!(grown.get(7, 8), Some(Color::RED));
        assert_eq!(grown.get(0, 0), Some(Color::BLACK));
        assert_eq!(grown.get(15, 12), Some(Color::GRAY));
        let shrunk = grown.regrow(Size::new(8, 9), Color::GRAY);
        assert_eq!(shrunk.get(7, 8), Some(Color::RED));
    }

    #[test]
    fn blend_rounds_weighted_mix() {
        let mut dst = PixelBuffer::new(Size::new(2, 2), Color::gray(100));
        let src = PixelBuffer::new(Size::new(1, 1), Color::gray(201));
        dst.blend(&src, Offset::new(1, 1), 0.5);
        assert_eq!(dst.get(1, 1), Some(Color::gray(151)));
        assert_eq!(dst.get(0, 0), Some(Color::gray(100)));
    }

    #[test]
    fn region_and_paste_clip() {
        let mut buffer = PixelBuffer::new(Size::new(5, 5), Color::BLACK);
        buffer.fill_rect(Rect::new(3, 3, 10, 10), Color::WHITE);
        let region = buffer.region(Rect::new(2, 2, 10, 10));
        assert_eq!(region.size(), Size::new(3, 3));
        assert_eq!(region.get(0, 0), Some(Color::BLACK));
        assert_eq!(region.get(1, 1), Some(Color::WHITE));
        let mut target = PixelBuffer::new(Size::new(4, 4), Color::RED);
        target.paste(&region, Offset::new(-1, -1));
        assert_eq!(target.get(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn resize_changes_dimensions() {
        let buffer = PixelBuffer::new(Size::new(8, 4), Color::BLUE);
        let resized = buffer.resized(Size::new(3, 5));
        assert_eq!(resized.size(), Size::new(3, 5));
        let pixel = resized.get(1, 1).expect("pixel inside resized buffer");
        assert!(pixel.b >= 250 && pixel.r <= 5);
    }
}
