//! Scoped alpha compositing over a [`Canvas`].
//!
//! Drawing primitives only paint opaque pixels. A [`Compositor`] hands out a
//! layer per alpha value: opaque draws go straight to the target, any other
//! alpha draws into a copy of the target region which is blended back when
//! the alpha changes, on [`Compositor::flush`], or when the compositor drops.

use crate::geom::Rect;
use crate::render::{Canvas, PixelBuffer};

/// Alpha-blend scope over a canvas.
///
/// ```
/// use pixel_plot::{Canvas, Color, Compositor, PixelBuffer, Size};
///
/// let mut buffer = PixelBuffer::new(Size::new(4, 4), Color::BLACK);
/// let mut canvas = Canvas::full(&mut buffer);
/// {
///     let mut compositor = Compositor::new(&mut canvas);
///     compositor.with(128).fill(Color::WHITE);
/// }
/// assert_eq!(canvas.get(0, 0), Some(Color::gray(128)));
/// ```
pub struct Compositor<'c, 'b> {
    target: &'c mut Canvas<'b>,
    alpha: Option<u8>,
    layer: Option<PixelBuffer>,
}

impl<'c, 'b> Compositor<'c, 'b> {
    /// Start a scope over `target`. No layer is set up until [`Self::with`].
    pub fn new(target: &'c mut Canvas<'b>) -> Self {
        Self {
            target,
            alpha: None,
            layer: None,
        }
    }

    /// Canvas to draw on at `alpha`.
    ///
    /// Switching to a different alpha first blends the pending layer back.
    pub fn with(&mut self, alpha: u8) -> Canvas<'_> {
        if self.alpha != Some(alpha) {
            self.flush();
            if alpha != u8::MAX {
                self.layer = Some(self.target.snapshot());
            }
            self.alpha = Some(alpha);
        }
        match self.layer.as_mut() {
            Some(layer) => {
                let rect = self.target.rect();
                let clip = self.target.clip();
                let local = Rect::new(rect.x - clip.x, rect.y - clip.y, rect.width, rect.height);
                Canvas::new(layer, local)
            }
            None => self.target.reborrow(),
        }
    }

    /// Blend any pending layer back into the target.
    ///
    /// The current alpha is forgotten, so the next [`Self::with`] starts a
    /// fresh layer.
    pub fn flush(&mut self) {
        if let (Some(layer), Some(alpha)) = (self.layer.take(), self.alpha) {
            self.target.blend_back(&layer, f32::from(alpha) / 255.0);
        }
        self.alpha = None;
    }
}

impl Drop for Compositor<'_, '_> {
    fn drop(&mut self) {
        self.flush();
    }
}
