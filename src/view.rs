//! Views: named rectangles of a [`Window`] buffer with their own frame.

use std::fmt;

use crate::color::Color;
use crate::compositor::Compositor;
use crate::display::{Display, MouseEvent};
use crate::geom::{Offset, PixelPoint, Rect, Size};
use crate::render::{Canvas, Font, PixelBuffer};
use crate::window::Window;

/// Height of the title bar drawn by [`ViewMut::draw_frame`].
const TITLE_BOTTOM: i32 = 16;
/// Baseline of the title text.
const TITLE_BASELINE: i32 = 14;

type MouseCallback = Box<dyn FnMut(&MouseEvent)>;

/// Per-view state stored inside the owning window.
pub(crate) struct ViewState {
    name: String,
    rect: Rect,
    title: String,
    frameless: bool,
    hidden: bool,
    background: Color,
    frame: Color,
    text: Color,
    mouse: Option<MouseCallback>,
}

impl ViewState {
    pub(crate) fn new(name: &str, size: Size) -> Self {
        Self {
            name: name.to_string(),
            rect: Rect::from_size(size),
            title: name.to_string(),
            frameless: false,
            hidden: false,
            background: Color::BLACK,
            frame: Color::GREEN,
            text: Color::BLACK,
            mouse: None,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn dispatch(&mut self, event: &MouseEvent) {
        if let Some(callback) = self.mouse.as_mut() {
            callback(event);
        }
    }
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("name", &self.name)
            .field("rect", &self.rect)
            .field("title", &self.title)
            .field("frameless", &self.frameless)
            .field("hidden", &self.hidden)
            .field("mouse", &self.mouse.is_some())
            .finish_non_exhaustive()
    }
}

/// Mutable handle to one view of a window.
///
/// Obtained from [`Window::view`]. Every change marks the window dirty;
/// drawing first grows the window buffer to contain the view.
pub struct ViewMut<'w, D: Display> {
    window: &'w mut Window<D>,
    index: usize,
}

impl<'w, D: Display> ViewMut<'w, D> {
    pub(crate) fn new(window: &'w mut Window<D>, index: usize) -> Self {
        Self { window, index }
    }

    fn state(&self) -> &ViewState {
        self.window.view_state(self.index)
    }

    fn update(&mut self, apply: impl FnOnce(&mut ViewState)) -> &mut Self {
        apply(self.window.view_state_mut(self.index));
        self.window.set_dirty();
        self
    }

    /// View name.
    pub fn name(&self) -> &str {
        &self.state().name
    }

    /// Position and size in window coordinates.
    pub fn rect(&self) -> Rect {
        self.state().rect
    }

    /// Set position and size.
    pub fn resize(&mut self, rect: Rect) -> &mut Self {
        self.update(|view| view.rect = rect)
    }

    /// Set the size, keeping the position.
    pub fn set_size(&mut self, size: Size) -> &mut Self {
        self.update(|view| {
            view.rect.width = size.width as i32;
            view.rect.height = size.height as i32;
        })
    }

    /// Set the position, keeping the size.
    pub fn set_offset(&mut self, offset: Offset) -> &mut Self {
        self.update(|view| {
            view.rect.x = offset.x;
            view.rect.y = offset.y;
        })
    }

    /// Size the view from the next image drawn into it.
    pub fn autosize(&mut self) -> &mut Self {
        self.set_size(Size::default())
    }

    /// Set the title shown in the frame.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        let title = title.into();
        self.update(|view| view.title = title)
    }

    /// Frame title.
    pub fn title(&self) -> &str {
        &self.state().title
    }

    /// Skip the frame on [`Self::finish`].
    pub fn set_frameless(&mut self, frameless: bool) -> &mut Self {
        self.update(|view| view.frameless = frameless)
    }

    /// Whether the frame is skipped.
    pub fn frameless(&self) -> bool {
        self.state().frameless
    }

    /// Set the alpha of the background, frame and text colors.
    pub fn set_alpha(&mut self, alpha: u8) -> &mut Self {
        self.update(|view| {
            view.background = view.background.alpha(alpha);
            view.frame = view.frame.alpha(alpha);
            view.text = view.text.alpha(alpha);
        })
    }

    /// Set the background color.
    pub fn set_background_color(&mut self, color: Color) -> &mut Self {
        self.update(|view| view.background = color)
    }

    /// Background color.
    pub fn background_color(&self) -> Color {
        self.state().background
    }

    /// Set the frame color.
    pub fn set_frame_color(&mut self, color: Color) -> &mut Self {
        self.update(|view| view.frame = color)
    }

    /// Frame color.
    pub fn frame_color(&self) -> Color {
        self.state().frame
    }

    /// Set the title text color.
    pub fn set_text_color(&mut self, color: Color) -> &mut Self {
        self.update(|view| view.text = color)
    }

    /// Title text color.
    pub fn text_color(&self) -> Color {
        self.state().text
    }

    /// Register the pointer callback. Events arrive in view coordinates.
    pub fn mouse(&mut self, callback: impl FnMut(&MouseEvent) + 'static) -> &mut Self {
        self.window.view_state_mut(self.index).mouse = Some(Box::new(callback));
        self
    }

    /// Whether a window-coordinate point lies inside the view.
    pub fn has(&self, offset: Offset) -> bool {
        self.state().rect.contains(offset.x, offset.y)
    }

    /// Whether the view is hidden.
    pub fn is_hidden(&self) -> bool {
        self.state().hidden
    }

    fn canvas(&mut self) -> Canvas<'_> {
        let rect = self.state().rect;
        self.window.ensure(rect);
        self.window.set_dirty();
        self.window.canvas(rect)
    }

    /// Fill `rect`, given in view coordinates.
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        let mut canvas = self.canvas();
        let mut compositor = Compositor::new(&mut canvas);
        compositor.with(color.a).fill_rect(rect, color);
    }

    /// Fill the whole view.
    pub fn draw_fill(&mut self, color: Color) {
        let mut canvas = self.canvas();
        Compositor::new(&mut canvas).with(color.a).fill(color);
    }

    /// Copy an image into the view, rescaled to the view size.
    ///
    /// A view sized 0×0 first takes the image size.
    pub fn draw_image(&mut self, image: &PixelBuffer, alpha: u8) {
        let rect = self.state().rect;
        if rect.width == 0 && rect.height == 0 {
            self.set_size(image.size());
        }
        let size = self.state().rect.size();
        let scaled = image.resized(size);
        let mut canvas = self.canvas();
        Compositor::new(&mut canvas).with(alpha).image(&scaled);
    }

    /// Draw text with its top-left corner near `offset`, in view
    /// coordinates. The font is picked from `height`.
    pub fn draw_text(&mut self, text: &str, offset: Offset, color: Color, height: f64) {
        let font = Font::for_height(height);
        let origin = PixelPoint::new(offset.x, offset.y + font.ascent());
        let mut canvas = self.canvas();
        let mut compositor = Compositor::new(&mut canvas);
        compositor.with(color.a).text(text, origin, font, color);
    }

    /// Draw text over a translucent black drop shadow.
    pub fn draw_text_shadow(&mut self, text: &str, offset: Offset, color: Color, height: f64) {
        let shift = (height / 20.0) as i32;
        let shadow = Offset::new(offset.x + shift, offset.y + shift);
        self.draw_text(text, shadow, Color::BLACK.alpha(100), height);
        self.draw_text(text, offset, color, height);
    }

    /// Draw the border and a title bar holding `title`.
    pub fn draw_frame(&mut self, title: &str) {
        let (background, frame, text) = {
            let view = self.state();
            (view.background, view.frame, view.text)
        };
        let font = Font::Small;
        let title_width = font.text_size(title).width as i32;
        let mut canvas = self.canvas();
        let (w, h) = (canvas.width(), canvas.height());
        let mut layers = Compositor::new(&mut canvas);
        layers.with(background.a).stroke_corners(
            PixelPoint::new(0, 0),
            PixelPoint::new(w - 1, h - 1),
            background,
        );
        layers.with(frame.a).stroke_corners(
            PixelPoint::new(1, 1),
            PixelPoint::new(w - 2, h - 2),
            frame,
        );
        layers.with(frame.a).fill_corners(
            PixelPoint::new(2, 2),
            PixelPoint::new(w - 3, TITLE_BOTTOM),
            frame,
        );
        let origin = PixelPoint::new(2 + (w - title_width) / 2, TITLE_BASELINE);
        layers.with(text.a).text(title, origin, font, text);
    }

    /// Drawing canvas over the view region, plus that region in window
    /// coordinates.
    pub fn buffer(&mut self) -> (Canvas<'_>, Rect) {
        let rect = self.state().rect;
        (self.canvas(), rect)
    }

    /// Draw the frame unless the view is frameless.
    pub fn finish(&mut self) {
        if !self.state().frameless {
            let title = self.state().title.clone();
            self.draw_frame(&title);
        }
        self.window.set_dirty();
    }

    /// Flush the owning window.
    pub fn flush(&mut self) {
        self.window.flush();
    }

    /// Hide or show the view, painting it white on every change.
    pub fn hide(&mut self, hidden: bool) {
        if self.state().hidden != hidden {
            self.window.view_state_mut(self.index).hidden = hidden;
            self.draw_fill(Color::WHITE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_are_created_once_at_default_size() {
        let mut window = Window::headless();
        assert_eq!(window.view("a").rect(), Rect::new(0, 0, 300, 300));
        window.view("a").set_offset(Offset::new(5, 6));
        assert_eq!(window.view("a").rect(), Rect::new(5, 6, 300, 300));
        assert_eq!(window.view("a").title(), "a");
        assert_eq!(window.view_names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn drawing_grows_window_to_view() {
        let mut window = Window::headless();
        window
            .view("v")
            .resize(Rect::new(10, 20, 30, 40))
            .draw_fill(Color::RED);
        assert_eq!(window.size(), Size::new(40, 60));
        assert_eq!(window.buffer().get(10, 20), Some(Color::RED));
        assert_eq!(window.buffer().get(9, 20), Some(Color::GRAY));
        assert!(window.is_dirty());
    }

    #[test]
    fn draw_rect_is_view_relative_and_blends() {
        let mut window = Window::headless();
        let mut view = window.view_with_size("v", Size::new(10, 10));
        view.set_offset(Offset::new(2, 2));
        view.draw_fill(Color::BLACK);
        view.draw_rect(Rect::new(1, 1, 2, 2), Color::WHITE.alpha(128));
        assert_eq!(window.buffer().get(3, 3), Some(Color::gray(128)));
        assert_eq!(window.buffer().get(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn autosized_view_takes_image_size() {
        let image = PixelBuffer::new(Size::new(12, 8), Color::BLUE);
        let mut window = Window::headless();
        window.view("img").autosize().draw_image(&image, 255);
        assert_eq!(window.view("img").rect(), Rect::new(0, 0, 12, 8));
        assert_eq!(window.buffer().get(11, 7), Some(Color::BLUE));
    }

    #[test]
    fn images_are_scaled_to_view() {
        let image = PixelBuffer::new(Size::new(4, 4), Color::RED);
        let mut window = Window::headless();
        window
            .view_with_size("img", Size::new(8, 6))
            .draw_image(&image, 255);
        assert_eq!(window.size(), Size::new(8, 6));
        let corner = window.buffer().get(7, 5).expect("inside buffer");
        assert!(corner.r >= 250 && corner.g <= 5);
    }

    #[test]
    fn frame_has_border_and_title_bar() {
        let mut window = Window::headless();
        let mut view = window.view_with_size("f", Size::new(50, 40));
        view.draw_fill(Color::WHITE);
        view.finish();
        let buffer = window.buffer();
        assert_eq!(buffer.get(0, 0), Some(Color::BLACK));
        assert_eq!(buffer.get(1, 20), Some(Color::GREEN));
        assert_eq!(buffer.get(3, 3), Some(Color::GREEN));
        assert_eq!(buffer.get(25, 30), Some(Color::WHITE));
        assert_eq!(buffer.get(49, 39), Some(Color::BLACK));
    }

    #[test]
    fn frameless_view_skips_frame() {
        let mut window = Window::headless();
        let mut view = window.view_with_size("f", Size::new(20, 20));
        view.set_frameless(true).draw_fill(Color::WHITE);
        view.finish();
        assert_eq!(window.buffer().get(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn alpha_applies_to_all_view_colors() {
        let mut window = Window::headless();
        let mut view = window.view("v");
        view.set_alpha(50);
        assert_eq!(view.background_color().a, 50);
        assert_eq!(view.frame_color().a, 50);
        assert_eq!(view.text_color().a, 50);
    }

    #[test]
    fn has_uses_window_coordinates() {
        let mut window = Window::headless();
        let mut view = window.view_with_size("v", Size::new(10, 10));
        view.set_offset(Offset::new(100, 100));
        assert!(view.has(Offset::new(100, 105)));
        assert!(!view.has(Offset::new(5, 5)));
        assert!(!view.has(Offset::new(110, 100)));
    }

    #[test]
    fn text_lands_inside_view() {
        let mut window = Window::headless();
        let mut view = window.view_with_size("t", Size::new(60, 20));
        view.draw_fill(Color::BLACK);
        view.draw_text_shadow("Hi", Offset::new(2, 2), Color::WHITE, 12.0);
        let lit = (0..20)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .filter(|&(x, y)| window.buffer().get(x, y) == Some(Color::WHITE))
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn hide_paints_white() {
        let mut window = Window::headless();
        let mut view = window.view_with_size("h", Size::new(4, 4));
        view.draw_fill(Color::BLACK);
        view.hide(true);
        assert!(view.is_hidden());
        assert_eq!(window.buffer().get(2, 2), Some(Color::WHITE));
    }
}
