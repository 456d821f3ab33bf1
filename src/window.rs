//! Windows: an owned pixel buffer shared by named views.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::color::Color;
use crate::display::{Display, HeadlessDisplay, Key, MouseEvent};
use crate::geom::{Offset, PixelPoint, Rect, Size};
use crate::render::{Canvas, PixelBuffer};
use crate::view::{ViewMut, ViewState};

static WINDOW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Size given to views created on first reference.
pub const DEFAULT_VIEW_SIZE: Size = Size::new(300, 300);

/// Window configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Title shown by the display.
    pub title: String,
    /// Target frame rate used by [`Window::tick`].
    pub fps: f64,
    /// Draw a cross-hair at the last pointer position when flushing.
    pub cursor: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            fps: 30.0,
            cursor: false,
        }
    }
}

/// A display surface backed by a single pixel buffer.
///
/// The buffer starts empty and grows to contain every rectangle passed to
/// [`Window::ensure`]. Views are looked up by name and created on first use;
/// later views sit on top of earlier ones for pointer dispatch.
pub struct Window<D: Display = HeadlessDisplay> {
    display: D,
    name: String,
    config: WindowConfig,
    offset: Offset,
    buffer: PixelBuffer,
    views: IndexMap<String, ViewState>,
    dirty: bool,
    hidden: bool,
    cursor: PixelPoint,
    last_tick: Option<Instant>,
}

impl Window<HeadlessDisplay> {
    /// Window on an in-memory display.
    pub fn headless() -> Self {
        Self::new(HeadlessDisplay::new())
    }
}

impl Default for Window<HeadlessDisplay> {
    fn default() -> Self {
        Self::headless()
    }
}

impl<D: Display> Window<D> {
    /// Create a window on `display` with the default configuration.
    pub fn new(display: D) -> Self {
        Self::with_config(display, WindowConfig::default())
    }

    /// Create a window on `display`.
    pub fn with_config(display: D, config: WindowConfig) -> Self {
        let id = WINDOW_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            display,
            name: format!("pixel-plot-{id}"),
            config,
            offset: Offset::default(),
            buffer: PixelBuffer::new(Size::default(), Color::GRAY),
            views: IndexMap::new(),
            dirty: false,
            hidden: false,
            cursor: PixelPoint::new(-10, -10),
            last_tick: None,
        }
    }

    /// Surface name used with the display.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current configuration.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Move and resize in one step.
    pub fn resize(&mut self, rect: Rect) -> &mut Self {
        self.set_offset(rect.offset());
        self.set_size(rect.size())
    }

    /// Reallocate the buffer at `size`.
    ///
    /// Content in the overlap of the old and new buffer is kept, new area is
    /// gray.
    pub fn set_size(&mut self, size: Size) -> &mut Self {
        log::debug!(
            "window `{}`: buffer {}x{} -> {}x{}",
            self.name,
            self.buffer.width(),
            self.buffer.height(),
            size.width,
            size.height
        );
        self.buffer = self.buffer.regrow(size, Color::GRAY);
        self.dirty = true;
        self
    }

    /// Buffer dimensions.
    pub fn size(&self) -> Size {
        self.buffer.size()
    }

    /// Move the window on screen.
    pub fn set_offset(&mut self, offset: Offset) -> &mut Self {
        self.offset = offset;
        self.display.move_to(&self.name, offset);
        self
    }

    /// Screen position.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Set the title shown on the next flush.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.config.title = title.into();
        self
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Set the target frame rate.
    pub fn set_fps(&mut self, fps: f64) -> &mut Self {
        self.config.fps = fps;
        self
    }

    /// Target frame rate.
    pub fn fps(&self) -> f64 {
        self.config.fps
    }

    /// Show or hide the cursor cross-hair.
    pub fn set_cursor(&mut self, cursor: bool) -> &mut Self {
        self.config.cursor = cursor;
        self
    }

    /// Whether the cursor cross-hair is drawn.
    pub fn cursor(&self) -> bool {
        self.config.cursor
    }

    /// Last pointer position seen by [`Self::on_mouse`].
    pub fn cursor_position(&self) -> PixelPoint {
        self.cursor
    }

    /// Grow the buffer so that it contains `rect`. Never shrinks.
    pub fn ensure(&mut self, rect: Rect) -> &mut Self {
        let right = rect.right().max(0) as u32;
        let bottom = rect.bottom().max(0) as u32;
        let size = self.buffer.size();
        if right > size.width || bottom > size.height {
            self.set_size(Size::new(size.width.max(right), size.height.max(bottom)));
        }
        self
    }

    /// Backing buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Mutable backing buffer. Call [`Self::set_dirty`] after drawing.
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub(crate) fn canvas(&mut self, rect: Rect) -> Canvas<'_> {
        Canvas::new(&mut self.buffer, rect)
    }

    /// Mark the buffer as changed since the last flush.
    pub fn set_dirty(&mut self) -> &mut Self {
        self.dirty = true;
        self
    }

    /// Whether the buffer changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the window is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Push the buffer to the display if it changed.
    ///
    /// Nothing is shown for an empty buffer or a hidden window. The dirty flag
    /// is cleared either way.
    pub fn flush(&mut self) {
        if self.dirty && !self.buffer.is_empty() && !self.hidden {
            if self.config.cursor {
                let mut frame = self.buffer.clone();
                draw_cursor(&mut Canvas::full(&mut frame), self.cursor);
                self.display.show(&self.name, &self.config.title, &frame);
            } else {
                let frame = &self.buffer;
                self.display.show(&self.name, &self.config.title, frame);
            }
            log::debug!(
                "window `{}`: flushed {}x{}",
                self.name,
                self.buffer.width(),
                self.buffer.height()
            );
        }
        self.dirty = false;
    }

    /// View `name`, created at the default size on first reference.
    pub fn view(&mut self, name: &str) -> ViewMut<'_, D> {
        self.view_with_size(name, DEFAULT_VIEW_SIZE)
    }

    /// View `name`, created at `size` on first reference.
    pub fn view_with_size(&mut self, name: &str, size: Size) -> ViewMut<'_, D> {
        let index = match self.views.get_index_of(name) {
            Some(index) => index,
            None => {
                log::debug!(
                    "window `{}`: new view `{name}` {}x{}",
                    self.name,
                    size.width,
                    size.height
                );
                let state = ViewState::new(name, size);
                self.views.insert_full(name.to_string(), state).0
            }
        };
        ViewMut::new(self, index)
    }

    /// Whether a view named `name` exists.
    pub fn has_view(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// View names in creation order.
    pub fn view_names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    pub(crate) fn view_state(&self, index: usize) -> &ViewState {
        &self.views[index]
    }

    pub(crate) fn view_state_mut(&mut self, index: usize) -> &mut ViewState {
        &mut self.views[index]
    }

    /// Flush, dispatch pending pointer input and sleep out the rest of the
    /// frame period.
    pub fn tick(&mut self) {
        self.flush();
        for event in self.display.poll_pointer(&self.name) {
            self.on_mouse(event);
        }
        let fps = self.config.fps;
        if fps.is_finite() && fps > 0.0 {
            let period = Duration::from_secs_f64(1.0 / fps);
            let elapsed = self
                .last_tick
                .map(|tick| tick.elapsed())
                .unwrap_or_default();
            if let Some(rest) = period.checked_sub(elapsed).filter(|rest| !rest.is_zero()) {
                self.display.sleep(rest);
            }
        }
        self.last_tick = Some(Instant::now());
    }

    /// Sleep through the display, at least one millisecond.
    pub fn sleep(&mut self, seconds: f64) {
        let millis = (seconds * 1000.0).max(1.0) as u64;
        self.display.sleep(Duration::from_millis(millis));
    }

    /// Hide or show the window.
    ///
    /// Hiding destroys the display surface, showing again redraws it.
    pub fn hide(&mut self, hidden: bool) {
        if self.hidden == hidden {
            return;
        }
        self.hidden = hidden;
        if hidden {
            self.display.destroy(&self.name);
        } else {
            self.dirty = true;
            self.flush();
        }
    }

    /// Route a pointer event in window coordinates.
    ///
    /// The topmost view containing the pointer receives it in view
    /// coordinates. With the cursor shown the window is redrawn.
    pub fn on_mouse(&mut self, event: MouseEvent) {
        let target = self
            .views
            .values_mut()
            .rev()
            .find(|view| view.rect().contains(event.x, event.y));
        if let Some(view) = target {
            log::trace!(
                "window `{}`: {:?} at ({}, {}) -> `{}`",
                self.name,
                event.kind,
                event.x,
                event.y,
                view.name()
            );
            let local = event.relative_to(view.rect().offset());
            view.dispatch(&local);
        }
        self.cursor = PixelPoint::new(event.x, event.y);
        if self.config.cursor {
            self.dirty = true;
            self.flush();
        }
    }

    /// Wait for a key press. `None` waits indefinitely.
    pub fn key(&mut self, timeout: Option<Duration>) -> Option<Key> {
        self.display.wait_key(timeout)
    }

    /// Collect typed characters until Enter or a control character.
    ///
    /// Backspace removes the last character. Input stops early when the
    /// timeout passes or the display has no key to report.
    pub fn read_line(&mut self, timeout: Option<Duration>) -> String {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut line = String::new();
        loop {
            let remaining = deadline.map(|at| at.saturating_duration_since(Instant::now()));
            if remaining.is_some_and(|remaining| remaining.is_zero()) {
                break;
            }
            match self.display.wait_key(remaining) {
                None | Some(Key::Enter) => break,
                Some(Key::Char(c)) if u32::from(c) <= u32::from('\n') => break,
                Some(Key::Char(c)) => line.push(c),
                Some(Key::Backspace) => {
                    line.pop();
                }
                Some(Key::Escape | Key::Other(_)) => {}
            }
        }
        line
    }

    /// Display this window draws to.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable display, e.g. to queue input on a headless display.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}

fn draw_cursor(canvas: &mut Canvas<'_>, at: PixelPoint) {
    canvas.line(at.offset(-4, 1), at.offset(6, 1), Color::WHITE);
    canvas.line(at.offset(1, -4), at.offset(1, 6), Color::WHITE);
    canvas.line(at.offset(-5, 0), at.offset(5, 0), Color::BLACK);
    canvas.line(at.offset(0, -5), at.offset(0, 5), Color::BLACK);
}
