//! Named figures and the window they are shown in.

use std::mem;
use std::time::Duration;

use indexmap::IndexMap;

use crate::display::{Display, HeadlessDisplay, Key};
use crate::error::PlotError;
use crate::figure::Figure;
use crate::geom::{Offset, Size};
use crate::render::PixelBuffer;
use crate::view::ViewMut;
use crate::window::Window;

/// Registry of named figures plus the current window.
///
/// Looking up a figure by name always returns the same figure; the first
/// lookup also creates its view in the current window.
///
/// ```
/// use pixel_plot::{PlotContext, SeriesKind};
///
/// let mut ctx = PlotContext::headless();
/// ctx.figure("sine")
///     .series("sin")
///     .set_kind(SeriesKind::Line)
///     .add_value((0..64).map(|i| (f64::from(i) / 10.0).sin()))
///     .expect("scalar samples");
/// let drawn = ctx.show("sine", true).expect("consistent series");
/// assert_eq!(drawn, 64);
/// ```
pub struct PlotContext<D: Display = HeadlessDisplay> {
    window: Window<D>,
    figures: IndexMap<String, Figure>,
}

impl PlotContext<HeadlessDisplay> {
    /// Context drawing to an in-memory display.
    pub fn headless() -> Self {
        Self::new(Window::headless())
    }
}

impl Default for PlotContext<HeadlessDisplay> {
    fn default() -> Self {
        Self::headless()
    }
}

impl<D: Display> PlotContext<D> {
    /// Context showing figures in `window`.
    pub fn new(window: Window<D>) -> Self {
        Self {
            window,
            figures: IndexMap::new(),
        }
    }

    /// Figure `name`, created with a view of the same name on first use.
    pub fn figure(&mut self, name: &str) -> &mut Figure {
        if !self.figures.contains_key(name) {
            self.window.view(name);
        }
        self.figures
            .entry(name.to_string())
            .or_insert_with(|| Figure::new(name))
    }

    /// Figure `name` if it exists.
    pub fn get_figure(&self, name: &str) -> Option<&Figure> {
        self.figures.get(name)
    }

    /// Drop figure `name` from the registry. Its view stays in the window.
    pub fn remove_figure(&mut self, name: &str) -> Option<Figure> {
        self.figures.shift_remove(name)
    }

    /// Registered figure names in creation order.
    pub fn figure_names(&self) -> impl Iterator<Item = &str> {
        self.figures.keys().map(String::as_str)
    }

    /// Draw figure `name` into its view and return its largest sample count.
    /// Unknown names draw nothing.
    pub fn show(&mut self, name: &str, flush: bool) -> Result<usize, PlotError> {
        match self.figures.get(name) {
            Some(figure) => figure.show(&mut self.window, flush),
            None => Ok(0),
        }
    }

    /// Draw every figure, then flush once. Returns the summed sample counts.
    ///
    /// Stops at the first figure with inconsistent series.
    pub fn show_all(&mut self) -> Result<usize, PlotError> {
        let mut drawn = 0;
        for figure in self.figures.values() {
            drawn += figure.show(&mut self.window, false)?;
        }
        self.window.flush();
        Ok(drawn)
    }

    /// View `name` of the current window.
    pub fn view(&mut self, name: &str) -> ViewMut<'_, D> {
        self.window.view(name)
    }

    /// Draw `image` into view `name`, frame it and flush.
    pub fn imshow(&mut self, name: &str, image: &PixelBuffer) {
        let mut view = self.window.view(name);
        view.draw_image(image, u8::MAX);
        view.finish();
        view.flush();
    }

    /// Move view `name` inside the window.
    pub fn move_view(&mut self, name: &str, offset: Offset) {
        self.window.view(name).set_offset(offset);
    }

    /// Resize view `name`.
    pub fn resize_view(&mut self, name: &str, size: Size) {
        self.window.view(name).set_size(size);
    }

    /// Hide view `name`.
    pub fn destroy_view(&mut self, name: &str) {
        self.window.view(name).hide(true);
    }

    /// Wait for a key press on the current window.
    pub fn wait_key(&mut self, timeout: Option<Duration>) -> Option<Key> {
        self.window.key(timeout)
    }

    /// Current window.
    pub fn window(&self) -> &Window<D> {
        &self.window
    }

    /// Mutable current window.
    pub fn window_mut(&mut self) -> &mut Window<D> {
        &mut self.window
    }

    /// Make `window` current and return the previous one.
    ///
    /// Registered figures keep their names and draw into views of the new
    /// window from now on.
    pub fn set_window(&mut self, window: Window<D>) -> Window<D> {
        let previous = mem::replace(&mut self.window, window);
        for name in self.figures.keys() {
            self.window.view(name);
        }
        previous
    }
}
