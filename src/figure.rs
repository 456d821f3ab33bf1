//! Figures: a set of series drawn onto one view with a shared grid.

use std::path::Path;

use crate::axis::{format_tick, grid_step, legible_step, ticks};
use crate::bounds::{Bounds, Range};
use crate::color::Color;
use crate::compositor::Compositor;
use crate::display::Display;
use crate::error::PlotError;
use crate::geom::{PixelPoint, Size};
use crate::render::{Canvas, Font, PixelBuffer};
use crate::series::{DrawParams, Series};
use crate::transform::Transform;
use crate::window::Window;

/// Minimum pixel pitch between X tick labels.
const X_LABEL_PITCH: f64 = 30.0;
/// Minimum pixel pitch between Y tick labels.
const Y_LABEL_PITCH: f64 = 20.0;
/// Vertical distance between legend rows.
const LEGEND_ROW: i32 = 15;
/// Legend swatch radius.
const LEGEND_DOT: i32 = 3;

/// Figure styling.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    /// Inset of the plot area from the buffer edge, in pixels.
    pub border: i32,
    /// Background fill.
    pub background: Color,
    /// Reference axis color.
    pub axis: Color,
    /// Grid and border color.
    pub sub_axis: Color,
    /// Tick label and legend text color.
    pub text: Color,
    /// Keep `x = 0` inside the X range.
    pub include_zero_x: bool,
    /// Keep `y = 0` inside the Y range.
    pub include_zero_y: bool,
    /// Use the same pixels-per-unit on both axes.
    pub square: bool,
    /// Approximate grid cell size in pixels.
    pub grid_size: i32,
    /// Inner padding in pixels.
    pub grid_padding: i32,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            border: 50,
            background: Color::WHITE,
            axis: Color::BLACK,
            sub_axis: Color::LIGHT,
            text: Color::BLACK,
            include_zero_x: true,
            include_zero_y: true,
            square: false,
            grid_size: 60,
            grid_padding: 20,
        }
    }
}

/// Placement computed from bounds and canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Layout {
    pub(crate) x: Range,
    pub(crate) y: Range,
    pub(crate) x_axis: f64,
    pub(crate) y_axis: f64,
    pub(crate) x_grid: f64,
    pub(crate) y_grid: f64,
    pub(crate) transform: Transform,
    pub(crate) unit: i32,
}

/// A collection of series drawn into one view.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    view: String,
    series: Vec<Series>,
    style: FigureStyle,
}

impl Figure {
    /// Create an empty figure bound to the view named `view`.
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            series: Vec::new(),
            style: FigureStyle::default(),
        }
    }

    /// Start building a figure.
    pub fn builder() -> FigureBuilder {
        FigureBuilder::default()
    }

    /// Name of the bound view.
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Series in insertion order.
    pub fn series_list(&self) -> &[Series] {
        &self.series
    }

    /// Series labeled `label`, created as a line series if missing.
    pub fn series(&mut self, label: &str) -> &mut Series {
        let index = match self.series.iter().position(|s| s.label() == label) {
            Some(index) => index,
            None => {
                self.series.push(Series::new(label));
                self.series.len() - 1
            }
        };
        &mut self.series[index]
    }

    /// Remove every series.
    pub fn clear(&mut self) -> &mut Self {
        self.series.clear();
        self
    }

    /// Access the style.
    pub fn style(&self) -> &FigureStyle {
        &self.style
    }

    /// Replace the style.
    pub fn set_style(&mut self, style: FigureStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Choose which axes always include zero.
    pub fn set_origin(&mut self, x: bool, y: bool) -> &mut Self {
        self.style.include_zero_x = x;
        self.style.include_zero_y = y;
        self
    }

    /// Force equal scale on both axes.
    pub fn set_square(&mut self, square: bool) -> &mut Self {
        self.style.square = square;
        self
    }

    /// Set the border inset in pixels.
    pub fn set_border(&mut self, size: i32) -> &mut Self {
        self.style.border = size;
        self
    }

    /// Set the alpha of every decoration color.
    pub fn set_alpha(&mut self, alpha: u8) -> &mut Self {
        let style = &mut self.style;
        style.background = style.background.alpha(alpha);
        style.axis = style.axis.alpha(alpha);
        style.sub_axis = style.sub_axis.alpha(alpha);
        style.text = style.text.alpha(alpha);
        self
    }

    /// Set the approximate grid cell size in pixels.
    pub fn set_grid_size(&mut self, size: i32) -> &mut Self {
        self.style.grid_size = size;
        self
    }

    /// Set the inner padding in pixels.
    pub fn set_grid_padding(&mut self, padding: i32) -> &mut Self {
        self.style.grid_padding = padding;
        self
    }

    /// Set the background color.
    pub fn set_background_color(&mut self, color: Color) -> &mut Self {
        self.style.background = color;
        self
    }

    /// Set the reference axis color.
    pub fn set_axis_color(&mut self, color: Color) -> &mut Self {
        self.style.axis = color;
        self
    }

    /// Set the grid color.
    pub fn set_sub_axis_color(&mut self, color: Color) -> &mut Self {
        self.style.sub_axis = color;
        self
    }

    /// Set the text color.
    pub fn set_text_color(&mut self, color: Color) -> &mut Self {
        self.style.text = color;
        self
    }

    /// Background color.
    pub fn background_color(&self) -> Color {
        self.style.background
    }

    /// Reference axis color.
    pub fn axis_color(&self) -> Color {
        self.style.axis
    }

    /// Grid color.
    pub fn sub_axis_color(&self) -> Color {
        self.style.sub_axis
    }

    /// Text color.
    pub fn text_color(&self) -> Color {
        self.style.text
    }

    /// Verify every series and fold their extents.
    pub fn fit_bounds(&self) -> Result<Bounds, PlotError> {
        let style = &self.style;
        let mut bounds = Bounds::seed(
            style.include_zero_x,
            style.include_zero_y,
            style.grid_padding,
        );
        for series in &self.series {
            if let Err(err) = series.verify() {
                log::error!("figure `{}`: {err}", self.view);
                return Err(err);
            }
            series.bounds(&mut bounds);
        }
        Ok(bounds)
    }

    /// Fit all series and draw them if any holds samples.
    ///
    /// Returns the largest sample count; `0` means nothing was drawn and the
    /// canvas is untouched.
    pub fn draw_fit(&self, canvas: &mut Canvas<'_>) -> Result<usize, PlotError> {
        let bounds = self.fit_bounds()?;
        if bounds.n_max > 0 {
            self.draw(canvas, &bounds);
        }
        Ok(bounds.n_max)
    }

    /// Draw into a fresh buffer of `size`, `None` when there is nothing to draw.
    pub fn draw_image(&self, size: Size) -> Result<Option<PixelBuffer>, PlotError> {
        let mut buffer = PixelBuffer::new(size, self.style.background);
        let drawn = self.draw_fit(&mut Canvas::full(&mut buffer))?;
        Ok((drawn > 0).then_some(buffer))
    }

    /// Draw into a PNG file of `size`. Returns `false` and writes nothing when
    /// there is nothing to draw.
    pub fn draw_file(&self, path: impl AsRef<Path>, size: Size) -> Result<bool, PlotError> {
        let Some(buffer) = self.draw_image(size)? else {
            return Ok(false);
        };
        buffer.write_png(path.as_ref())?;
        log::debug!(
            "figure `{}` written to {}",
            self.view,
            path.as_ref().display()
        );
        Ok(true)
    }

    /// Draw into the bound view of `window`, frame it and optionally flush.
    pub fn show<D: Display>(
        &self,
        window: &mut Window<D>,
        flush: bool,
    ) -> Result<usize, PlotError> {
        let mut view = window.view(&self.view);
        let drawn = {
            let (mut canvas, _) = view.buffer();
            self.draw_fit(&mut canvas)?
        };
        if drawn > 0 {
            view.finish();
            if flush {
                view.flush();
            }
        }
        Ok(drawn)
    }

    pub(crate) fn layout(&self, width: i32, height: i32, bounds: &Bounds) -> Layout {
        let style = &self.style;
        let border = style.border;
        let w_plot = (width - 2 * border).max(1);
        let h_plot = (height - 2 * border).max(1);
        let or_zero = |r: Range| if r.is_empty() { Range::zero() } else { r };
        let (mut x, mut y) = (or_zero(bounds.x), or_zero(bounds.y));

        if bounds.p_max != 0 {
            let pad = f64::from(bounds.p_max);
            x = x.padded(pad * x.span() / f64::from(w_plot));
            y = y.padded(pad * y.span() / f64::from(h_plot));
        }

        if style.square {
            let (w, h) = (f64::from(w_plot), f64::from(h_plot));
            if h * x.span() < w * y.span() {
                x = x.padded((w * y.span() / h - x.span()) / 2.0);
            } else if w * y.span() < h * x.span() {
                y = y.padded((h * x.span() / w - y.span()) / 2.0);
            }
        }

        let transform = Transform::fit(x, y, width, height, border);
        let n_max = i32::try_from(bounds.n_max.max(1)).unwrap_or(i32::MAX);
        Layout {
            x,
            y,
            x_axis: x.clamp(0.0),
            y_axis: y.clamp(0.0),
            x_grid: grid_step(x, w_plot, style.grid_size),
            y_grid: grid_step(y, h_plot, style.grid_size),
            transform,
            unit: ((width.min(height) - 2 * border) / n_max / 10).max(1),
        }
    }

    /// Draw with precomputed bounds.
    pub fn draw(&self, canvas: &mut Canvas<'_>, bounds: &Bounds) {
        let style = &self.style;
        let (width, height) = (canvas.width(), canvas.height());
        let border = style.border;
        let layout = self.layout(width, height, bounds);
        let t = layout.transform;
        let mut compositor = Compositor::new(canvas);

        compositor.with(style.background.a).fill(style.background);
        compositor.with(style.sub_axis.a).stroke_corners(
            PixelPoint::new(border, border),
            PixelPoint::new(width - border, height - border),
            style.sub_axis,
        );

        for x in ticks(layout.x, layout.x_grid) {
            let px = t.px(x);
            compositor.with(style.sub_axis.a).line(
                PixelPoint::new(px, border),
                PixelPoint::new(px, height - border),
                style.sub_axis,
            );
        }
        for y in ticks(layout.y, layout.y_grid) {
            let py = t.py(y);
            compositor.with(style.sub_axis.a).line(
                PixelPoint::new(border, py),
                PixelPoint::new(width - border, py),
                style.sub_axis,
            );
        }

        let x_grid = legible_step(layout.x_grid, t.xs, X_LABEL_PITCH);
        for x in ticks(layout.x, x_grid) {
            let label = format_tick(x);
            let size = Font::Tiny.text_size(&label);
            let origin = PixelPoint::new(
                (x * t.xs + t.xd - f64::from(size.width) / 2.0) as i32,
                height - border + 5 + size.height as i32,
            );
            compositor
                .with(style.text.a)
                .text(&label, origin, Font::Tiny, style.text);
        }
        let y_grid = legible_step(layout.y_grid, t.ys, Y_LABEL_PITCH);
        for y in ticks(layout.y, y_grid) {
            let label = format_tick(y);
            let size = Font::Tiny.text_size(&label);
            let origin = PixelPoint::new(
                border - 5 - size.width as i32,
                (y * t.ys + t.yd + f64::from(size.height) / 2.0) as i32,
            );
            compositor
                .with(style.text.a)
                .text(&label, origin, Font::Tiny, style.text);
        }

        let axis_row = t.py(layout.y_axis);
        let axis_column = t.px(layout.x_axis);
        compositor.with(style.axis.a).line(
            PixelPoint::new(border, axis_row),
            PixelPoint::new(width - border, axis_row),
            style.axis,
        );
        compositor.with(style.axis.a).line(
            PixelPoint::new(axis_column, border),
            PixelPoint::new(axis_column, height - border),
            style.axis,
        );

        let total = self.series.len() as f64;
        let mut index = self.series.iter().filter(|s| s.collides()).count();
        for series in self.series.iter().rev() {
            if series.collides() {
                index -= 1;
            }
            let params = DrawParams {
                x: layout.x,
                y: layout.y,
                transform: t,
                x_axis: layout.x_axis,
                y_axis: layout.y_axis,
                unit: layout.unit,
                offset: index as f64 / total,
            };
            series.draw(&mut compositor.with(series.color().a), &params);
        }

        for (row, series) in self.series.iter().filter(|s| s.legend()).enumerate() {
            let label = series.label();
            let size = Font::Small.text_size(label);
            let origin = PixelPoint::new(
                width - border - size.width as i32 - 17,
                border + LEGEND_ROW * row as i32 + LEGEND_ROW,
            );
            let dot = PixelPoint::new(width - border - 10, origin.y - 3);
            let mut shadow = compositor.with(style.background.a);
            shadow.text(label, origin.offset(1, 1), Font::Small, style.background);
            shadow.fill_circle(dot.offset(1, 1), LEGEND_DOT, style.background);
            compositor
                .with(style.text.a)
                .text(label, origin, Font::Small, style.text);
            series.dot(&mut compositor.with(series.color().a), dot, LEGEND_DOT);
        }
    }
}

/// Builder for configuring a figure before use.
#[derive(Debug, Default)]
pub struct FigureBuilder {
    style: FigureStyle,
    series: Vec<Series>,
}

impl FigureBuilder {
    /// Set the style.
    pub fn style(mut self, style: FigureStyle) -> Self {
        self.style = style;
        self
    }

    /// Add a series, replacing any series with the same label.
    pub fn series(mut self, series: Series) -> Self {
        match self.series.iter_mut().find(|s| s.label() == series.label()) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
        self
    }

    /// Build a figure bound to the view named `view`.
    pub fn build(self, view: impl Into<String>) -> Figure {
        Figure {
            view: view.into(),
            series: self.series,
            style: self.style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesKind;

    #[test]
    fn series_lookup_creates_once() {
        let mut figure = Figure::new("plot");
        figure.series("a").push_value(1.0).expect("sample");
        figure.series("b");
        figure.series("a").push_value(2.0).expect("sample");
        assert_eq!(figure.series_list().len(), 2);
        assert_eq!(figure.series_list()[0].len(), 2);
        assert_eq!(figure.series_list()[1].color(), Color::hash("b"));
        figure.clear();
        assert!(figure.series_list().is_empty());
    }

    #[test]
    fn style_defaults_and_setters() {
        let mut figure = Figure::new("plot");
        assert_eq!(figure.style(), &FigureStyle::default());
        assert_eq!(figure.background_color(), Color::WHITE);
        assert_eq!(figure.sub_axis_color(), Color::LIGHT);
        figure
            .set_alpha(100)
            .set_border(10)
            .set_origin(false, true)
            .set_square(true);
        assert_eq!(figure.axis_color(), Color::BLACK.alpha(100));
        assert_eq!(figure.text_color().a, 100);
        assert_eq!(figure.style().border, 10);
        assert!(!figure.style().include_zero_x);
        assert!(figure.style().square);
    }

    #[test]
    fn empty_figure_draws_nothing() {
        let mut buffer = PixelBuffer::new(Size::new(50, 40), Color::RED);
        let mut figure = Figure::new("plot");
        let drawn = figure.draw_fit(&mut Canvas::full(&mut buffer));
        assert_eq!(drawn.expect("no series"), 0);
        figure.series("empty").set_kind(SeriesKind::Histogram);
        let drawn = figure.draw_fit(&mut Canvas::full(&mut buffer));
        assert_eq!(drawn.expect("empty series"), 0);
        let bytes = buffer.as_bytes();
        assert!(bytes.chunks_exact(3).all(|px| px == [255, 0, 0]));
        let image = figure.draw_image(Size::new(10, 10));
        assert!(image.expect("nothing to draw").is_none());
    }

    #[test]
    fn inconsistent_series_fails_without_drawing() {
        let mut buffer = PixelBuffer::new(Size::new(50, 40), Color::RED);
        let mut figure = Figure::new("plot");
        figure
            .series("bad")
            .add_value([1.0, 2.0])
            .expect("samples")
            .set_kind(SeriesKind::Circle);
        let err = figure
            .draw_fit(&mut Canvas::full(&mut buffer))
            .expect_err("depth mismatch");
        assert!(matches!(err, PlotError::Inconsistent { .. }));
        assert_eq!(buffer.get(0, 0), Some(Color::RED));
    }

    #[test]
    fn histogram_and_dotline_end_to_end() {
        let mut figure = Figure::new("plot");
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        figure
            .series("bars")
            .set_kind(SeriesKind::Histogram)
            .add_value(values)
            .expect("bars");
        figure
            .series("dots")
            .set_kind(SeriesKind::DotLine)
            .add_value(values)
            .expect("dots");
        let bounds = figure.fit_bounds().expect("consistent");
        assert_eq!(bounds.n_max, 5);
        assert!(bounds.p_max >= 30);
        assert_eq!(bounds.x, Range::new(0.0, 4.0));
        assert_eq!(bounds.y, Range::new(0.0, 5.0));

        let image = figure
            .draw_image(Size::new(300, 300))
            .expect("consistent")
            .expect("something drawn");
        assert_eq!(image.size(), Size::new(300, 300));
        assert_eq!(image.get(0, 0), Some(Color::WHITE));
        let distinct = image
            .as_bytes()
            .chunks_exact(3)
            .filter(|px| *px != [255, 255, 255])
            .count();
        assert!(distinct > 1000, "only {distinct} non-background pixels");

        let layout = figure.layout(300, 300, &bounds);
        assert_eq!(layout.unit, 4);
        assert!(layout.x.min < 0.0 && layout.x.max > 4.0);
        assert_eq!(layout.x_axis, 0.0);
    }

    #[test]
    fn colliding_bars_fan_out_in_order() {
        let mut figure = Figure::new("plot");
        for (label, color) in [("first", Color::RED), ("second", Color::BLUE)] {
            figure
                .series(label)
                .set_kind(SeriesKind::Histogram)
                .set_color(color)
                .add_value([4.0, 4.0])
                .expect("bars");
        }
        let bounds = figure.fit_bounds().expect("consistent");
        let layout = figure.layout(300, 300, &bounds);
        let image = figure
            .draw_image(Size::new(300, 300))
            .expect("consistent")
            .expect("something drawn");

        let u = 2 * layout.unit;
        let x = layout.transform.px(0.0);
        let y = layout.transform.py(2.0);
        assert_eq!(image.get(x - u / 2, y), Some(Color::RED));
        assert_eq!(image.get(x + u / 2, y), Some(Color::RED));
        assert_eq!(image.get(x + u + u / 2, y), Some(Color::BLUE));
        let outside = image.get(x - u - 2, y).expect("inside image");
        assert!(outside != Color::RED && outside != Color::BLUE);
    }

    #[test]
    fn layout_square_equalizes_scale() {
        let mut figure = Figure::new("plot");
        figure.set_square(true);
        let mut bounds = Bounds::seed(true, true, 0);
        bounds.x.expand_to_include(10.0);
        bounds.y.expand_to_include(2.0);
        bounds.n_max = 1;
        let layout = figure.layout(300, 200, &bounds);
        assert_eq!(layout.x, Range::new(0.0, 10.0));
        assert_eq!(layout.y, Range::new(-1.5, 3.5));
        assert!((layout.transform.xs + layout.transform.ys).abs() < 1e-9);
    }

    #[test]
    fn layout_clamps_axis_and_snaps_grid() {
        let figure = Figure::new("plot");
        let mut bounds = Bounds::seed(false, false, 0);
        bounds.x.expand_to_include(3.0);
        bounds.x.expand_to_include(13.0);
        bounds.y.expand_to_include(-8.0);
        bounds.y.expand_to_include(-2.0);
        bounds.n_max = 1;
        let layout = figure.layout(300, 300, &bounds);
        assert_eq!(layout.x_axis, 3.0);
        assert_eq!(layout.y_axis, -2.0);
        assert_eq!(layout.x_grid, 2.0);
        assert_eq!(layout.y_grid, 2.0);
        assert_eq!(layout.transform.px(3.0), 50);
        let bottom = -8.0 * layout.transform.ys + layout.transform.yd;
        assert!((bottom - 250.0).abs() < 1e-9);
    }

    #[test]
    fn builder_replaces_duplicate_labels() {
        let mut first = Series::new("s");
        first.push_value(1.0).expect("sample");
        let figure = Figure::builder()
            .style(FigureStyle {
                border: 5,
                ..FigureStyle::default()
            })
            .series(first)
            .series(Series::new("s"))
            .build("plot");
        assert_eq!(figure.view(), "plot");
        assert_eq!(figure.series_list().len(), 1);
        assert!(figure.series_list()[0].is_empty());
        assert_eq!(figure.style().border, 5);
    }
}
