//! Data series configuration, storage and per-kind drawing.
//!
//! A series stores samples as `(key, value channels…)` records in one flat
//! buffer. The number of value channels is fixed by the first stored sample
//! and stays fixed until [`Series::clear`].

use crate::bounds::{Bounds, Range};
use crate::color::Color;
use crate::compositor::Compositor;
use crate::error::PlotError;
use crate::geom::{PixelPoint, Point2, Point3};
use crate::render::Canvas;
use crate::transform::Transform;

/// Key channels per sample.
const KEY_DIMS: usize = 1;

/// Minimum inner padding, in pixels, for bar-like series.
const BAR_PADDING: i32 = 30;

/// How a series renders its samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeriesKind {
    /// Straight segments between consecutive samples.
    #[default]
    Line,
    /// Segments plus a small circle per sample.
    DotLine,
    /// A small circle per sample.
    Dots,
    /// Segments with the area down to the reference axis filled.
    FillLine,
    /// Segments of the first channel over a band between channels two and three.
    RangeLine,
    /// Vertical bars from the reference axis.
    Histogram,
    /// Horizontal bars from the reference axis.
    Vistogram,
    /// A line across the plot at each Y value.
    Horizontal,
    /// A line across the plot at each X value.
    Vertical,
    /// A band between two channels.
    Range,
    /// Filled circles with a per-sample pixel radius.
    Circle,
}

impl SeriesKind {
    /// Value channels a sample of this kind carries, without dynamic color.
    pub fn value_depth(self) -> usize {
        match self {
            Self::RangeLine => 3,
            Self::Range | Self::Circle => 2,
            _ => 1,
        }
    }

    /// Bars that share the plot and fan out side by side.
    pub fn collides(self) -> bool {
        matches!(self, Self::Histogram | Self::Vistogram)
    }

    /// Kinds that place the value on X and the key on Y.
    pub fn flips_axis(self) -> bool {
        matches!(self, Self::Vertical | Self::Vistogram)
    }
}

/// A sample value with a fixed number of channels.
pub trait SampleValue: Copy {
    /// Number of channels.
    const DEPTH: usize;

    /// Append the channels to `out`.
    fn write(&self, out: &mut Vec<f64>);
}

impl SampleValue for f64 {
    const DEPTH: usize = 1;

    fn write(&self, out: &mut Vec<f64>) {
        out.push(*self);
    }
}

impl SampleValue for Point2 {
    const DEPTH: usize = 2;

    fn write(&self, out: &mut Vec<f64>) {
        out.extend_from_slice(&[self.x, self.y]);
    }
}

impl SampleValue for Point3 {
    const DEPTH: usize = 3;

    fn write(&self, out: &mut Vec<f64>) {
        out.extend_from_slice(&[self.x, self.y, self.z]);
    }
}

/// Shared placement parameters handed to every series of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    /// Visible X range.
    pub x: Range,
    /// Visible Y range.
    pub y: Range,
    /// Value to pixel mapping.
    pub transform: Transform,
    /// X value of the vertical reference axis.
    pub x_axis: f64,
    /// Y value of the horizontal reference axis.
    pub y_axis: f64,
    /// Marker unit in pixels.
    pub unit: i32,
    /// Fan-out fraction for colliding bars.
    pub offset: f64,
}

/// A labeled, typed sample store.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    label: String,
    kind: SeriesKind,
    color: Color,
    legend: bool,
    dynamic_color: bool,
    depth: Option<usize>,
    entries: Vec<usize>,
    data: Vec<f64>,
}

impl Series {
    /// Create an empty line series colored by its label.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let color = Color::hash(&label);
        Self {
            label,
            kind: SeriesKind::Line,
            color,
            legend: true,
            dynamic_color: false,
            depth: None,
            entries: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Access the series label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Access the series kind.
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    /// Access the series color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Check whether the series shows in the legend.
    pub fn legend(&self) -> bool {
        self.legend
    }

    /// Check whether sample colors come from the last channel.
    pub fn dynamic_color(&self) -> bool {
        self.dynamic_color
    }

    /// Key channels per sample, `0` before any data.
    pub fn dims(&self) -> usize {
        if self.depth.is_some() { KEY_DIMS } else { 0 }
    }

    /// Value channels per sample, `0` before any data.
    pub fn depth(&self) -> usize {
        self.depth.unwrap_or(0)
    }

    /// Offsets of each sample into [`Self::data`].
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    /// Flat sample buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set the series kind.
    pub fn set_kind(&mut self, kind: SeriesKind) -> &mut Self {
        self.kind = kind;
        self
    }

    /// Set the series color. Its alpha is the series opacity.
    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Derive each sample's color from its last channel.
    pub fn set_dynamic_color(&mut self, dynamic_color: bool) -> &mut Self {
        self.dynamic_color = dynamic_color;
        self
    }

    /// Show or hide the series in the legend.
    pub fn set_legend(&mut self, legend: bool) -> &mut Self {
        self.legend = legend;
        self
    }

    /// Drop all samples and the established sample shape.
    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self.data.clear();
        self.depth = None;
        self
    }

    /// Append keyed samples.
    ///
    /// Fails without storing anything when `V` has a different channel count
    /// than the samples already held.
    pub fn add<V, I>(&mut self, samples: I) -> Result<&mut Self, PlotError>
    where
        V: SampleValue,
        I: IntoIterator<Item = (f64, V)>,
    {
        if let Some(depth) = self.depth.filter(|depth| *depth != V::DEPTH) {
            log::warn!(
                "series `{}`: rejecting {}-channel samples, series holds {}-channel samples",
                self.label,
                V::DEPTH,
                depth
            );
            return Err(PlotError::ShapeMismatch {
                label: self.label.clone(),
                expected: depth,
                found: V::DEPTH,
            });
        }
        for (key, value) in samples {
            self.depth = Some(V::DEPTH);
            self.entries.push(self.data.len());
            self.data.push(key);
            value.write(&mut self.data);
        }
        Ok(self)
    }

    /// Append values keyed by their running position.
    pub fn add_value<V, I>(&mut self, values: I) -> Result<&mut Self, PlotError>
    where
        V: SampleValue,
        I: IntoIterator<Item = V>,
    {
        let start = self.entries.len();
        self.add(
            values
                .into_iter()
                .enumerate()
                .map(|(i, value)| ((start + i) as f64, value)),
        )
    }

    /// Append a single keyed sample.
    pub fn push<V: SampleValue>(&mut self, key: f64, value: V) -> Result<&mut Self, PlotError> {
        self.add([(key, value)])
    }

    /// Append a single value keyed by its position.
    pub fn push_value<V: SampleValue>(&mut self, value: V) -> Result<&mut Self, PlotError> {
        self.add_value([value])
    }

    /// Replace all samples.
    pub fn set<V, I>(&mut self, samples: I) -> Result<&mut Self, PlotError>
    where
        V: SampleValue,
        I: IntoIterator<Item = (f64, V)>,
    {
        self.clear().add(samples)
    }

    /// Replace all samples with values keyed from zero.
    pub fn set_value<V, I>(&mut self, values: I) -> Result<&mut Self, PlotError>
    where
        V: SampleValue,
        I: IntoIterator<Item = V>,
    {
        self.clear().add_value(values)
    }

    /// Check that the stored shape matches what the kind draws.
    pub fn verify(&self) -> Result<(), PlotError> {
        let expected = self.kind.value_depth() + usize::from(self.dynamic_color);
        if self.entries.is_empty() || self.depth() == expected {
            return Ok(());
        }
        Err(PlotError::Inconsistent {
            label: self.label.clone(),
            kind: self.kind,
            expected,
            found: self.depth(),
        })
    }

    /// Whether the series fans out with other bar series.
    pub fn collides(&self) -> bool {
        self.kind.collides()
    }

    fn samples(&self) -> impl Iterator<Item = &[f64]> + '_ {
        let width = KEY_DIMS + self.depth();
        self.entries
            .iter()
            .filter_map(move |&e| self.data.get(e..e + width))
    }

    fn pairs(&self) -> impl Iterator<Item = (&[f64], &[f64])> + '_ {
        self.samples().zip(self.samples().skip(1))
    }

    fn sample_color(&self, sample: &[f64]) -> Color {
        match sample.last() {
            Some(&hue) if self.dynamic_color => Color::cos(hue as f32),
            _ => self.color,
        }
    }

    /// Fold this series into running bounds.
    ///
    /// Value extents cover every value channel except a dynamic color channel,
    /// and only the first channel for circles. Horizontal series touch only Y
    /// and vertical series only X.
    pub fn bounds(&self, bounds: &mut Bounds) {
        let mut value_depth = self.depth().saturating_sub(usize::from(self.dynamic_color));
        if self.kind == SeriesKind::Circle {
            value_depth = value_depth.min(1);
        }
        for sample in self.samples() {
            let (key, values) = sample.split_at(KEY_DIMS);
            let values = &values[..value_depth.min(values.len())];
            let (xs, ys) = if self.kind.flips_axis() {
                (values, key)
            } else {
                (key, values)
            };
            if self.kind != SeriesKind::Horizontal {
                xs.iter().for_each(|&x| bounds.x.expand_to_include(x));
            }
            if self.kind != SeriesKind::Vertical {
                ys.iter().for_each(|&y| bounds.y.expand_to_include(y));
            }
        }
        bounds.n_max = bounds.n_max.max(self.entries.len());
        if self.kind.collides() {
            bounds.p_max = bounds.p_max.max(BAR_PADDING);
        }
    }

    /// Render all samples onto `canvas`.
    pub fn draw(&self, canvas: &mut Canvas<'_>, params: &DrawParams) {
        if self.depth.is_none() {
            return;
        }
        let mut compositor = Compositor::new(canvas);
        match self.kind {
            SeriesKind::Line
            | SeriesKind::DotLine
            | SeriesKind::Dots
            | SeriesKind::FillLine
            | SeriesKind::RangeLine => self.draw_lines(&mut compositor, params),
            SeriesKind::Histogram | SeriesKind::Vistogram => {
                self.draw_bars(&mut compositor, params)
            }
            SeriesKind::Horizontal | SeriesKind::Vertical => {
                self.draw_rules(&mut compositor, params)
            }
            SeriesKind::Range => self.draw_band(&mut compositor, params),
            SeriesKind::Circle => self.draw_circles(&mut compositor, params),
        }
    }

    fn draw_lines(&self, compositor: &mut Compositor<'_, '_>, params: &DrawParams) {
        let t = &params.transform;
        let alpha = self.color.a;
        match self.kind {
            SeriesKind::FillLine => {
                let axis = t.py(params.y_axis);
                for (last, sample) in self.pairs() {
                    let point = t.to_pixel(sample[0], sample[1]);
                    let previous = t.to_pixel(last[0], last[1]);
                    let quad = [
                        point,
                        PixelPoint::new(point.x, axis),
                        PixelPoint::new(previous.x, axis),
                        previous,
                    ];
                    let color = self.sample_color(sample);
                    compositor.with(alpha / 2).fill_convex(&quad, color);
                }
            }
            SeriesKind::RangeLine if self.depth() >= 3 => {
                for (last, sample) in self.pairs() {
                    let quad = [
                        t.to_pixel(sample[0], sample[2]),
                        t.to_pixel(sample[0], sample[3]),
                        t.to_pixel(last[0], last[3]),
                        t.to_pixel(last[0], last[2]),
                    ];
                    let color = self.sample_color(sample);
                    compositor.with(alpha / 2).fill_convex(&quad, color);
                }
            }
            _ => {}
        }
        let stroke = !matches!(self.kind, SeriesKind::Dots);
        let dots = matches!(self.kind, SeriesKind::Dots | SeriesKind::DotLine);
        let mut last: Option<PixelPoint> = None;
        for sample in self.samples() {
            let color = self.sample_color(sample);
            let point = t.to_pixel(sample[0], sample[1]);
            if let Some(previous) = last.filter(|_| stroke) {
                compositor.with(alpha).line(previous, point, color);
            }
            if dots {
                compositor.with(alpha).stroke_circle(point, 2, color);
            }
            last = Some(point);
        }
    }

    fn draw_bars(&self, compositor: &mut Compositor<'_, '_>, params: &DrawParams) {
        let t = &params.transform;
        let u = 2 * params.unit;
        let o = (f64::from(2 * u) * params.offset) as i32;
        for sample in self.samples() {
            let (key, value) = (sample[0], sample[1]);
            let (a, b) = if self.kind == SeriesKind::Histogram {
                let x = t.px(key).saturating_add(o);
                (
                    PixelPoint::new(x.saturating_sub(u), t.py(params.y_axis)),
                    PixelPoint::new(x.saturating_add(u), t.py(value)),
                )
            } else {
                let y = t.py(key).saturating_add(o);
                (
                    PixelPoint::new(t.px(params.x_axis), y.saturating_sub(u)),
                    PixelPoint::new(t.px(value), y.saturating_add(u)),
                )
            };
            let color = self.sample_color(sample);
            compositor.with(self.color.a).fill_corners(a, b, color);
        }
    }

    fn draw_rules(&self, compositor: &mut Compositor<'_, '_>, params: &DrawParams) {
        let t = &params.transform;
        for sample in self.samples() {
            let value = sample[1];
            let (a, b) = if self.kind == SeriesKind::Horizontal {
                let (min, max) = (params.x.min, params.x.max);
                (t.to_pixel(min, value), t.to_pixel(max, value))
            } else {
                let (min, max) = (params.y.min, params.y.max);
                (t.to_pixel(value, min), t.to_pixel(value, max))
            };
            let color = self.sample_color(sample);
            compositor.with(self.color.a).line(a, b, color);
        }
    }

    fn draw_band(&self, compositor: &mut Compositor<'_, '_>, params: &DrawParams) {
        if self.depth() < 2 {
            return;
        }
        let t = &params.transform;
        for (last, sample) in self.pairs() {
            let quad = [
                t.to_pixel(sample[0], sample[1]),
                t.to_pixel(sample[0], sample[2]),
                t.to_pixel(last[0], last[2]),
                t.to_pixel(last[0], last[1]),
            ];
            let color = self.sample_color(sample);
            compositor.with(self.color.a).fill_convex(&quad, color);
        }
    }

    fn draw_circles(&self, compositor: &mut Compositor<'_, '_>, params: &DrawParams) {
        if self.depth() < 2 {
            return;
        }
        let t = &params.transform;
        for sample in self.samples() {
            let center = t.to_pixel(sample[0], sample[1]);
            let radius = sample[2] as i32;
            let (alpha, color) = (self.color.a, self.sample_color(sample));
            compositor.with(alpha).fill_circle(center, radius, color);
        }
    }

    /// Filled legend swatch in the series color.
    pub fn dot(&self, canvas: &mut Canvas<'_>, center: PixelPoint, radius: i32) {
        let (mut compositor, color) = (Compositor::new(canvas), self.color);
        compositor.with(color.a).fill_circle(center, radius, color);
    }
}
