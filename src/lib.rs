//! pixel_plot draws multi-series 2D plots into RGB pixel buffers.
//! Figures share one window buffer through named views, and finished frames
//! go to a pluggable display or straight to PNG files.

#![forbid(unsafe_code)]

pub mod axis;
pub mod bounds;
pub mod color;
pub mod compositor;
pub mod context;
pub mod display;
pub mod error;
pub mod figure;
pub mod geom;
pub mod render;
pub mod series;
pub mod transform;
pub mod view;
pub mod window;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use bounds::{Bounds, Range};
pub use color::Color;
pub use compositor::Compositor;
pub use context::PlotContext;
pub use display::{
    Display, HeadlessDisplay, Key, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};
pub use error::PlotError;
pub use figure::{Figure, FigureBuilder, FigureStyle};
pub use geom::{Offset, PixelPoint, Point2, Point3, Rect, Size};
pub use render::{Canvas, Font, PixelBuffer};
pub use series::{DrawParams, SampleValue, Series, SeriesKind};
pub use transform::Transform;
pub use view::ViewMut;
pub use window::{DEFAULT_VIEW_SIZE, Window, WindowConfig};

#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiDisplay, GpuiFrameView};
