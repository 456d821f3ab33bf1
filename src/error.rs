//! Error type shared by series, figures and file output.

use thiserror::Error;

use crate::series::SeriesKind;

/// Errors reported by plotting operations.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Samples added with a different channel count than the series holds.
    #[error("series `{label}` holds {expected}-channel samples, got {found}")]
    ShapeMismatch {
        /// Series label.
        label: String,
        /// Established channel count.
        expected: usize,
        /// Channel count of the rejected samples.
        found: usize,
    },
    /// Stored channel count disagrees with what the series kind draws.
    #[error("series `{label}` of kind {kind:?} stores {found} channels, expected {expected}")]
    Inconsistent {
        /// Series label.
        label: String,
        /// Series kind at draw time.
        kind: SeriesKind,
        /// Channel count implied by the kind.
        expected: usize,
        /// Channel count actually stored.
        found: usize,
    },
    /// Image encoding failed.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    /// File output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
