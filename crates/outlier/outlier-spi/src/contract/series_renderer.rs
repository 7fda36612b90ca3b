//! Trait for rendering a decomposition to an image

use std::path::Path;

use crate::error::Result;
use crate::model::DecomposedSeries;

/// Renders one decomposed series to an image file.
pub trait SeriesRenderer: Send + Sync {
    /// File extension of the produced image, e.g. `svg` or `png`.
    fn format(&self) -> &str;

    /// Draw the observed series and its three components into `path`.
    fn render(&self, figure: &DecomposedSeries, path: &Path) -> Result<()>;
}
