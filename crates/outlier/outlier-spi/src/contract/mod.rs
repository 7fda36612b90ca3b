//! Contract module containing trait definitions for outlier extraction
//!
//! Providers implement these to plug in decomposition methods and output
//! collaborators.

mod decomposer;
mod series_renderer;
mod table_exporter;

pub use decomposer::Decomposer;
pub use series_renderer::SeriesRenderer;
pub use table_exporter::TableExporter;
