//! Outlier Extraction Service Provider Interface
//!
//! Defines traits, models and errors for decomposing taxon abundance series
//! and extracting their most extreme residuals.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Decomposer, SeriesRenderer, TableExporter};
pub use error::{OutlierError, Result};
pub use model::{
    ColumnSelector, DecomposedSeries, DecompositionResult, ExtractionParameters, FrequencyUnit,
    OutlierExtraction, OutlierRow, OutlierTable, RangeSpec, Series, SortDirection, TAXON_COLUMN,
};
