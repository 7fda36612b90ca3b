//! Data models for outlier extraction.
//!
//! This module contains data structures shared by decomposition, selection,
//! labeling and extraction.

mod decomposition_result;
mod extraction;
mod frequency;
mod outlier_table;
mod range_spec;
mod series;

pub use decomposition_result::{DecomposedSeries, DecompositionResult};
pub use extraction::{ColumnSelector, ExtractionParameters, OutlierExtraction, SortDirection};
pub use frequency::FrequencyUnit;
pub use outlier_table::{OutlierRow, OutlierTable, TAXON_COLUMN};
pub use range_spec::RangeSpec;
pub use series::Series;
