//! Outlier Extraction Facade
//!
//! Unified re-exports for seasonal-trend outlier extraction.
//!
//! This facade provides a single entry point:
//! - `Decomposer`, `SeriesRenderer`, `TableExporter` and the data model from SPI
//! - `OutlierConfig`, `ExtractionConfig` and `RenderConfig` from API
//! - `StlDecomposer`, `OutlierExtractor`, `PlotRenderer` and `DelimitedExporter`
//!   from Core

// Re-export everything from SPI
pub use outlier_spi::*;

// Re-export everything from API
pub use outlier_api::*;

// Re-export everything from Core
pub use outlier_core::*;
