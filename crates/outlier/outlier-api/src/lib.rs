//! Outlier Extraction API
//!
//! Configuration types and builders for outlier extraction.
//!
//! This crate provides:
//! - `OutlierConfig`, the single structure holding every decomposition and
//!   input-layout option
//! - `ExtractionConfig` and `ExecutionMode` for batch runs
//! - `RenderConfig` for the figure collaborator
//! - Re-exports from SPI for convenience

mod config;
mod date;

pub use config::{
    validate_seasonal_window, ExecutionMode, ExtractionConfig, OutlierConfig, OutlierConfigBuilder,
    RenderConfig, RunConfig, StlConfig, MIN_SEASONAL_WINDOW,
};
pub use date::parse_date;

// Re-export SPI types
pub use outlier_spi::{
    ColumnSelector, FrequencyUnit, OutlierError, RangeSpec, Result, SortDirection,
};
