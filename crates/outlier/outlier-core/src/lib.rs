//! Outlier Extraction Core
//!
//! STL decomposition, batch residual extraction, re-sorting, table export
//! and figure rendering.

mod calendar;
mod export;
mod extractor;
mod figures;
mod labeling;
mod ordering;
mod range;
mod render;
mod stl;
mod table;

pub use calendar::date_index;
pub use export::DelimitedExporter;
pub use extractor::{extract_outliers, OutlierExtractor};
pub use figures::save_processed_figures;
pub use labeling::{column_labels, column_labels_for};
pub use ordering::{sort_partition, split_processed};
pub use range::{resolve as resolve_range, select as select_range};
pub use render::PlotRenderer;
pub use stl::{default_trend_window, StlDecomposer};
pub use table::AbundanceTable;
