//! Trait for writing outlier tables

use crate::error::Result;
use crate::model::OutlierTable;
use std::io::Write;

/// Writes an [`OutlierTable`] to a byte sink.
pub trait TableExporter {
    fn export(&self, table: &OutlierTable, writer: &mut dyn Write) -> Result<()>;
}
