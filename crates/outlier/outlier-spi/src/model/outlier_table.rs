//! Rectangular residual tables.

use crate::error::{OutlierError, Result};
use crate::model::ColumnSelector;
use serde::{Deserialize, Serialize};

/// Name of the leading identifier column of every [`OutlierTable`].
pub const TAXON_COLUMN: &str = "taxon";

/// One taxon's residuals at the selected time points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierRow {
    pub taxon: String,
    pub values: Vec<f64>,
    /// Row position in the abundance table this row was computed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
}

impl OutlierRow {
    pub fn new(taxon: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            taxon: taxon.into(),
            values,
            source: None,
        }
    }

    /// Record the input row, so duplicate taxon identifiers stay distinct.
    pub fn with_source(mut self, row: usize) -> Self {
        self.source = Some(row);
        self
    }
}

/// Rows are taxa; columns are the taxon identifier followed by one column
/// per selected time point in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierTable {
    columns: Vec<String>,
    rows: Vec<OutlierRow>,
}

impl OutlierTable {
    /// Build a table, checking that every row has one value per data column.
    pub fn new(columns: Vec<String>, rows: Vec<OutlierRow>) -> Result<Self> {
        if columns.first().map(String::as_str) != Some(TAXON_COLUMN) {
            return Err(OutlierError::MissingColumn(TAXON_COLUMN.to_string()));
        }
        let width = columns.len() - 1;
        if let Some(row) = rows.iter().find(|r| r.values.len() != width) {
            return Err(OutlierError::invalid_parameter(
                "rows",
                format!(
                    "row '{}' has {} values but the table has {} data columns",
                    row.taxon,
                    row.values.len(),
                    width
                ),
            ));
        }
        Ok(Self { columns, rows })
    }

    /// Column names, starting with [`TAXON_COLUMN`].
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[OutlierRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<OutlierRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of residual columns (excluding the taxon column).
    pub fn data_width(&self) -> usize {
        self.columns.len() - 1
    }

    /// Same columns, different rows.
    pub fn with_rows(&self, rows: Vec<OutlierRow>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Resolve a selector to a position in [`columns`](Self::columns).
    ///
    /// The taxon column holds identifiers and can never be selected.
    pub fn resolve_column(&self, selector: &ColumnSelector) -> Result<usize> {
        let len = self.columns.len();
        let position = match selector {
            ColumnSelector::Last => len - 1,
            ColumnSelector::Position(p) => {
                let resolved = if *p < 0 { len as isize + p } else { *p };
                if resolved < 0 || resolved >= len as isize {
                    return Err(OutlierError::IndexOutOfRange { index: *p, len });
                }
                resolved as usize
            }
            ColumnSelector::Name(name) => self
                .columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| OutlierError::MissingColumn(name.clone()))?,
        };
        if position == 0 {
            return Err(OutlierError::invalid_parameter(
                "by",
                "the taxon column holds identifiers, not residuals",
            ));
        }
        Ok(position)
    }

    /// Value of a row at a column position from [`resolve_column`](Self::resolve_column).
    ///
    /// `None` for a missing row, the taxon column, or a position past the end.
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row)?.values.get(column.checked_sub(1)?).copied()
    }
}

impl std::fmt::Display for OutlierTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let taxon_width = self
            .rows
            .iter()
            .map(|r| r.taxon.len())
            .chain(std::iter::once(TAXON_COLUMN.len()))
            .max()
            .unwrap_or(0);
        let value_width = self.columns[1..]
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(12);

        write!(f, "{:<taxon_width$}", self.columns[0])?;
        for column in &self.columns[1..] {
            write!(f, "  {:>value_width$}", column)?;
        }
        writeln!(f)?;
        for row in &self.rows {
            write!(f, "{:<taxon_width$}", row.taxon)?;
            for value in &row.values {
                write!(f, "  {:>value_width$.6}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> OutlierTable {
        OutlierTable::new(
            vec!["taxon".into(), "day_8".into(), "day_9".into()],
            vec![
                OutlierRow::new("a", vec![1.0, -2.0]),
                OutlierRow::new("b", vec![0.5, 3.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_shape() {
        let t = table();
        assert_eq!(t.len(), 2);
        assert_eq!(t.data_width(), 2);
        assert_eq!(t.value(1, 2), Some(3.0));
    }

    #[test]
    fn test_value_outside_table() {
        let t = table();
        assert_eq!(t.value(0, 0), None);
        assert_eq!(t.value(0, 5), None);
        assert_eq!(t.value(2, 1), None);
    }

    #[test]
    fn test_source_row() {
        let row = OutlierRow::new("a", vec![1.0]).with_source(4);
        assert_eq!(row.source, Some(4));
        assert_eq!(OutlierRow::new("a", vec![1.0]).source, None);
    }

    #[test]
    fn test_requires_taxon_column() {
        let err = OutlierTable::new(vec!["day_0".into()], vec![]).unwrap_err();
        assert_eq!(err, OutlierError::MissingColumn("taxon".to_string()));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = OutlierTable::new(
            vec!["taxon".into(), "day_0".into()],
            vec![OutlierRow::new("a", vec![1.0, 2.0])],
        )
        .unwrap_err();
        assert!(matches!(err, OutlierError::InvalidParameter { .. }));
    }

    #[test]
    fn test_resolve_column_variants() {
        let t = table();
        assert_eq!(t.resolve_column(&ColumnSelector::Last).unwrap(), 2);
        assert_eq!(t.resolve_column(&ColumnSelector::Position(1)).unwrap(), 1);
        assert_eq!(t.resolve_column(&ColumnSelector::Position(-2)).unwrap(), 1);
        assert_eq!(
            t.resolve_column(&ColumnSelector::Name("day_9".into())).unwrap(),
            2
        );
    }

    #[test]
    fn test_resolve_column_errors() {
        let t = table();
        assert_eq!(
            t.resolve_column(&ColumnSelector::Position(3)).unwrap_err(),
            OutlierError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            t.resolve_column(&ColumnSelector::Name("day_1".into())).unwrap_err(),
            OutlierError::MissingColumn("day_1".to_string())
        );
        assert!(t.resolve_column(&ColumnSelector::Position(0)).is_err());
        assert!(t.resolve_column(&ColumnSelector::Name("taxon".into())).is_err());
    }

    #[test]
    fn test_display_has_header_and_rows() {
        let rendered = table().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("taxon"));
        assert!(lines[0].contains("day_9"));
        assert!(lines[2].contains("3.000000"));
    }
}
