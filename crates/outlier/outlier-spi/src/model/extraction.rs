//! Extraction parameters and results.

use crate::model::OutlierTable;
use serde::{Deserialize, Serialize};

/// Which column of an [`OutlierTable`] ranks the rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSelector {
    /// The final (most recent) time point.
    #[default]
    Last,
    /// Position among all columns, taxon column included; negative counts
    /// back from the end.
    Position(isize),
    /// Column label, e.g. `day_398` or `2004-02-05`.
    Name(String),
}

/// Sort direction for re-ordering a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// The column and counts an extraction actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionParameters {
    /// Resolved position of the ranking column.
    pub column: usize,
    /// Label of the ranking column.
    pub column_name: String,
    /// Rows in the "smallest" partition.
    pub nsmall: usize,
    /// Rows in the "largest" partition.
    pub nlarge: usize,
}

/// An extracted table with the parameters needed to split it again.
///
/// The first `nsmall` rows are the smallest values of the ranking column and
/// the remaining `nlarge` rows the largest, each in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierExtraction {
    pub table: OutlierTable,
    pub params: ExtractionParameters,
}
