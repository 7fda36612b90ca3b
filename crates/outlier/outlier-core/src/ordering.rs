//! Re-splitting and re-sorting extraction results.

use outlier_spi::{OutlierError, OutlierExtraction, OutlierTable, Result, SortDirection};

/// Split an extraction back into its smallest and largest partitions and
/// sort each independently by the ranking column.
///
/// Sorting is stable, so re-applying the same direction leaves a partition
/// unchanged.
pub fn split_processed(
    extraction: &OutlierExtraction,
    small: SortDirection,
    large: SortDirection,
) -> Result<(OutlierTable, OutlierTable)> {
    let params = &extraction.params;
    let table = &extraction.table;
    let expected = params.nsmall + params.nlarge;
    if table.len() != expected {
        return Err(OutlierError::InconsistentPartition {
            expected,
            actual: table.len(),
        });
    }

    let (smallest, largest) = table.rows().split_at(params.nsmall);
    let smallest = sort_partition(&table.with_rows(smallest.to_vec()), params.column, small)?;
    let largest = sort_partition(&table.with_rows(largest.to_vec()), params.column, large)?;
    Ok((smallest, largest))
}

/// Stable sort of `table` by the column at `column`.
///
/// `column` is a position in [`OutlierTable::columns`]; the taxon column and
/// positions past the end are `IndexOutOfRange`.
pub fn sort_partition(
    table: &OutlierTable,
    column: usize,
    direction: SortDirection,
) -> Result<OutlierTable> {
    if column == 0 || column >= table.columns().len() {
        return Err(OutlierError::IndexOutOfRange {
            index: column as isize,
            len: table.columns().len(),
        });
    }
    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| {
        let ordering = a.values[column - 1].total_cmp(&b.values[column - 1]);
        if direction.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        }
    });
    Ok(table.with_rows(rows))
}
