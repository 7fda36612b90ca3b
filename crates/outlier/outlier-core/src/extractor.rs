//! Batch residual extraction across every taxon of an abundance table.

use chrono::NaiveDate;
use outlier_api::{ExecutionMode, ExtractionConfig, OutlierConfig};
use outlier_spi::{
    ColumnSelector, DecomposedSeries, Decomposer, ExtractionParameters, OutlierError,
    OutlierExtraction, OutlierRow, OutlierTable, Result, Series,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::calendar::date_index;
use crate::labeling::column_labels;
use crate::range;
use crate::stl::StlDecomposer;
use crate::table::AbundanceTable;

/// Decomposes every taxon of a table and ranks their residuals.
///
/// # Example
///
/// ```rust,ignore
/// use outlier_facade::*;
///
/// let table = AbundanceTable::from_csv_path(path, "taxa_string", 124)?;
/// let config = OutlierConfig::builder().range(RangeSpec::last(5)).build()?;
/// let extractor = OutlierExtractor::new(table, config)?;
///
/// let extraction = extractor.extract(&ExtractionConfig::default())?;
/// println!("{}", extraction.table);
/// ```
#[derive(Debug, Clone)]
pub struct OutlierExtractor {
    table: AbundanceTable,
    config: OutlierConfig,
    index: Vec<NaiveDate>,
    decomposer: StlDecomposer,
}

impl OutlierExtractor {
    /// Validate the configuration and build the calendar index.
    pub fn new(table: AbundanceTable, config: OutlierConfig) -> Result<Self> {
        config.validate()?;
        let decomposer = StlDecomposer::new(&config.stl_config())?;
        let index = date_index(config.start_date, table.width(), config.frequency)?;
        debug!(
            period = decomposer.period(),
            seasonal = decomposer.seasonal_window(),
            trend = decomposer.trend_window(),
            low_pass = decomposer.low_pass_window(),
            robust = decomposer.is_robust(),
            "configured decomposer"
        );
        Ok(Self {
            table,
            config,
            index,
            decomposer,
        })
    }

    pub fn table(&self) -> &AbundanceTable {
        &self.table
    }

    pub fn config(&self) -> &OutlierConfig {
        &self.config
    }

    pub fn decomposer(&self) -> &StlDecomposer {
        &self.decomposer
    }

    /// Calendar date of every measurement column.
    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// Residuals of one row at the configured range.
    pub fn residual_window(&self, row: usize) -> Result<OutlierRow> {
        let (taxon, values) = self.row(row)?;
        self.window_for(row, taxon, values)
    }

    fn window_for(&self, row: usize, taxon: &str, values: &[f64]) -> Result<OutlierRow> {
        let components = self.decomposer.decompose(values)?;
        let selected = range::select(&components.residual, self.config.range)?;
        Ok(OutlierRow::new(taxon, selected.to_vec()).with_source(row))
    }

    /// Residuals of every row at the configured range, in table order.
    ///
    /// Rows are decomposed independently; under [`ExecutionMode::Parallel`]
    /// the table is assembled only after every worker has finished, and rows
    /// keep their input order regardless of completion order.
    pub fn residual_table(
        &self,
        as_calendar_date: bool,
        execution: ExecutionMode,
    ) -> Result<OutlierTable> {
        if self.table.is_empty() {
            return Err(OutlierError::EmptyInput);
        }
        let columns = column_labels(
            &self.index,
            self.config.range,
            self.config.frequency,
            as_calendar_date,
        )?;

        let rows = match execution {
            ExecutionMode::Sequential => self
                .table
                .rows()
                .enumerate()
                .map(|(row, (taxon, values))| self.window_for(row, taxon, values))
                .collect::<Result<Vec<_>>>()?,
            ExecutionMode::Parallel { workers } => {
                let mut builder = rayon::ThreadPoolBuilder::new();
                if let Some(workers) = workers {
                    if workers == 0 {
                        return Err(OutlierError::invalid_parameter(
                            "workers",
                            "must be at least 1",
                        ));
                    }
                    builder = builder.num_threads(workers);
                }
                let pool = builder
                    .build()
                    .map_err(|e| OutlierError::invalid_parameter("workers", e.to_string()))?;
                pool.install(|| {
                    self.table
                        .rows()
                        .enumerate()
                        .collect::<Vec<_>>()
                        .into_par_iter()
                        .map(|(row, (taxon, values))| self.window_for(row, taxon, values))
                        .collect::<Result<Vec<_>>>()
                })?
            }
        };

        OutlierTable::new(columns, rows)
    }

    /// Decompose every row, then keep the `nsmall` smallest and `nlarge`
    /// largest residuals of the ranking column.
    pub fn extract(&self, config: &ExtractionConfig) -> Result<OutlierExtraction> {
        info!(
            rows = self.table.len(),
            time_points = self.table.width(),
            nsmall = config.nsmall,
            nlarge = config.nlarge,
            "extracting residual outliers"
        );
        let residuals = self.residual_table(config.as_calendar_date, config.execution)?;
        let extraction = extract_outliers(&residuals, &config.by, config.nsmall, config.nlarge)?;
        info!(
            column = %extraction.params.column_name,
            rows = extraction.table.len(),
            "extraction complete"
        );
        Ok(extraction)
    }

    /// Full-length decomposition of one row.
    pub fn decompose_row(&self, row: usize) -> Result<DecomposedSeries> {
        let (taxon, values) = self.row(row)?;
        let components = self.decomposer.decompose(values)?;
        let series = Series::new(taxon, values.to_vec(), self.index.clone())?;
        Ok(DecomposedSeries { series, components })
    }

    /// Full-length decomposition of the first row labeled `taxon`.
    pub fn decompose_taxon(&self, taxon: &str) -> Result<DecomposedSeries> {
        let row = self.table.position(taxon).ok_or_else(|| {
            OutlierError::invalid_parameter("taxon", format!("'{}' not found", taxon))
        })?;
        self.decompose_row(row)
    }

    /// Full-length decomposition of the input row an extracted row came from.
    ///
    /// Falls back to the first row with the same taxon when the row carries
    /// no source position.
    pub fn decompose_extracted(&self, row: &OutlierRow) -> Result<DecomposedSeries> {
        match row.source {
            Some(source) => self.decompose_row(source),
            None => self.decompose_taxon(&row.taxon),
        }
    }

    fn row(&self, row: usize) -> Result<(&str, &[f64])> {
        let out_of_range = || OutlierError::IndexOutOfRange {
            index: row as isize,
            len: self.table.len(),
        };
        let taxon = self.table.taxon(row).ok_or_else(out_of_range)?;
        let values = self.table.measurements(row).ok_or_else(out_of_range)?;
        Ok((taxon, values))
    }
}

/// Keep the `nsmall` smallest then the `nlarge` largest rows of `table` by
/// the column `by` selects.
///
/// Both partitions are in ascending order of that column; ties keep their
/// original row order. Counts above the row count are clamped to it.
///
/// The partitions are chosen independently, so when `nsmall + nlarge`
/// exceeds the row count the same row appears in both and the output has
/// more rows than the input.
pub fn extract_outliers(
    table: &OutlierTable,
    by: &ColumnSelector,
    nsmall: usize,
    nlarge: usize,
) -> Result<OutlierExtraction> {
    if table.is_empty() {
        return Err(OutlierError::EmptyInput);
    }
    let column = table.resolve_column(by)?;
    let rows = table.len();

    let clamp = |requested: usize, name: &str| {
        if requested > rows {
            warn!(requested, rows, "{} exceeds the row count; clamping", name);
        }
        requested.min(rows)
    };
    let nsmall = clamp(nsmall, "nsmall");
    let nlarge = clamp(nlarge, "nlarge");

    // resolve_column guarantees 1 <= column < columns().len()
    let keys: Vec<f64> = table.rows().iter().map(|r| r.values[column - 1]).collect();
    let value = |row: usize| keys[row];
    let ascending = |a: &usize, b: &usize| value(*a).total_cmp(&value(*b)).then(a.cmp(b));

    let mut order: Vec<usize> = (0..rows).collect();
    order.sort_by(ascending);
    let smallest = &order[..nsmall];

    let mut largest: Vec<usize> = (0..rows).collect();
    largest.sort_by(|a, b| value(*b).total_cmp(&value(*a)).then(a.cmp(b)));
    largest.truncate(nlarge);
    largest.sort_by(ascending);

    let picked = smallest
        .iter()
        .chain(&largest)
        .map(|&row| table.rows()[row].clone())
        .collect();

    Ok(OutlierExtraction {
        table: table.with_rows(picked),
        params: ExtractionParameters {
            column,
            column_name: table.columns()[column].clone(),
            nsmall,
            nlarge,
        },
    })
}
