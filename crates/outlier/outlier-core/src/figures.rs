//! Writing decomposition figures for the extracted rows.

use std::fs;
use std::path::{Path, PathBuf};

use outlier_spi::{OutlierExtraction, OutlierTable, Result, SeriesRenderer, SortDirection};
use tracing::info;

use crate::extractor::OutlierExtractor;
use crate::ordering::split_processed;

/// Render one figure per extracted row as `low_{i}.{format}` and
/// `high_{i}.{format}`, numbered from 1 within each partition after sorting.
///
/// Must be called after the batch has finished; figures are rendered one at a
/// time on the calling thread. Files go to `output_dir`, or the working
/// directory when it is `None`. Returns the written paths, smallest partition
/// first.
pub fn save_processed_figures(
    extractor: &OutlierExtractor,
    extraction: &OutlierExtraction,
    renderer: &dyn SeriesRenderer,
    output_dir: Option<&Path>,
    small: SortDirection,
    large: SortDirection,
) -> Result<Vec<PathBuf>> {
    let (smallest, largest) = split_processed(extraction, small, large)?;
    let dir = output_dir.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let column = extraction.params.column;
    let mut written = Vec::with_capacity(smallest.len() + largest.len());
    for (prefix, partition) in [("low", &smallest), ("high", &largest)] {
        written.extend(write_partition(extractor, renderer, dir, prefix, partition, column)?);
    }
    Ok(written)
}

fn write_partition(
    extractor: &OutlierExtractor,
    renderer: &dyn SeriesRenderer,
    dir: &Path,
    prefix: &str,
    partition: &OutlierTable,
    column: usize,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(partition.len());
    for (i, row) in partition.rows().iter().enumerate() {
        let figure = extractor.decompose_extracted(row)?;
        let path = dir.join(format!("{}_{}.{}", prefix, i + 1, renderer.format()));
        renderer.render(&figure, &path)?;
        info!(
            taxon = %row.taxon,
            residual = partition.value(i, column),
            path = %path.display(),
            "saved figure"
        );
        written.push(path);
    }
    Ok(written)
}
