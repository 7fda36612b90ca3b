//! Taxon abundance tables.

use outlier_spi::{OutlierError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// One row per taxon: its identifier and its chronologically ordered
/// measurements. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct AbundanceTable {
    taxa: Vec<String>,
    measurements: Vec<Vec<f64>>,
    width: usize,
}

impl AbundanceTable {
    /// Build from in-memory rows; every row must have `width` measurements.
    pub fn new(taxa: Vec<String>, measurements: Vec<Vec<f64>>, width: usize) -> Result<Self> {
        if taxa.len() != measurements.len() {
            return Err(OutlierError::invalid_parameter(
                "taxa",
                format!(
                    "{} identifiers given for {} rows",
                    taxa.len(),
                    measurements.len()
                ),
            ));
        }
        if let Some(row) = measurements.iter().position(|m| m.len() != width) {
            return Err(OutlierError::invalid_parameter(
                "measurements",
                format!(
                    "row {} has {} measurements, expected {}",
                    row,
                    measurements[row].len(),
                    width
                ),
            ));
        }
        Ok(Self {
            taxa,
            measurements,
            width,
        })
    }

    /// Build from `(taxon, measurements)` pairs, taking the width from the first row.
    pub fn from_rows<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let (taxa, measurements): (Vec<String>, Vec<Vec<f64>>) =
            rows.into_iter().map(|(t, m)| (t.into(), m)).unzip();
        let width = measurements.first().map(Vec::len).unwrap_or(0);
        Self::new(taxa, measurements, width)
    }

    /// Load a CSV file with a header row.
    pub fn from_csv_path(
        path: &Path,
        taxon_column: &str,
        measurement_start: usize,
    ) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| OutlierError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file), taxon_column, measurement_start)
    }

    /// Read CSV with a header row. The identifier column is looked up by name;
    /// every column from `measurement_start` onward is a measurement.
    pub fn from_reader<R: Read>(
        reader: R,
        taxon_column: &str,
        measurement_start: usize,
    ) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| OutlierError::Csv(e.to_string()))?
            .clone();

        let taxon_idx = headers
            .iter()
            .position(|h| h == taxon_column)
            .ok_or_else(|| OutlierError::MissingColumn(taxon_column.to_string()))?;
        if measurement_start >= headers.len() {
            return Err(OutlierError::MissingColumn(format!(
                "measurement columns starting at position {} ({} columns present)",
                measurement_start,
                headers.len()
            )));
        }
        let width = headers.len() - measurement_start;

        let mut taxa = Vec::new();
        let mut measurements = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| OutlierError::Csv(e.to_string()))?;
            let taxon = record
                .get(taxon_idx)
                .ok_or_else(|| OutlierError::MissingColumn(taxon_column.to_string()))?;

            let values = (measurement_start..headers.len())
                .map(|col| {
                    let raw = record.get(col).unwrap_or("");
                    raw.trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| OutlierError::InvalidValue {
                            row,
                            column: headers.get(col).unwrap_or("").to_string(),
                            value: raw.to_string(),
                        })
                })
                .collect::<Result<Vec<f64>>>()?;

            taxa.push(taxon.to_string());
            measurements.push(values);
        }

        debug!(
            rows = taxa.len(),
            measurements = width,
            taxon_column,
            "loaded abundance table"
        );
        Self::new(taxa, measurements, width)
    }

    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Number of measurement columns (time points).
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    pub fn taxon(&self, row: usize) -> Option<&str> {
        self.taxa.get(row).map(String::as_str)
    }

    pub fn measurements(&self, row: usize) -> Option<&[f64]> {
        self.measurements.get(row).map(Vec::as_slice)
    }

    /// First row whose identifier equals `taxon`.
    pub fn position(&self, taxon: &str) -> Option<usize> {
        self.taxa.iter().position(|t| t == taxon)
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.taxa
            .iter()
            .map(String::as_str)
            .zip(self.measurements.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
id,taxa_string,phylum,d0,d1,d2
1,Bacteroides,Bacteroidetes,1.0,2.0,3.0
2,Prevotella,Bacteroidetes,0.5, 0.25 ,0.125
";

    #[test]
    fn test_from_reader() {
        let table = AbundanceTable::from_reader(CSV.as_bytes(), "taxa_string", 3).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.width(), 3);
        assert_eq!(table.taxon(1), Some("Prevotella"));
        assert_eq!(table.measurements(1).unwrap(), &[0.5, 0.25, 0.125]);
        assert_eq!(table.position("Bacteroides"), Some(0));
    }

    #[test]
    fn test_other_depth_column() {
        let table = AbundanceTable::from_reader(CSV.as_bytes(), "phylum", 3).unwrap();
        assert_eq!(table.taxa(), &["Bacteroidetes", "Bacteroidetes"]);
    }

    #[test]
    fn test_missing_taxon_column() {
        let err = AbundanceTable::from_reader(CSV.as_bytes(), "genus", 3).unwrap_err();
        assert_eq!(err, OutlierError::MissingColumn("genus".to_string()));
    }

    #[test]
    fn test_measurement_offset_past_end() {
        let err = AbundanceTable::from_reader(CSV.as_bytes(), "taxa_string", 6).unwrap_err();
        assert!(matches!(err, OutlierError::MissingColumn(_)));
    }

    #[test]
    fn test_non_numeric_measurement() {
        let csv = "taxa_string,d0,d1\nA,1.0,oops\n";
        let err = AbundanceTable::from_reader(csv.as_bytes(), "taxa_string", 1).unwrap_err();
        assert_eq!(
            err,
            OutlierError::InvalidValue {
                row: 0,
                column: "d1".to_string(),
                value: "oops".to_string(),
            }
        );
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "taxa_string,d0,d1\n";
        let table = AbundanceTable::from_reader(csv.as_bytes(), "taxa_string", 1).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn test_from_rows_ragged() {
        let err =
            AbundanceTable::from_rows(vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])]).unwrap_err();
        assert!(matches!(err, OutlierError::InvalidParameter { .. }));
    }

    #[test]
    fn test_from_csv_path_missing_file() {
        let path = Path::new("/nonexistent/abundance.csv");
        let err = AbundanceTable::from_csv_path(path, "taxa_string", 1).unwrap_err();
        assert!(matches!(err, OutlierError::Io(_)));
    }
}
