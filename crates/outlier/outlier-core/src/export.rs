//! Delimited-text export of outlier tables.

use outlier_spi::{OutlierError, OutlierTable, Result, TableExporter};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a header row of column names, then one record per taxon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedExporter {
    delimiter: u8,
}

impl DelimitedExporter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn tsv() -> Self {
        Self::new(b'\t')
    }

    /// Export to a file, replacing it if present.
    pub fn write_path(&self, table: &OutlierTable, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .map_err(|e| OutlierError::Io(format!("{}: {}", path.display(), e)))?;
        self.export(table, &mut file)
    }
}

impl Default for DelimitedExporter {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl TableExporter for DelimitedExporter {
    fn export(&self, table: &OutlierTable, writer: &mut dyn Write) -> Result<()> {
        let csv_error = |e: csv::Error| OutlierError::Csv(e.to_string());
        let mut out = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        out.write_record(table.columns()).map_err(csv_error)?;
        for row in table.rows() {
            let mut record = Vec::with_capacity(row.values.len() + 1);
            record.push(row.taxon.clone());
            record.extend(row.values.iter().map(f64::to_string));
            out.write_record(&record).map_err(csv_error)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlier_spi::OutlierRow;

    fn table() -> OutlierTable {
        OutlierTable::new(
            vec!["taxon".into(), "day_8".into(), "day_9".into()],
            vec![
                OutlierRow::new("Bacteroides", vec![-1.5, 0.25]),
                OutlierRow::new("Prevotella, sp.", vec![2.0, 3.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_export() {
        let mut buffer = Vec::new();
        DelimitedExporter::default().export(&table(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "taxon,day_8,day_9\nBacteroides,-1.5,0.25\n\"Prevotella, sp.\",2,3\n"
        );
    }

    #[test]
    fn test_tsv_export() {
        let mut buffer = Vec::new();
        DelimitedExporter::tsv().export(&table(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("taxon\tday_8\tday_9\n"));
        assert!(text.contains("Prevotella, sp.\t2\t3"));
    }

    #[test]
    fn test_write_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outliers.csv");
        DelimitedExporter::default().write_path(&table(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
