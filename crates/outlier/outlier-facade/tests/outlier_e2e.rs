//! End-to-end tests for outlier extraction
//!
//! Load a CSV, extract, export and render figures using only the facade.

use std::fs;
use std::path::Path;

use outlier_facade::{
    save_processed_figures, AbundanceTable, ColumnSelector, DelimitedExporter, ExtractionConfig,
    OutlierConfig, OutlierError, OutlierExtractor, RenderConfig, RunConfig, SeriesRenderer,
    PlotRenderer, SortDirection, TableExporter,
};

const DAYS: usize = 28;

fn write_csv(path: &Path) {
    let mut csv = String::from("sample_id,taxa_string");
    for day in 0..DAYS {
        csv.push_str(&format!(",d{}", day));
    }
    csv.push('\n');
    for row in 0..6 {
        csv.push_str(&format!("{},k__Bacteria;g__Genus{}", row, row));
        for day in 0..DAYS {
            let wave = (day as f64 * std::f64::consts::TAU / 7.0).cos();
            let noise = ((day * (row + 3)) % 7) as f64 * 0.25;
            let value = 20.0 + row as f64 * 2.0 + 4.0 * wave + noise;
            csv.push_str(&format!(",{:.4}", value));
        }
        csv.push('\n');
    }
    fs::write(path, csv).unwrap();
}

fn small_render() -> RenderConfig {
    RenderConfig {
        dpi: 50,
        figure_size: (8.0, 6.0),
        ..RenderConfig::default()
    }
}

#[test]
fn e2e_csv_to_figures() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("abundance.csv");
    write_csv(&input);

    let table = AbundanceTable::from_csv_path(&input, "taxa_string", 2).unwrap();
    assert_eq!(table.len(), 6);
    assert_eq!(table.width(), DAYS);

    let config = OutlierConfig::builder()
        .seasonal_window(7)
        .measurement_start_column(2)
        .range(outlier_facade::RangeSpec::last(4))
        .build()
        .unwrap();
    let extractor = OutlierExtractor::new(table, config).unwrap();
    let extraction = extractor
        .extract(&ExtractionConfig::new(ColumnSelector::Last, 2, 2).with_calendar_dates(true))
        .unwrap();
    assert_eq!(extraction.params.column_name, "2003-01-31");
    assert_eq!(extraction.table.len(), 4);

    // Export
    let output = dir.path().join("outliers.csv");
    DelimitedExporter::default()
        .write_path(&extraction.table, &output)
        .unwrap();
    let exported = fs::read_to_string(&output).unwrap();
    let mut lines = exported.lines();
    assert_eq!(
        lines.next().unwrap(),
        "taxon,2003-01-28,2003-01-29,2003-01-30,2003-01-31"
    );
    assert_eq!(lines.count(), 4);

    // Figures
    let figures = dir.path().join("figures");
    let renderer = PlotRenderer::new(small_render()).unwrap();
    let paths = save_processed_figures(
        &extractor,
        &extraction,
        &renderer,
        Some(&figures),
        SortDirection::Ascending,
        SortDirection::Descending,
    )
    .unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["low_1.svg", "low_2.svg", "high_1.svg", "high_2.svg"]);
    for path in &paths {
        let svg = fs::read_to_string(path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"400\" height=\"300\""));
    }
}

#[test]
fn e2e_tsv_export_to_writer() {
    let table = AbundanceTable::from_rows(
        (0..3).map(|r| (format!("t{}", r), (0..14).map(|i| ((i + r) % 7) as f64).collect())),
    )
    .unwrap();
    let config = OutlierConfig::builder()
        .seasonal_window(7)
        .range(outlier_facade::RangeSpec::last(2))
        .build()
        .unwrap();
    let extraction = OutlierExtractor::new(table, config)
        .unwrap()
        .extract(&ExtractionConfig::new(ColumnSelector::Last, 1, 1))
        .unwrap();

    let mut buffer = Vec::new();
    DelimitedExporter::tsv()
        .export(&extraction.table, &mut buffer)
        .unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with("taxon\tday_12\tday_13\n"));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn e2e_run_config_drives_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("abundance.csv");
    write_csv(&input);

    let json = r#"{
        "outlier": { "seasonal_window": 9, "measurement_start_column": 2, "range": { "start": -2, "open_ended": true } },
        "extraction": { "by": { "position": -2 }, "nsmall": 1, "nlarge": 1, "execution": { "parallel": { "workers": 2 } } },
        "render": { "format": "png", "dpi": 10 }
    }"#;
    let run = RunConfig::from_json(json).unwrap();
    let table = AbundanceTable::from_csv_path(
        &input,
        &run.outlier.taxon_depth_column,
        run.outlier.measurement_start_column,
    )
    .unwrap();
    let extractor = OutlierExtractor::new(table, run.outlier.clone()).unwrap();
    let extraction = extractor.extract(&run.extraction).unwrap();
    assert_eq!(extraction.params.column_name, "day_26");
    assert_eq!(extraction.table.len(), 2);

    let renderer = PlotRenderer::new(run.render).unwrap();
    assert_eq!(renderer.format(), "png");
    let paths = save_processed_figures(
        &extractor,
        &extraction,
        &renderer,
        Some(dir.path()),
        SortDirection::Ascending,
        SortDirection::Ascending,
    )
    .unwrap();
    assert_eq!(paths.len(), 2);
    for path in &paths {
        assert_eq!(path.extension().unwrap(), "png");
        let bytes = fs::read(path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }
}

#[test]
fn e2e_missing_taxon_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("abundance.csv");
    write_csv(&input);
    assert_eq!(
        AbundanceTable::from_csv_path(&input, "genus", 2).unwrap_err(),
        OutlierError::MissingColumn("genus".to_string())
    );
}

#[test]
fn e2e_missing_input_file() {
    let path = Path::new("/nonexistent/abundance.csv");
    let err = AbundanceTable::from_csv_path(path, "taxa_string", 2).unwrap_err();
    assert!(matches!(err, OutlierError::Io(_)));
}
