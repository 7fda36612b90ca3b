//! # stl-outliers
//!
//! Command-line interface for extracting the most extreme STL residuals of
//! taxon abundance tables.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use outlier_facade::{
    parse_date, save_processed_figures, AbundanceTable, ColumnSelector, DelimitedExporter,
    ExecutionMode, FrequencyUnit, OutlierExtractor, RangeSpec, RunConfig, SeriesRenderer,
    PlotRenderer, SortDirection,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "stl-outliers")]
#[command(about = "Seasonal-trend residual outliers of taxon abundance series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose every taxon and keep the smallest and largest residuals
    Extract {
        #[command(flatten)]
        input: InputArgs,

        /// Ranking column: a label, a position (negative counts from the end) or "last"
        #[arg(long, allow_hyphen_values = true)]
        by: Option<String>,

        /// Label columns with calendar dates
        #[arg(long)]
        as_date: bool,

        /// Number of largest residuals to keep
        #[arg(long)]
        nlarge: Option<usize>,

        /// Number of smallest residuals to keep
        #[arg(long)]
        nsmall: Option<usize>,

        /// Decompose rows one at a time on the main thread
        #[arg(long, conflicts_with = "cores")]
        sequential: bool,

        /// Worker threads for parallel decomposition (default: all cores)
        #[arg(long)]
        cores: Option<usize>,

        /// Write the extracted table here (.tsv for tab-separated)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the extraction as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Save a decomposition figure per extracted row into this directory
        #[arg(long)]
        figures: Option<PathBuf>,

        /// Sort the smallest partition in descending order before plotting
        #[arg(long)]
        small_descending: bool,

        /// Sort the largest partition in descending order before plotting
        #[arg(long)]
        large_descending: bool,

        /// Figure resolution in dots per inch
        #[arg(long)]
        dpi: Option<u32>,

        /// Figure image format (svg, png or jpg)
        #[arg(long)]
        format: Option<String>,
    },

    /// Plot the full decomposition of a single taxon
    Plot {
        #[command(flatten)]
        input: InputArgs,

        /// Row position of the taxon
        #[arg(long, conflicts_with = "taxon")]
        row: Option<usize>,

        /// Taxon identifier (first matching row)
        #[arg(long)]
        taxon: Option<String>,

        /// Output image path; its extension picks the image format
        #[arg(short, long)]
        output: PathBuf,

        /// Figure resolution in dots per inch
        #[arg(long)]
        dpi: Option<u32>,
    },
}

/// Input layout and decomposition options shared by every subcommand.
#[derive(Args)]
struct InputArgs {
    /// Abundance table (CSV with a header row)
    #[arg(short, long)]
    input: PathBuf,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seasonal smoothing window (odd, at least 7)
    #[arg(long)]
    seasonal: Option<usize>,

    /// Robust decomposition
    #[arg(long)]
    robust: bool,

    /// Seasonal period override
    #[arg(long)]
    period: Option<usize>,

    /// Measurement spacing (D, W, M or Y)
    #[arg(long)]
    freq: Option<FrequencyUnit>,

    /// Date of the first measurement (YYYY-MM-DD or MM-DD-YYYY)
    #[arg(long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    /// Column holding the taxon identifier
    #[arg(long)]
    taxon_depth: Option<String>,

    /// Position of the first measurement column
    #[arg(long)]
    measurement_start: Option<usize>,

    /// First time point to extract; negative counts from the end
    #[arg(long, allow_negative_numbers = true)]
    start: Option<isize>,

    /// Extract every time point from the start onward
    #[arg(long)]
    until_end: bool,
}

impl InputArgs {
    /// Configuration file (or defaults) with command-line overrides applied.
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut run = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                RunConfig::from_json(&json)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => RunConfig::default(),
        };

        let outlier = &mut run.outlier;
        if let Some(seasonal) = self.seasonal {
            outlier.seasonal_window = seasonal;
        }
        if self.robust {
            outlier.robust = true;
        }
        if self.period.is_some() {
            outlier.period = self.period;
        }
        if let Some(freq) = self.freq {
            outlier.frequency = freq;
        }
        if let Some(start_date) = self.start_date {
            outlier.start_date = start_date;
        }
        if let Some(column) = &self.taxon_depth {
            outlier.taxon_depth_column = column.clone();
        }
        if let Some(column) = self.measurement_start {
            outlier.measurement_start_column = column;
        }
        match self.start {
            Some(start) => outlier.range = RangeSpec::new(start, self.until_end),
            None if self.until_end => outlier.range.open_ended = true,
            None => {}
        }
        outlier.validate()?;
        Ok(run)
    }

    fn load(&self, run: &RunConfig) -> anyhow::Result<OutlierExtractor> {
        let table = AbundanceTable::from_csv_path(
            &self.input,
            &run.outlier.taxon_depth_column,
            run.outlier.measurement_start_column,
        )?;
        info!(
            taxa = table.len(),
            time_points = table.width(),
            path = %self.input.display(),
            "loaded abundance table"
        );
        Ok(OutlierExtractor::new(table, run.outlier.clone())?)
    }
}

fn parse_selector(by: &str) -> ColumnSelector {
    if by.eq_ignore_ascii_case("last") {
        ColumnSelector::Last
    } else if let Ok(position) = by.parse::<isize>() {
        ColumnSelector::Position(position)
    } else {
        ColumnSelector::Name(by.to_string())
    }
}

fn direction(descending: bool) -> SortDirection {
    if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

fn exporter_for(path: &Path) -> DelimitedExporter {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DelimitedExporter::tsv(),
        _ => DelimitedExporter::default(),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_extract(
    input: InputArgs,
    by: Option<String>,
    as_date: bool,
    nlarge: Option<usize>,
    nsmall: Option<usize>,
    sequential: bool,
    cores: Option<usize>,
    output: Option<PathBuf>,
    json: bool,
    figures: Option<PathBuf>,
    small_descending: bool,
    large_descending: bool,
    dpi: Option<u32>,
    format: Option<String>,
) -> anyhow::Result<()> {
    let mut run = input.run_config()?;
    let extraction_config = &mut run.extraction;
    if let Some(by) = by.as_deref() {
        extraction_config.by = parse_selector(by);
    }
    if as_date {
        extraction_config.as_calendar_date = true;
    }
    if let Some(n) = nlarge {
        extraction_config.nlarge = n;
    }
    if let Some(n) = nsmall {
        extraction_config.nsmall = n;
    }
    if sequential {
        extraction_config.execution = ExecutionMode::Sequential;
    } else if cores.is_some() {
        extraction_config.execution = ExecutionMode::Parallel { workers: cores };
    }
    if let Some(dpi) = dpi {
        run.render.dpi = dpi;
    }
    if let Some(format) = format {
        run.render.format = format;
    }

    // Fail on an unusable renderer before the batch runs.
    let renderer = if figures.is_some() {
        Some(PlotRenderer::new(run.render.clone())?)
    } else {
        None
    };

    let extractor = input.load(&run)?;
    let extraction = extractor.extract(&run.extraction)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
    } else {
        println!("{}", extraction.table);
    }

    if let Some(path) = &output {
        exporter_for(path)
            .write_path(&extraction.table, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = extraction.table.len(), "wrote outlier table");
    }

    if let (Some(renderer), Some(dir)) = (renderer, figures.as_deref()) {
        let written = save_processed_figures(
            &extractor,
            &extraction,
            &renderer,
            Some(dir),
            direction(small_descending),
            direction(large_descending),
        )?;
        info!(figures = written.len(), dir = %dir.display(), "saved figures");
    }
    Ok(())
}

fn run_plot(
    input: InputArgs,
    row: Option<usize>,
    taxon: Option<String>,
    output: PathBuf,
    dpi: Option<u32>,
) -> anyhow::Result<()> {
    let mut run = input.run_config()?;
    if let Some(dpi) = dpi {
        run.render.dpi = dpi;
    }
    if let Some(format) = output.extension().and_then(|e| e.to_str()) {
        run.render.format = format.to_string();
    }
    let renderer = PlotRenderer::new(run.render.clone())?;
    let extractor = input.load(&run)?;

    let figure = match (row, taxon.as_deref()) {
        (Some(row), _) => extractor.decompose_row(row)?,
        (None, Some(taxon)) => extractor.decompose_taxon(taxon)?,
        (None, None) => bail!("either --row or --taxon is required"),
    };
    renderer
        .render(&figure, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(taxon = %figure.series.taxon, path = %output.display(), "saved figure");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stl_outliers=info,outlier_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            by,
            as_date,
            nlarge,
            nsmall,
            sequential,
            cores,
            output,
            json,
            figures,
            small_descending,
            large_descending,
            dpi,
            format,
        } => run_extract(
            input,
            by,
            as_date,
            nlarge,
            nsmall,
            sequential,
            cores,
            output,
            json,
            figures,
            small_descending,
            large_descending,
            dpi,
            format,
        ),

        Commands::Plot {
            input,
            row,
            taxon,
            output,
            dpi,
        } => run_plot(input, row, taxon, output, dpi),
    }
}
