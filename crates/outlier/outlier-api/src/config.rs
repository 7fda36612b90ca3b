//! Configuration types.

use chrono::NaiveDate;
use outlier_spi::{ColumnSelector, FrequencyUnit, OutlierError, RangeSpec, Result};
use serde::{Deserialize, Serialize};

/// Smallest seasonal window accepted by the decomposer.
pub const MIN_SEASONAL_WINDOW: usize = 7;

/// Reject seasonal windows that are even or below [`MIN_SEASONAL_WINDOW`].
pub fn validate_seasonal_window(window: usize) -> Result<()> {
    if window % 2 == 0 || window < MIN_SEASONAL_WINDOW {
        return Err(OutlierError::InvalidWindow { window });
    }
    Ok(())
}

// ============================================================================
// Decomposition Configuration
// ============================================================================

/// STL decomposer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StlConfig {
    /// Points per seasonal cycle (at least 2).
    pub period: usize,
    /// Seasonal smoothing window (odd, at least 7).
    pub seasonal: usize,
    /// Trend smoothing window; derived from period and seasonal when unset.
    pub trend: Option<usize>,
    /// Low-pass filter window; smallest odd integer above period when unset.
    pub low_pass: Option<usize>,
    /// Reweight observations to damp extreme values.
    pub robust: bool,
}

impl Default for StlConfig {
    fn default() -> Self {
        Self {
            period: FrequencyUnit::Day.default_period(),
            seasonal: 21,
            trend: None,
            low_pass: None,
            robust: false,
        }
    }
}

impl StlConfig {
    pub fn new(period: usize, seasonal: usize, robust: bool) -> Self {
        Self {
            period,
            seasonal,
            robust,
            ..Self::default()
        }
    }
}

// ============================================================================
// Input Layout and Decomposition
// ============================================================================

/// Every option that shapes how an abundance table is decomposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    /// Seasonal smoothing window (odd, at least 7; default: 21).
    pub seasonal_window: usize,
    /// Robust (iteratively reweighted) decomposition (default: false).
    pub robust: bool,
    /// Seasonal period override; defaults to the frequency unit's period.
    pub period: Option<usize>,
    /// Spacing of the measurement columns (default: day).
    pub frequency: FrequencyUnit,
    /// Date of the first measurement column (default: 2003-01-04).
    pub start_date: NaiveDate,
    /// Column holding the taxon identifier at the reported depth.
    pub taxon_depth_column: String,
    /// Position of the first measurement column; all later columns are
    /// measurements too.
    pub measurement_start_column: usize,
    /// Time points to extract.
    pub range: RangeSpec,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            seasonal_window: 21,
            robust: false,
            period: None,
            frequency: FrequencyUnit::Day,
            start_date: NaiveDate::from_ymd_opt(2003, 1, 4).unwrap_or_default(),
            taxon_depth_column: "taxa_string".to_string(),
            measurement_start_column: 124,
            range: RangeSpec::default(),
        }
    }
}

impl OutlierConfig {
    pub fn builder() -> OutlierConfigBuilder {
        OutlierConfigBuilder::new()
    }

    /// Period used for decomposition.
    pub fn effective_period(&self) -> usize {
        self.period.unwrap_or_else(|| self.frequency.default_period())
    }

    /// Decomposer settings implied by this configuration.
    pub fn stl_config(&self) -> StlConfig {
        StlConfig::new(self.effective_period(), self.seasonal_window, self.robust)
    }

    /// Check option combinations that would fail later in the batch.
    pub fn validate(&self) -> Result<()> {
        validate_seasonal_window(self.seasonal_window)?;
        let period = self.effective_period();
        if period < 2 {
            return Err(OutlierError::invalid_parameter(
                "period",
                format!(
                    "{} data has a period of {}; set an explicit period of at least 2",
                    self.frequency, period
                ),
            ));
        }
        if self.taxon_depth_column.trim().is_empty() {
            return Err(OutlierError::invalid_parameter(
                "taxon_depth_column",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Builder for OutlierConfig.
#[derive(Debug, Default)]
pub struct OutlierConfigBuilder {
    config: OutlierConfig,
}

impl OutlierConfigBuilder {
    /// Create a builder seeded with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seasonal_window(mut self, window: usize) -> Self {
        self.config.seasonal_window = window;
        self
    }

    pub fn robust(mut self, robust: bool) -> Self {
        self.config.robust = robust;
        self
    }

    pub fn period(mut self, period: usize) -> Self {
        self.config.period = Some(period);
        self
    }

    pub fn frequency(mut self, frequency: FrequencyUnit) -> Self {
        self.config.frequency = frequency;
        self
    }

    pub fn start_date(mut self, start_date: NaiveDate) -> Self {
        self.config.start_date = start_date;
        self
    }

    pub fn taxon_depth_column(mut self, column: &str) -> Self {
        self.config.taxon_depth_column = column.to_string();
        self
    }

    pub fn measurement_start_column(mut self, column: usize) -> Self {
        self.config.measurement_start_column = column;
        self
    }

    pub fn range(mut self, range: RangeSpec) -> Self {
        self.config.range = range;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<OutlierConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// Batch Extraction
// ============================================================================

/// How per-row decompositions are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One row after another on the calling thread.
    Sequential,
    /// A worker pool; `None` uses every available core.
    Parallel { workers: Option<usize> },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Parallel { workers: None }
    }
}

/// Extraction parameters for a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Column ranking the rows (default: last column).
    pub by: ColumnSelector,
    /// Label columns with calendar dates instead of `{unit}_{n}`.
    pub as_calendar_date: bool,
    /// Number of largest residuals to keep (default: 5).
    pub nlarge: usize,
    /// Number of smallest residuals to keep (default: 5).
    pub nsmall: usize,
    /// Scheduling of per-row decompositions.
    pub execution: ExecutionMode,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            by: ColumnSelector::Last,
            as_calendar_date: false,
            nlarge: 5,
            nsmall: 5,
            execution: ExecutionMode::default(),
        }
    }
}

impl ExtractionConfig {
    pub fn new(by: ColumnSelector, nsmall: usize, nlarge: usize) -> Self {
        Self {
            by,
            nsmall,
            nlarge,
            ..Self::default()
        }
    }

    pub fn with_calendar_dates(mut self, as_calendar_date: bool) -> Self {
        self.as_calendar_date = as_calendar_date;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }
}

// ============================================================================
// Presentation
// ============================================================================

/// Figure settings, fixed for the lifetime of a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image format and file extension: svg, png, jpg or jpeg (default: svg).
    pub format: String,
    /// Pixel density in dots per inch (default: 1200).
    pub dpi: u32,
    /// Figure width and height in inches (default: 16 x 12).
    pub figure_size: (f64, f64),
    /// Font size in points (default: 13).
    pub font_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: "svg".to_string(),
            dpi: 1200,
            figure_size: (16.0, 12.0),
            font_size: 13.0,
        }
    }
}

impl RenderConfig {
    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (f64, f64) {
        let dpi = f64::from(self.dpi);
        (self.figure_size.0 * dpi, self.figure_size.1 * dpi)
    }
}

// ============================================================================
// Configuration File
// ============================================================================

/// Everything a command-line run needs, as read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub outlier: OutlierConfig,
    pub extraction: ExtractionConfig,
    pub render: RenderConfig,
}

impl RunConfig {
    /// Parse a JSON document; missing sections and fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| OutlierError::invalid_parameter("config", e.to_string()))
    }
}
