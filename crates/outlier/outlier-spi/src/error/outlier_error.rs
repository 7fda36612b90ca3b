//! Outlier extraction error types.

use thiserror::Error;

/// Errors raised while decomposing series or extracting outliers.
///
/// Every variant is a data-validation failure local to the operation that
/// raised it. Batch operations stop at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutlierError {
    #[error("Invalid seasonal window {window}: must be odd and at least 7")]
    InvalidWindow { window: usize },

    #[error("Index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Unknown frequency unit: {0}")]
    UnknownFrequency(String),

    #[error("Input table has no rows")]
    EmptyInput,

    #[error("Inconsistent partition: expected {expected} rows (nsmall + nlarge), got {actual}")]
    InconsistentPartition { expected: usize, actual: usize },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid value '{value}' at row {row}, column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),
}

impl OutlierError {
    /// Shorthand for an [`OutlierError::InvalidParameter`].
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        OutlierError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for OutlierError {
    fn from(err: std::io::Error) -> Self {
        OutlierError::Io(err.to_string())
    }
}

/// Result type for outlier extraction operations.
pub type Result<T> = std::result::Result<T, OutlierError>;
