//! Error types for outlier extraction.
//!
//! This module contains the error taxonomy and the Result alias.

mod outlier_error;

pub use outlier_error::{OutlierError, Result};
