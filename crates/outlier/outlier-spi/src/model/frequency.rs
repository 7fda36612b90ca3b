//! Frequency units for equally spaced time series.

use crate::error::{OutlierError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Spacing between consecutive time points of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    Day,
    Week,
    Month,
    Year,
}

impl FrequencyUnit {
    /// Label prefix used for `{unit}_{n}` column names.
    pub fn name(&self) -> &'static str {
        match self {
            FrequencyUnit::Day => "day",
            FrequencyUnit::Week => "week",
            FrequencyUnit::Month => "month",
            FrequencyUnit::Year => "year",
        }
    }

    /// Single-letter frequency code (`D`, `W`, `M`, `Y`).
    pub fn code(&self) -> &'static str {
        match self {
            FrequencyUnit::Day => "D",
            FrequencyUnit::Week => "W",
            FrequencyUnit::Month => "M",
            FrequencyUnit::Year => "Y",
        }
    }

    /// Number of time points in one seasonal cycle.
    ///
    /// Yearly data has a period of 1, which cannot be decomposed without an
    /// explicit period override.
    pub fn default_period(&self) -> usize {
        match self {
            FrequencyUnit::Day => 7,
            FrequencyUnit::Week => 52,
            FrequencyUnit::Month => 12,
            FrequencyUnit::Year => 1,
        }
    }
}

impl FromStr for FrequencyUnit {
    type Err = OutlierError;

    /// Accepts either the frequency code or the unit name, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" => Ok(FrequencyUnit::Day),
            "w" | "week" => Ok(FrequencyUnit::Week),
            "m" | "month" => Ok(FrequencyUnit::Month),
            "y" | "year" => Ok(FrequencyUnit::Year),
            _ => Err(OutlierError::UnknownFrequency(s.to_string())),
        }
    }
}

impl std::fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
