//! Labeled univariate time series.

use crate::error::{OutlierError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Measurements for one taxon, one per time point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Taxon identifier.
    pub taxon: String,
    /// Measurement values in chronological order.
    pub values: Vec<f64>,
    /// Time point of each value.
    pub index: Vec<NaiveDate>,
}

impl Series {
    /// Create a series, checking that values and time points line up and
    /// that the time points are strictly increasing and equally spaced.
    pub fn new(taxon: impl Into<String>, values: Vec<f64>, index: Vec<NaiveDate>) -> Result<Self> {
        if values.len() != index.len() {
            return Err(OutlierError::invalid_parameter(
                "index",
                format!(
                    "{} time points given for {} values",
                    index.len(),
                    values.len()
                ),
            ));
        }
        if index.windows(2).any(|w| w[0] >= w[1]) {
            return Err(OutlierError::invalid_parameter(
                "index",
                "time points must be strictly increasing",
            ));
        }
        if !is_evenly_spaced(&index) {
            return Err(OutlierError::invalid_parameter(
                "index",
                "time points must be equally spaced",
            ));
        }
        Ok(Self {
            taxon: taxon.into(),
            values,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A constant number of days between points, or a constant number of
/// months between points on the same day of the month or on month ends.
fn is_evenly_spaced(index: &[NaiveDate]) -> bool {
    let [first, second, ..] = index else {
        return true;
    };
    let days = |a: &NaiveDate, b: &NaiveDate| b.signed_duration_since(*a).num_days();
    let months = |a: &NaiveDate, b: &NaiveDate| {
        let ordinal = |d: &NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
        ordinal(b) - ordinal(a)
    };
    let day_step = days(first, second);
    if index.windows(2).all(|w| days(&w[0], &w[1]) == day_step) {
        return true;
    }
    let same_day = index.iter().all(|d| d.day() == first.day());
    let month_ends = index
        .iter()
        .all(|d| d.succ_opt().map_or(true, |next| next.month() != d.month()));
    let month_step = months(first, second);
    (same_day || month_ends) && index.windows(2).all(|w| months(&w[0], &w[1]) == month_step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2003, 1, d).unwrap())
            .collect()
    }

    #[test]
    fn test_new_series() {
        let series = Series::new("Bacteroides", vec![1.0, 2.0, 3.0], dates(3)).unwrap();
        assert_eq!(series.taxon, "Bacteroides");
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let err = Series::new("x", vec![1.0, 2.0], dates(3)).unwrap_err();
        assert!(matches!(err, OutlierError::InvalidParameter { ref name, .. } if name == "index"));
    }

    #[test]
    fn test_non_increasing_index() {
        let mut index = dates(3);
        index.swap(1, 2);
        assert!(Series::new("x", vec![1.0, 2.0, 3.0], index).is_err());
    }

    #[test]
    fn test_irregular_index_rejected() {
        let mut index = dates(4);
        index[3] = NaiveDate::from_ymd_opt(2003, 1, 9).unwrap();
        let err = Series::new("x", vec![1.0; 4], index).unwrap_err();
        assert_eq!(
            err,
            OutlierError::invalid_parameter("index", "time points must be equally spaced")
        );
    }

    #[test]
    fn test_calendar_steps_accepted() {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let month_ends = vec![
            ymd(2003, 1, 31),
            ymd(2003, 2, 28),
            ymd(2003, 3, 31),
            ymd(2003, 4, 30),
        ];
        assert!(Series::new("x", vec![1.0; 4], month_ends).is_ok());
        let year_ends = vec![ymd(2003, 12, 31), ymd(2004, 12, 31), ymd(2005, 12, 31)];
        assert!(Series::new("x", vec![1.0; 3], year_ends).is_ok());
        let mid_month = vec![ymd(2003, 1, 15), ymd(2003, 2, 15), ymd(2003, 3, 15)];
        assert!(Series::new("x", vec![1.0; 3], mid_month).is_ok());
        let mixed = vec![ymd(2003, 1, 31), ymd(2003, 2, 15), ymd(2003, 3, 31)];
        assert!(Series::new("x", vec![1.0; 3], mixed).is_err());
    }
}
