//! Start-date parsing.

use chrono::NaiveDate;
use outlier_spi::{OutlierError, Result};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m-%d-%Y", "%m/%d/%Y"];

/// Parse a calendar date written as ISO `YYYY-MM-DD` or month-first
/// `M-D-YYYY` / `M/D/YYYY`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| OutlierError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        assert_eq!(
            parse_date("2003-01-04").unwrap(),
            NaiveDate::from_ymd_opt(2003, 1, 4).unwrap()
        );
    }

    #[test]
    fn test_month_first_dates() {
        let expected = NaiveDate::from_ymd_opt(2003, 1, 4).unwrap();
        assert_eq!(parse_date("1-4-2003").unwrap(), expected);
        assert_eq!(parse_date("01/04/2003").unwrap(), expected);
    }

    #[test]
    fn test_invalid_date() {
        assert_eq!(
            parse_date("yesterday").unwrap_err(),
            OutlierError::InvalidDate("yesterday".to_string())
        );
    }
}
