//! Column labels for residual tables.

use chrono::NaiveDate;
use outlier_spi::{FrequencyUnit, RangeSpec, Result, TAXON_COLUMN};

use crate::range;

/// Column names for the points `spec` selects from `index`.
///
/// Calendar labels are the selected dates (`YYYY-MM-DD`). Otherwise labels are
/// `{unit}_{i}` for `i` in `len - selected .. len`, counted from the start
/// of the full series, so the same label names the same point across
/// extractions with different windows. The first label is always `taxon`.
pub fn column_labels(
    index: &[NaiveDate],
    spec: RangeSpec,
    unit: FrequencyUnit,
    as_calendar_date: bool,
) -> Result<Vec<String>> {
    let selected = range::select(index, spec)?;
    let len = index.len();

    let mut labels = Vec::with_capacity(selected.len() + 1);
    labels.push(TAXON_COLUMN.to_string());
    if as_calendar_date {
        labels.extend(selected.iter().map(|d| d.format("%Y-%m-%d").to_string()));
    } else {
        labels.extend((len - selected.len()..len).map(|i| format!("{}_{}", unit.name(), i)));
    }
    Ok(labels)
}

/// Same as [`column_labels`] but taking the unit as a frequency code or name.
pub fn column_labels_for(
    index: &[NaiveDate],
    spec: RangeSpec,
    unit: &str,
    as_calendar_date: bool,
) -> Result<Vec<String>> {
    let unit: FrequencyUnit = unit.parse()?;
    column_labels(index, spec, unit, as_calendar_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::date_index;
    use outlier_spi::OutlierError;
    use std::collections::HashSet;

    fn index(n: usize) -> Vec<NaiveDate> {
        date_index(NaiveDate::from_ymd_opt(2003, 1, 4).unwrap(), n, FrequencyUnit::Day).unwrap()
    }

    #[test]
    fn test_enumerated_labels() {
        let labels =
            column_labels(&index(10), RangeSpec::last(3), FrequencyUnit::Day, false).unwrap();
        assert_eq!(labels, vec!["taxon", "day_7", "day_8", "day_9"]);
    }

    #[test]
    fn test_enumerated_labels_use_unit_name() {
        let labels =
            column_labels(&index(5), RangeSpec::single(-1), FrequencyUnit::Week, false).unwrap();
        assert_eq!(labels, vec!["taxon", "week_4"]);
    }

    #[test]
    fn test_calendar_labels() {
        let labels =
            column_labels(&index(10), RangeSpec::last(2), FrequencyUnit::Day, true).unwrap();
        assert_eq!(labels, vec!["taxon", "2003-01-12", "2003-01-13"]);
    }

    #[test]
    fn test_labels_unique_and_counted() {
        let idx = index(30);
        for spec in [RangeSpec::last(12), RangeSpec::single(4), RangeSpec::through_end(0)] {
            let selected = range::select(&idx, spec).unwrap().len();
            for as_date in [false, true] {
                let labels = column_labels(&idx, spec, FrequencyUnit::Day, as_date).unwrap();
                assert_eq!(labels.len(), selected + 1);
                let unique: HashSet<&String> = labels.iter().collect();
                assert_eq!(unique.len(), labels.len());
            }
        }
    }

    #[test]
    fn test_unknown_unit_code() {
        let err = column_labels_for(&index(5), RangeSpec::single(-1), "Q", false).unwrap_err();
        assert_eq!(err, OutlierError::UnknownFrequency("Q".to_string()));
        let labels = column_labels_for(&index(5), RangeSpec::single(-1), "M", false).unwrap();
        assert_eq!(labels, vec!["taxon", "month_4"]);
    }

    #[test]
    fn test_out_of_range_spec() {
        assert!(column_labels(&index(5), RangeSpec::single(5), FrequencyUnit::Day, false).is_err());
    }
}
