//! Calendar index generation.

use chrono::{Datelike, Days, Months, NaiveDate};
use outlier_spi::{FrequencyUnit, OutlierError, Result};

/// `periods` equally spaced dates starting at or after `start`.
///
/// Weekly points fall on Sundays, monthly points on month ends and yearly
/// points on December 31st; `start` is rolled forward to the first such date.
pub fn date_index(start: NaiveDate, periods: usize, unit: FrequencyUnit) -> Result<Vec<NaiveDate>> {
    let overflow =
        || OutlierError::InvalidDate(format!("{} {} periods after {}", periods, unit, start));
    let first = anchor(start, unit).ok_or_else(overflow)?;

    (0..periods)
        .map(|i| step(first, i as u32, unit).ok_or_else(overflow))
        .collect()
}

fn anchor(start: NaiveDate, unit: FrequencyUnit) -> Option<NaiveDate> {
    match unit {
        FrequencyUnit::Day => Some(start),
        FrequencyUnit::Week => {
            let offset = (7 - start.weekday().num_days_from_sunday()) % 7;
            start.checked_add_days(Days::new(u64::from(offset)))
        }
        FrequencyUnit::Month => month_end(start.year(), start.month()),
        FrequencyUnit::Year => NaiveDate::from_ymd_opt(start.year(), 12, 31),
    }
}

fn step(first: NaiveDate, i: u32, unit: FrequencyUnit) -> Option<NaiveDate> {
    match unit {
        FrequencyUnit::Day => first.checked_add_days(Days::new(u64::from(i))),
        FrequencyUnit::Week => first.checked_add_days(Days::new(7 * u64::from(i))),
        FrequencyUnit::Month => {
            let shifted = first.with_day(1)?.checked_add_months(Months::new(i))?;
            month_end(shifted.year(), shifted.month())
        }
        FrequencyUnit::Year => {
            let year = first.year().checked_add(i32::try_from(i).ok()?)?;
            NaiveDate::from_ymd_opt(year, 12, 31)
        }
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}
