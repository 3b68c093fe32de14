//! Month-end calendar arithmetic.
//!
//! Observations are stamped at the last day of their month, the same
//! convention as a month-end ("ME") date range.

use crate::error::{LoadError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
}

/// Check whether `date` is the last day of its month.
pub fn is_month_end(date: NaiveDate) -> bool {
    month_end(date) == Some(date)
}

/// Month-end `months` calendar months after the month containing `date`.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    month_start(date)
        .checked_add_months(Months::new(months))
        .and_then(month_end)
}

/// `periods` consecutive month-ends, the first being the month-end of `start`.
///
/// A `start` that is already a month-end is kept as the first point.
pub fn month_end_range(start: NaiveDate, periods: usize) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(periods);
    for i in 0..periods {
        let offset = u32::try_from(i)
            .map_err(|_| LoadError::Timestamp(format!("period offset {} too large", i)))?;
        let date = add_months(start, offset).ok_or_else(|| {
            LoadError::Timestamp(format!("month-end {} months after {} is out of range", i, start))
        })?;
        dates.push(date);
    }
    Ok(dates)
}

/// Whole months from the month of `a` to the month of `b`.
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b.year() as i64 - a.year() as i64) * 12 + (b.month() as i64 - a.month() as i64)
}
