//! Budget period bounds
//!
//! A period starts on a configurable day of the month and runs for one
//! month. The window is half-open: `[start, end)`. Start days past the end
//! of a short month clamp to that month's last day (a period starting on
//! the 31st begins on Feb 28/29 in February).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(Error::InvalidData(format!(
                "Period end {} must be after start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Period beginning in `month_key` ("YYYY-MM") on `start_day`
    pub fn from_month_key(month_key: &str, start_day: u32) -> Result<Self> {
        let (year, month) = parse_month_key(month_key)?;
        Self::starting_in(year, month, start_day)
    }

    /// Period whose window contains `date`
    pub fn containing(date: NaiveDate, start_day: u32) -> Result<Self> {
        validate_start_day(start_day)?;
        let anchor = anchor_date(date.year(), date.month(), start_day)?;
        if date >= anchor {
            Self::starting_in(date.year(), date.month(), start_day)
        } else {
            let (year, month) = previous_month(date.year(), date.month());
            Self::starting_in(year, month, start_day)
        }
    }

    fn starting_in(year: i32, month: u32, start_day: u32) -> Result<Self> {
        validate_start_day(start_day)?;
        let start = anchor_date(year, month, start_day)?;
        let (next_year, next_month) = next_month(year, month);
        let end = anchor_date(next_year, next_month, start_day)?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Number of days in the window
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Last calendar day inside the window
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.start)
    }

    /// Whole days between the period start and `now`, clamped to the window
    pub fn days_elapsed(&self, now: NaiveDate) -> i64 {
        (now - self.start).num_days().clamp(0, self.days())
    }

    /// Whole days from `now` until the period end, clamped to the window
    pub fn days_remaining(&self, now: NaiveDate) -> i64 {
        (self.end - now).num_days().clamp(0, self.days())
    }

    /// Month key of the month the period starts in
    pub fn month_key(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }

    /// The period immediately after this one
    pub fn next(&self) -> Result<Self> {
        Self::containing(self.end, self.start_day_hint())
    }

    /// The period immediately before this one
    pub fn previous(&self) -> Result<Self> {
        let last_day = self
            .start
            .pred_opt()
            .ok_or_else(|| Error::InvalidData("Period start underflow".into()))?;
        Self::containing(last_day, self.start_day_hint())
    }

    // Start days clamped in short months lose their original value; the
    // larger of the two anchors recovers it for the common cases.
    fn start_day_hint(&self) -> u32 {
        self.start.day().max(self.end.day())
    }
}

fn validate_start_day(start_day: u32) -> Result<()> {
    if (1..=31).contains(&start_day) {
        Ok(())
    } else {
        Err(Error::InvalidData(format!(
            "Period start day must be 1-31, got {}",
            start_day
        )))
    }
}

/// Parse "YYYY-MM" into (year, month)
pub fn parse_month_key(month_key: &str) -> Result<(i32, u32)> {
    let invalid = || Error::InvalidData(format!("Invalid month key: {}", month_key));
    let (year, month) = month_key.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// Last day number of the given month
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .ok_or_else(|| Error::InvalidData(format!("Date out of range: {}-{}", year, month)))
}

fn anchor_date(year: i32, month: u32, start_day: u32) -> Result<NaiveDate> {
    let day = start_day.min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::InvalidData(format!("Date out of range: {}-{}-{}", year, month, day)))
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}
