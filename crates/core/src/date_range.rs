//! UTC day-boundary helpers and date-range resolution.
//!
//! Every instant produced here is UTC. Calendar days run from
//! `00:00:00.000` to `23:59:59.999` inclusive; callers never apply a local
//! offset.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::Timestamp;

static DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"));

/// Milliseconds from the start of a UTC day to its last representable instant.
pub const DAY_SPAN_MILLIS: i64 = 86_399_999;

/// Earliest year accepted by calendar filters and status ranges.
pub const MIN_YEAR: i32 = 1970;

/// Longest span, in days, a status range may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

/// An inclusive `[start, end]` pair of UTC instants covering whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DayRange {
    /// The range covering exactly one calendar day.
    pub fn for_day(day: NaiveDate) -> Self {
        let start = start_of_day(day);
        Self {
            start,
            end: end_of(start),
        }
    }

    /// The range covering `first..=last` calendar days.
    pub fn between(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: start_of_day(first),
            end: end_of(start_of_day(last)),
        }
    }

    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The day covered when the range is exactly one calendar day.
    pub fn single_day(&self) -> Option<NaiveDate> {
        let day = self.start.date_naive();
        (day == self.end.date_naive()).then_some(day)
    }

    /// Every calendar day touched by the range, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        let last = self.end.date_naive();
        self.start
            .date_naive()
            .iter_days()
            .take_while(|day| *day <= last)
            .collect()
    }
}

fn start_of_day(day: NaiveDate) -> Timestamp {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn end_of(start: Timestamp) -> Timestamp {
    start + chrono::Duration::milliseconds(DAY_SPAN_MILLIS)
}

/// Midnight (UTC) of the day containing `instant`.
pub fn to_start_of_day_utc(instant: Timestamp) -> Timestamp {
    start_of_day(instant.date_naive())
}

/// `23:59:59.999` (UTC) of the day containing `instant`.
pub fn to_end_of_day_utc(instant: Timestamp) -> Timestamp {
    end_of(to_start_of_day_utc(instant))
}

/// Resolve a year/month/day triple into its UTC day.
///
/// Validation is deliberately loose: the day only has to fall in 1-31, and a
/// day past the end of the month rolls into the following month
/// (`2024-02-31` resolves to `2024-03-02`).
pub fn day_range_utc(year: i32, month: u32, day: u32) -> Result<DayRange, CoreError> {
    validate_year(year)?;
    validate_month(month)?;
    if !(1..=31).contains(&day) {
        return Err(CoreError::InvalidArgument(format!(
            "Invalid day {day}, expected 1-31"
        )));
    }
    let first = first_of_month(year, month)?;
    let resolved = first
        .checked_add_days(Days::new(u64::from(day - 1)))
        .ok_or_else(|| CoreError::InvalidArgument(format!("Invalid date {year}-{month}-{day}")))?;
    Ok(DayRange::for_day(resolved))
}

fn validate_year(year: i32) -> Result<(), CoreError> {
    if year < MIN_YEAR {
        return Err(CoreError::InvalidArgument(format!(
            "Invalid year {year}, expected {MIN_YEAR} or later"
        )));
    }
    Ok(())
}

fn validate_month(month: u32) -> Result<(), CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::InvalidArgument(format!(
            "Invalid month {month}, expected 1-12"
        )));
    }
    Ok(())
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::InvalidArgument(format!("Invalid date {year}-{month}")))
}

/// Parse a strict `YYYY-MM-DD` string into a calendar day.
pub fn parse_day_string(value: &str) -> Result<NaiveDate, CoreError> {
    let invalid = || {
        CoreError::InvalidFormat(format!(
            "Invalid date '{value}', expected YYYY-MM-DD"
        ))
    };
    if !DAY_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// Parse either `YYYY-MM-DD` or an RFC 3339 timestamp into its UTC day.
pub fn parse_calendar_day(value: &str) -> Result<NaiveDate, CoreError> {
    if DAY_RE.is_match(value) {
        return parse_day_string(value);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| {
            CoreError::InvalidFormat(format!(
                "Invalid date '{value}', expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        })
}

/// Resolve optional `YYYY-MM-DD` bounds into a whole-day UTC range.
///
/// | start | end | result                                        |
/// |-------|-----|-----------------------------------------------|
/// | yes   | yes | start day .. end day                          |
/// | yes   | no  | start day .. today                            |
/// | no    | yes | one calendar month before end .. end day      |
/// | no    | no  | first of the current month .. today           |
///
/// Both bounds must fall in [`MIN_YEAR`] or later, and the range may cover
/// at most [`MAX_RANGE_DAYS`] days.
pub fn flexible_range(
    start: Option<&str>,
    end: Option<&str>,
    now: Timestamp,
) -> Result<DayRange, CoreError> {
    let today = now.date_naive();
    let (first, last) = match (start, end) {
        (Some(start), Some(end)) => (parse_day_string(start)?, parse_day_string(end)?),
        (Some(start), None) => (parse_day_string(start)?, today),
        (None, Some(end)) => {
            let last = parse_day_string(end)?;
            let first = last.checked_sub_months(Months::new(1)).ok_or_else(|| {
                CoreError::InvalidArgument(format!("Cannot go one month before {end}"))
            })?;
            (first, last)
        }
        (None, None) => (today.with_day(1).unwrap_or(today), today),
    };

    validate_year(first.year())?;
    validate_year(last.year())?;
    if first > last {
        return Err(CoreError::InvalidArgument(format!(
            "Start date {first} is after end date {last}"
        )));
    }
    let span = (last - first).num_days() + 1;
    if span > MAX_RANGE_DAYS {
        return Err(CoreError::InvalidArgument(format!(
            "Range {first}..{last} covers {span} days, at most {MAX_RANGE_DAYS} allowed"
        )));
    }
    Ok(DayRange::between(first, last))
}

/// Calendar filter used by list endpoints (`?year=&month=&day=`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DateRangeFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DateRangeFilter {
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            year: Some(day.year()),
            month: Some(day.month()),
            day: Some(day.day()),
        }
    }

    /// Resolve into a UTC range, or `None` when no year is given.
    ///
    /// A day without a month is ignored, matching the year-only form.
    pub fn to_range(&self) -> Result<Option<DayRange>, CoreError> {
        let Some(year) = self.year else {
            return Ok(None);
        };
        validate_year(year)?;

        let range = match (self.month, self.day) {
            (Some(month), Some(day)) => day_range_utc(year, month, day)?,
            (Some(month), None) => {
                validate_month(month)?;
                let first = first_of_month(year, month)?;
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .ok_or_else(|| {
                        CoreError::InvalidArgument(format!("Invalid month {year}-{month}"))
                    })?;
                DayRange::between(first, last)
            }
            (None, _) => {
                let first = first_of_month(year, 1)?;
                let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| {
                    CoreError::InvalidArgument(format!("Invalid year {year}"))
                })?;
                DayRange::between(first, last)
            }
        };
        Ok(Some(range))
    }
}
