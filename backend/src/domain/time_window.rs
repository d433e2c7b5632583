//! Calendar arithmetic shared by reports, the recurring scheduler and resets.
//!
//! Every function takes the reference date explicitly; nothing here reads the
//! wall clock.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Half-open `[start, end)` range of local timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date)
}

/// Adds calendar months, clamping to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// The calendar month containing `date`, as a timestamp range
pub fn month_range(date: NaiveDate) -> DateRange {
    let start = first_of_month(date);
    DateRange {
        start: midnight(start),
        end: midnight(add_months(start, 1)),
    }
}

/// The single local day `date`, as a timestamp range
pub fn day_range(date: NaiveDate) -> DateRange {
    DateRange {
        start: midnight(date),
        end: midnight(date + Duration::days(1)),
    }
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The last `count` days ending at `today`, oldest first
pub fn trailing_days(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .map(|offset| today - Duration::days(offset as i64))
        .collect()
}

/// Monday-start weeks, the last one containing `today`, oldest first
pub fn trailing_week_starts(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let current = week_start(today);
    (0..count)
        .rev()
        .map(|offset| current - Duration::weeks(offset as i64))
        .collect()
}

/// First days of the last `count` months, the last one containing `today`
pub fn trailing_month_starts(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let current = first_of_month(today);
    (0..count)
        .rev()
        .map(|offset| sub_months(current, offset as u32))
        .collect()
}

pub fn same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

pub fn same_week(date: NaiveDate, week_start_date: NaiveDate) -> bool {
    same_day(week_start(date), week_start_date)
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Parses user-supplied dates: RFC 3339 (converted to local time), ISO
/// datetime without offset, or a bare `YYYY-MM-DD` (midnight).
pub fn parse_flexible_datetime(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&chrono::Local).naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(midnight)
}
