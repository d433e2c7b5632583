//! Resolves reset tokens (`2024-W07`, `2024-03`, `2024`) into date ranges.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::time_window::{add_months, midnight, DateRange};
use shared::ResetPeriod;

/// The half-open range a reset of `period` described by `token` covers
pub fn resolve_range(period: ResetPeriod, token: &str) -> DomainResult<DateRange> {
    let token = token.trim();
    let start = match period {
        ResetPeriod::Week => return week_range(token),
        ResetPeriod::Month => {
            let (year, month) = token
                .split_once('-')
                .ok_or_else(|| invalid(period, token))?;
            let year = parse_year(year).ok_or_else(|| invalid(period, token))?;
            let month: u32 = parse_digits(month, 2).ok_or_else(|| invalid(period, token))?;
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid(period, token))?
        }
        ResetPeriod::Year => {
            let year = parse_year(token).ok_or_else(|| invalid(period, token))?;
            NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| invalid(period, token))?
        }
    };

    let end = match period {
        ResetPeriod::Year => add_months(start, 12),
        _ => add_months(start, 1),
    };

    Ok(DateRange {
        start: midnight(start),
        end: midnight(end),
    })
}

/// `YYYY-Www`: weeks are counted from the weekday of January 1st, with
/// Sunday as day 0
fn week_range(token: &str) -> DomainResult<DateRange> {
    let (year, week) = token
        .split_once("-W")
        .or_else(|| token.split_once("-w"))
        .ok_or_else(|| invalid(ResetPeriod::Week, token))?;
    let year = parse_year(year).ok_or_else(|| invalid(ResetPeriod::Week, token))?;
    let week = parse_digits::<i64>(week, 2)
        .filter(|w| (1..=53).contains(w))
        .ok_or_else(|| invalid(ResetPeriod::Week, token))?;

    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| invalid(ResetPeriod::Week, token))?;
    let first_weekday = jan_first.weekday().num_days_from_sunday() as i64;
    let start = jan_first + Duration::days((week - 1) * 7 - first_weekday + 1);

    Ok(DateRange {
        start: midnight(start),
        end: midnight(start + Duration::days(7)),
    })
}

fn parse_year(raw: &str) -> Option<i32> {
    parse_digits(raw, 4)
}

/// Parses an unsigned number written with exactly `width` digits
fn parse_digits<T: std::str::FromStr>(raw: &str, width: usize) -> Option<T> {
    if raw.len() != width || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn invalid(period: ResetPeriod, token: &str) -> DomainError {
    let expected = match period {
        ResetPeriod::Week => "YYYY-Www",
        ResetPeriod::Month => "YYYY-MM",
        ResetPeriod::Year => "YYYY",
    };
    DomainError::validation(format!(
        "Invalid {} token '{}', expected {}",
        period, token, expected
    ))
}
