//! Expense report aggregation.
//!
//! Everything here is pure and works on amounts already converted to the
//! display currency. Bucket membership compares local calendar dates, never
//! raw timestamps.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::currency::round_currency;
use crate::domain::time_window::{
    first_of_month, same_day, same_month, same_week, sub_months, trailing_days,
    trailing_month_starts, trailing_week_starts,
};
use shared::{CategoryBreakdown, CurrencyCode, ExpenseCategory, ExpenseReport, ReportBucket, ReportPeriod};

pub const DAILY_BUCKETS: usize = 30;
pub const WEEKLY_BUCKETS: usize = 12;
pub const MONTHLY_BUCKETS: usize = 12;

/// An expense reduced to what the aggregators need
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportEntry {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: ExpenseCategory,
}

/// Totals per category, largest first
pub fn group_by_category(entries: &[ReportEntry]) -> Vec<CategoryBreakdown> {
    let mut totals: HashMap<ExpenseCategory, (f64, usize)> = HashMap::new();
    for entry in entries {
        let slot = totals.entry(entry.category).or_insert((0.0, 0));
        slot.0 += entry.amount;
        slot.1 += 1;
    }

    let grand_total: f64 = totals.values().map(|(total, _)| total).sum();

    let mut breakdown: Vec<CategoryBreakdown> = totals
        .into_iter()
        .map(|(category, (total, count))| CategoryBreakdown {
            category,
            total: round_currency(total),
            count,
            percentage: if grand_total > 0.0 {
                round_currency(total / grand_total * 100.0)
            } else {
                0.0
            },
        })
        .collect();

    // Ties fall back to the category order so output is stable
    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| category_index(a.category).cmp(&category_index(b.category)))
    });
    breakdown
}

fn category_index(category: ExpenseCategory) -> usize {
    ExpenseCategory::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or(usize::MAX)
}

fn bucketize<F>(starts: Vec<NaiveDate>, entries: &[ReportEntry], label: fn(NaiveDate) -> String, member: F) -> Vec<ReportBucket>
where
    F: Fn(NaiveDate, NaiveDate) -> bool,
{
    starts
        .into_iter()
        .map(|start| {
            let (total, count) = entries
                .iter()
                .filter(|entry| member(entry.date, start))
                .fold((0.0, 0), |(total, count), entry| (total + entry.amount, count + 1));
            ReportBucket {
                label: label(start),
                start_date: start,
                total: round_currency(total),
                count,
            }
        })
        .collect()
}

/// One bucket per day for the last 30 days, oldest first
pub fn group_by_day(entries: &[ReportEntry], today: NaiveDate) -> Vec<ReportBucket> {
    bucketize(
        trailing_days(today, DAILY_BUCKETS),
        entries,
        |day| day.format("%b %-d").to_string(),
        same_day,
    )
}

/// One bucket per Monday-start week for the last 12 weeks
pub fn group_by_week(entries: &[ReportEntry], today: NaiveDate) -> Vec<ReportBucket> {
    bucketize(
        trailing_week_starts(today, WEEKLY_BUCKETS),
        entries,
        |monday| format!("Week of {}", monday.format("%b %-d")),
        same_week,
    )
}

/// One bucket per calendar month for the last 12 months
pub fn group_by_month(entries: &[ReportEntry], today: NaiveDate) -> Vec<ReportBucket> {
    bucketize(
        trailing_month_starts(today, MONTHLY_BUCKETS),
        entries,
        |first| first.format("%b %Y").to_string(),
        same_month,
    )
}

/// Percentage change between the last `window` buckets and the `window`
/// before them. 0 when the earlier window sums to 0.
pub fn trend_percentage(buckets: &[ReportBucket], window: usize) -> f64 {
    if window == 0 || buckets.is_empty() {
        return 0.0;
    }
    let split = buckets.len().saturating_sub(window);
    let recent: f64 = buckets[split..].iter().map(|b| b.total).sum();
    let prior_start = split.saturating_sub(window);
    let prior: f64 = buckets[prior_start..split].iter().map(|b| b.total).sum();

    if prior == 0.0 {
        return 0.0;
    }
    round_currency((recent - prior) / prior * 100.0)
}

/// Assembles the report for `period`.
///
/// Daily, weekly and monthly reports cover their trailing window and break
/// that window down by category. The category report covers the current
/// calendar month, with the previous month alongside for the trend.
pub fn build_report(
    period: ReportPeriod,
    entries: &[ReportEntry],
    today: NaiveDate,
    currency_code: CurrencyCode,
) -> ExpenseReport {
    let (buckets, trend_window) = match period {
        ReportPeriod::Daily => (group_by_day(entries, today), 7),
        ReportPeriod::Weekly => (group_by_week(entries, today), 4),
        ReportPeriod::Monthly => (group_by_month(entries, today), 3),
        ReportPeriod::Category => {
            let months = trailing_month_starts(today, 2);
            let buckets = bucketize(months, entries, |first| first.format("%b %Y").to_string(), same_month);
            (buckets, 1)
        }
    };

    let window_start = match period {
        ReportPeriod::Category => buckets.last().map(|b| b.start_date),
        _ => buckets.first().map(|b| b.start_date),
    }
    .unwrap_or(today);

    let in_window: Vec<ReportEntry> = entries
        .iter()
        .filter(|e| e.date >= window_start && e.date <= today)
        .copied()
        .collect();

    let total = match period {
        ReportPeriod::Category => buckets.last().map(|b| b.total).unwrap_or(0.0),
        _ => round_currency(buckets.iter().map(|b| b.total).sum()),
    };

    ExpenseReport {
        period,
        currency_code,
        total,
        trend_percentage: trend_percentage(&buckets, trend_window),
        categories: group_by_category(&in_window),
        buckets,
    }
}

/// Earliest date any report for `period` can reach, used to bound the query
pub fn report_window_start(period: ReportPeriod, today: NaiveDate) -> NaiveDate {
    match period {
        ReportPeriod::Daily => trailing_days(today, DAILY_BUCKETS)[0],
        ReportPeriod::Weekly => trailing_week_starts(today, WEEKLY_BUCKETS)[0],
        ReportPeriod::Monthly => trailing_month_starts(today, MONTHLY_BUCKETS)[0],
        ReportPeriod::Category => sub_months(first_of_month(today), 1),
    }
}
