//! History grouping - Year → month → week tree of dated records.
//!
//! Pure functions only; any expand/collapse state belongs to the caller.

use crate::core::{period, report, session::SessionSummary};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Records of one week, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGroup<T> {
    /// Week-of-month number
    pub week: u32,
    /// Display label, e.g. "Week 2"
    pub label: String,
    /// Records ordered by date descending
    pub records: Vec<T>,
}

/// Weeks of one month, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup<T> {
    /// Month number, 1–12
    pub month: u32,
    /// Display label, e.g. "Desember 2025"
    pub label: String,
    /// Weeks ordered descending
    pub weeks: Vec<WeekGroup<T>>,
}

/// Months of one year, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup<T> {
    /// Calendar year
    pub year: i32,
    /// Months ordered descending
    pub months: Vec<MonthGroup<T>>,
}

/// The whole grouped history, newest year first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTree<T> {
    /// Years ordered descending
    pub years: Vec<YearGroup<T>>,
}

impl<T> HistoryTree<T> {
    /// Number of records placed in the tree.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.years
            .iter()
            .flat_map(|year| &year.months)
            .flat_map(|month| &month.weeks)
            .map(|week| week.records.len())
            .sum()
    }

    /// True when nothing could be grouped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

type WeekBuckets<T> = BTreeMap<u32, Vec<(NaiveDate, T)>>;

/// Groups `records` by the date `date_of` extracts.
///
/// Records without a date are left out. Records sharing a date keep their input order.
pub fn group_by_date<T, F>(records: impl IntoIterator<Item = T>, date_of: F) -> HistoryTree<T>
where
    F: Fn(&T) -> Option<NaiveDate>,
{
    let mut buckets: BTreeMap<i32, BTreeMap<u32, WeekBuckets<T>>> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(date) = date_of(&record) else {
            skipped += 1;
            continue;
        };
        buckets
            .entry(date.year())
            .or_default()
            .entry(date.month())
            .or_default()
            .entry(period::week_of_month(date))
            .or_default()
            .push((date, record));
    }

    if skipped > 0 {
        tracing::debug!("Left {} undated records out of the history", skipped);
    }

    let years = buckets
        .into_iter()
        .rev()
        .map(|(year, months)| YearGroup {
            year,
            months: months
                .into_iter()
                .rev()
                .map(|(month, weeks)| MonthGroup {
                    month,
                    label: report::month_label(year, month),
                    weeks: weeks
                        .into_iter()
                        .rev()
                        .map(|(week, mut dated)| {
                            dated.sort_by(|a, b| b.0.cmp(&a.0));
                            WeekGroup {
                                week,
                                label: period::week_label(week),
                                records: dated.into_iter().map(|(_, record)| record).collect(),
                            }
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    HistoryTree { years }
}

/// Groups weighing sessions by transaction date.
#[must_use]
pub fn group_session_history(sessions: Vec<SessionSummary>) -> HistoryTree<SessionSummary> {
    group_by_date(sessions, |summary| Some(summary.session.transaction_date))
}
