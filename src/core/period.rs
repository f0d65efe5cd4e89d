//! Period resolution - Turning "this week" or a closing period into a date interval.
//!
//! Reporting happens over two kinds of buckets. The dashboard uses the current
//! calendar week (Monday to Sunday). Period reports use user-defined closing
//! periods: named, inclusive date ranges that may overlap and are only ever
//! soft-deleted. A closing period that is missing or inactive resolves to
//! `None` ("no data") rather than an error.

use crate::{
    entities::{ClosingPeriod, WeighingSession, closing_period, weighing_session},
    errors::{Error, Result},
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInterval {
    /// First day, inclusive
    pub start: NaiveDate,
    /// Last day, inclusive
    pub end: NaiveDate,
}

impl DateInterval {
    /// Creates an interval from its first and last day.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` lies within the interval (both ends inclusive).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// What the caller wants a report for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelector {
    /// The Monday–Sunday week containing "today"
    CurrentWeek,
    /// A closing period by id
    ClosingPeriod(i64),
}

/// A period resolved to concrete dates, with a label for headers and file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeriod {
    /// Display label ("Desember 2025", "Week 2")
    pub label: String,
    /// Dates covered
    pub interval: DateInterval,
    /// The closing period behind this interval, if any
    pub closing_period: Option<closing_period::Model>,
}

/// A closing period together with the number of sessions inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailablePeriod {
    /// The period
    pub period: closing_period::Model,
    /// Sessions whose transaction date falls in the period
    pub session_count: u64,
}

/// The Monday–Sunday week containing `today`.
///
/// Monday is `today` minus its Monday-based weekday index, so a Sunday reaches
/// back six days.
#[must_use]
pub fn current_week(today: NaiveDate) -> DateInterval {
    let days_from_monday = i64::from(today.weekday().num_days_from_monday());
    let monday = today - Duration::days(days_from_monday);
    DateInterval::new(monday, monday + Duration::days(6))
}

/// Week-of-month number used for dashboard and history labels.
///
/// Week 1 starts at the first Monday on or after the 1st; days before that
/// Monday also count as week 1. Later weeks start every 7 days from the anchor.
#[must_use]
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first_of_month = date.with_day(1).unwrap_or(date);
    let anchor = first_monday_on_or_after(first_of_month);
    if date < anchor {
        return 1;
    }
    let days_since_anchor = (date - anchor).num_days();
    u32::try_from(days_since_anchor / 7).unwrap_or(0) + 1
}

fn first_monday_on_or_after(first_of_month: NaiveDate) -> NaiveDate {
    let offset = (7 - first_of_month.weekday().num_days_from_monday()) % 7;
    let monday = first_of_month + Duration::days(i64::from(offset));
    if monday.month() == first_of_month.month() {
        monday
    } else {
        first_of_month
    }
}

/// Label for the dashboard week, e.g. "Week 3".
#[must_use]
pub fn week_label(week_number: u32) -> String {
    format!("Week {week_number}")
}

/// Resolves a selector to concrete dates.
///
/// Returns `Ok(None)` when a closing period does not exist or has been deactivated.
pub async fn resolve_period(
    db: &DatabaseConnection,
    selector: PeriodSelector,
    today: NaiveDate,
) -> Result<Option<ResolvedPeriod>> {
    match selector {
        PeriodSelector::CurrentWeek => Ok(Some(ResolvedPeriod {
            label: week_label(week_of_month(today)),
            interval: current_week(today),
            closing_period: None,
        })),
        PeriodSelector::ClosingPeriod(period_id) => {
            let period = get_closing_period_by_id(db, period_id).await?;
            Ok(period.filter(|p| p.is_active).map(|p| ResolvedPeriod {
                label: p.period_name.clone(),
                interval: DateInterval::new(p.start_date, p.end_date),
                closing_period: Some(p),
            }))
        }
    }
}

fn validate_period(name: &str, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Period name cannot be empty"));
    }
    if start > end {
        return Err(Error::validation(format!(
            "Period start {start} is after its end {end}"
        )));
    }
    Ok(())
}

/// Creates a new active closing period.
pub async fn create_closing_period(
    db: &DatabaseConnection,
    period_name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<closing_period::Model> {
    validate_period(period_name, start_date, end_date)?;

    let now = Utc::now().naive_utc();
    let period = closing_period::ActiveModel {
        period_name: Set(period_name.trim().to_string()),
        start_date: Set(start_date),
        end_date: Set(end_date),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = period.insert(db).await?;
    tracing::info!(
        "Created closing period '{}' ({} to {})",
        result.period_name,
        result.start_date,
        result.end_date
    );
    Ok(result)
}

/// Lists closing periods, most recent start date first.
pub async fn get_closing_periods(
    db: &DatabaseConnection,
    include_inactive: bool,
) -> Result<Vec<closing_period::Model>> {
    let mut query = ClosingPeriod::find();
    if !include_inactive {
        query = query.filter(closing_period::Column::IsActive.eq(true));
    }
    query
        .order_by_desc(closing_period::Column::StartDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a closing period by id regardless of its active flag.
pub async fn get_closing_period_by_id(
    db: &DatabaseConnection,
    period_id: i64,
) -> Result<Option<closing_period::Model>> {
    ClosingPeriod::find_by_id(period_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Renames or re-dates a closing period.
pub async fn update_closing_period(
    db: &DatabaseConnection,
    period_id: i64,
    period_name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<closing_period::Model> {
    validate_period(period_name, start_date, end_date)?;

    let period = get_closing_period_by_id(db, period_id)
        .await?
        .ok_or(Error::PeriodNotFound { id: period_id })?;

    let mut active_model: closing_period::ActiveModel = period.into();
    active_model.period_name = Set(period_name.trim().to_string());
    active_model.start_date = Set(start_date);
    active_model.end_date = Set(end_date);
    active_model.updated_at = Set(Utc::now().naive_utc());

    active_model.update(db).await.map_err(Into::into)
}

/// Soft-deletes a closing period. The row stays; it just stops resolving.
pub async fn deactivate_closing_period(
    db: &DatabaseConnection,
    period_id: i64,
) -> Result<closing_period::Model> {
    let period = get_closing_period_by_id(db, period_id)
        .await?
        .ok_or(Error::PeriodNotFound { id: period_id })?;

    let mut active_model: closing_period::ActiveModel = period.into();
    active_model.is_active = Set(false);
    active_model.updated_at = Set(Utc::now().naive_utc());

    let updated = active_model.update(db).await?;
    tracing::info!("Deactivated closing period '{}'", updated.period_name);
    Ok(updated)
}

/// Counts sessions whose transaction date lies in `interval`.
pub async fn count_sessions_in(db: &DatabaseConnection, interval: DateInterval) -> Result<u64> {
    WeighingSession::find()
        .filter(weighing_session::Column::TransactionDate.between(interval.start, interval.end))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Active closing periods with their session counts, most recent first.
pub async fn get_available_periods(db: &DatabaseConnection) -> Result<Vec<AvailablePeriod>> {
    let periods = get_closing_periods(db, false).await?;
    let mut available = Vec::with_capacity(periods.len());
    for period in periods {
        let session_count =
            count_sessions_in(db, DateInterval::new(period.start_date, period.end_date)).await?;
        available.push(AvailablePeriod {
            period,
            session_count,
        });
    }
    Ok(available)
}
