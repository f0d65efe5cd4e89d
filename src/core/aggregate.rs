//! Aggregation engine - Reducing sessions into period totals and breakdowns.
//!
//! [`aggregate`] is a pure function over already-loaded [`SessionSummary`] values;
//! the async loaders below only resolve the period, fetch the sessions and hand
//! them over. Weights are summed as plain `f64`; rounding happens at display time
//! in [`crate::core::report`].

use crate::{
    core::{
        period::{self, DateInterval, PeriodSelector, ResolvedPeriod},
        session::{self, SessionFilter, SessionSummary},
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use uuid::Uuid;

/// Headline totals for a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateSummary {
    /// Sessions inside the period
    pub total_sessions: usize,
    /// Items belonging to those sessions
    pub total_items: usize,
    /// Sum of item weights in kilograms
    pub total_weight: f64,
}

/// Weight and share of one category within a period.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    /// Category name, or the unknown-category label
    pub category_name: String,
    /// Summed weight in kilograms
    pub total_weight: f64,
    /// Share of the period total, 0–100
    pub percentage: f64,
    /// Number of items in this category
    pub item_count: usize,
}

/// Per-session line of a period report.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetail {
    /// Session id
    pub id: Uuid,
    /// Transaction date
    pub transaction_date: NaiveDate,
    /// PIC name
    pub pic_name: String,
    /// Owner name
    pub owner_name: String,
    /// Distinct category names in order of first appearance
    pub categories: Vec<String>,
    /// Session weight in kilograms
    pub total_weight: f64,
    /// Number of items
    pub item_count: usize,
}

/// Everything derived from the sessions of one period.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeriodAggregate {
    /// Totals; `None` when the period holds no sessions
    pub summary: Option<AggregateSummary>,
    /// Categories by weight, heaviest first
    pub categories: Vec<CategoryBreakdown>,
    /// Sessions by transaction date, newest first
    pub sessions: Vec<SessionDetail>,
}

impl PeriodAggregate {
    /// Whether the period contained no sessions at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.summary.is_none()
    }
}

/// A resolved closing period (or week) with its aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    /// The period the numbers cover
    pub period: ResolvedPeriod,
    /// The numbers
    pub aggregate: PeriodAggregate,
}

/// Current-week dashboard numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyDashboard {
    /// Monday–Sunday dates of the week
    pub interval: DateInterval,
    /// Week-of-month number for the label
    pub week_number: u32,
    /// Totals; `None` when nothing was weighed this week
    pub summary: Option<AggregateSummary>,
    /// Categories by weight, heaviest first
    pub categories: Vec<CategoryBreakdown>,
}

/// `part / total * 100`, defined as 0 when the total is 0.
#[must_use]
pub fn percentage_of(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    part / total * 100.0
}

/// Groups items of all `sessions` by category name.
///
/// Groups are sorted by weight descending; equal weights keep the order in which
/// the category was first encountered.
#[must_use]
pub fn category_breakdown(sessions: &[SessionSummary]) -> Vec<CategoryBreakdown> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategoryBreakdown> = Vec::new();

    for detail in sessions.iter().flat_map(|summary| summary.items.iter()) {
        let name = detail.category_name();
        let position = *index.entry(name).or_insert_with(|| {
            groups.push(CategoryBreakdown {
                category_name: name.to_string(),
                total_weight: 0.0,
                percentage: 0.0,
                item_count: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[position];
        group.total_weight += detail.item.weight_kg;
        group.item_count += 1;
    }

    let total_weight: f64 = groups.iter().map(|group| group.total_weight).sum();
    for group in &mut groups {
        group.percentage = percentage_of(group.total_weight, total_weight);
    }

    // sort_by is stable, which keeps first-encountered order for ties
    groups.sort_by(|a, b| b.total_weight.total_cmp(&a.total_weight));
    groups
}

/// Builds the per-session detail line.
#[must_use]
pub fn session_detail(summary: &SessionSummary) -> SessionDetail {
    let mut categories: Vec<String> = Vec::new();
    for detail in &summary.items {
        let name = detail.category_name();
        if !categories.iter().any(|existing| existing == name) {
            categories.push(name.to_string());
        }
    }

    SessionDetail {
        id: summary.session.id,
        transaction_date: summary.session.transaction_date,
        pic_name: summary.session.pic_name.clone(),
        owner_name: summary.session.owner_name.clone(),
        categories,
        total_weight: summary.total_weight,
        item_count: summary.total_items,
    }
}

/// Reduces the sessions of one period into summary, breakdown and session list.
///
/// No sessions means no data: the summary is `None` and both lists are empty.
#[must_use]
pub fn aggregate(sessions: &[SessionSummary]) -> PeriodAggregate {
    if sessions.is_empty() {
        return PeriodAggregate::default();
    }

    let summary = AggregateSummary {
        total_sessions: sessions.len(),
        total_items: sessions.iter().map(|s| s.total_items).sum(),
        total_weight: sessions.iter().map(|s| s.total_weight).sum(),
    };

    let mut details: Vec<SessionDetail> = sessions.iter().map(session_detail).collect();
    details.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));

    PeriodAggregate {
        summary: Some(summary),
        categories: category_breakdown(sessions),
        sessions: details,
    }
}

/// Aggregates every session whose transaction date lies in `interval`.
pub async fn aggregate_interval(
    db: &DatabaseConnection,
    interval: DateInterval,
) -> Result<PeriodAggregate> {
    let sessions = session::get_session_summaries(db, &SessionFilter::within(interval)).await?;
    Ok(aggregate(&sessions))
}

/// Resolves `selector` and aggregates its sessions.
///
/// Returns `Ok(None)` when the period cannot be resolved (unknown or inactive
/// closing period).
pub async fn load_period_report(
    db: &DatabaseConnection,
    selector: PeriodSelector,
    today: NaiveDate,
) -> Result<Option<PeriodReport>> {
    let Some(resolved) = period::resolve_period(db, selector, today).await? else {
        tracing::debug!("Period {:?} did not resolve, reporting no data", selector);
        return Ok(None);
    };

    let aggregate = aggregate_interval(db, resolved.interval).await?;
    Ok(Some(PeriodReport {
        period: resolved,
        aggregate,
    }))
}

/// Numbers for the dashboard: the Monday–Sunday week containing `today`.
pub async fn load_weekly_dashboard(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<WeeklyDashboard> {
    let interval = period::current_week(today);
    let aggregate = aggregate_interval(db, interval).await?;
    Ok(WeeklyDashboard {
        interval,
        week_number: period::week_of_month(today),
        summary: aggregate.summary,
        categories: aggregate.categories,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::period::create_closing_period;
    use crate::core::session::UNKNOWN_CATEGORY;
    use crate::test_utils::*;

    #[test]
    fn test_empty_input_is_no_data() {
        let result = aggregate(&[]);
        assert!(result.summary.is_none());
        assert!(result.categories.is_empty());
        assert!(result.sessions.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_percentage_of_zero_total() {
        assert_eq!(percentage_of(5.0, 0.0), 0.0);
        assert_eq!(percentage_of(0.0, 0.0), 0.0);
        assert_eq!(percentage_of(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_percentages_sum_to_one_hundred() {
        let sessions = vec![
            summary_of(date(2025, 12, 1), &[("PP KOTOR", 1.1), ("METALIS", 2.2), ("SLITING", 3.3)]),
            summary_of(date(2025, 12, 2), &[("PP ROTI", 0.7), ("METALIS", 9.9)]),
        ];
        let breakdown = category_breakdown(&sessions);
        let sum: f64 = breakdown.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_sorted_descending_with_stable_ties() {
        let sessions = vec![summary_of(
            date(2025, 12, 1),
            &[("B", 2.0), ("A", 5.0), ("C", 2.0), ("D", 1.0), ("A", 1.0)],
        )];
        let breakdown = category_breakdown(&sessions);
        let names: Vec<&str> = breakdown.iter().map(|c| c.category_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        assert_eq!(breakdown[0].total_weight, 6.0);
        assert_eq!(breakdown[0].item_count, 2);
    }

    #[test]
    fn test_unknown_category_in_breakdown_and_details() {
        let mut session = summary_of(date(2025, 12, 1), &[("PP KOTOR", 2.0)]);
        push_uncategorised_item(&mut session, 3.0);

        let result = aggregate(&[session]);
        let summary = result.summary.unwrap();
        assert_eq!(summary.total_weight, 5.0);
        assert_eq!(summary.total_items, 2);

        assert_eq!(result.categories[0].category_name, UNKNOWN_CATEGORY);
        assert_eq!(result.categories[0].total_weight, 3.0);
        assert_eq!(result.sessions[0].categories, vec!["PP KOTOR", UNKNOWN_CATEGORY]);
    }

    #[test]
    fn test_session_detail_deduplicates_in_first_appearance_order() {
        let session = summary_of(
            date(2025, 12, 1),
            &[("METALIS", 1.0), ("PP KOTOR", 1.0), ("METALIS", 2.0), ("SLITING", 1.0)],
        );
        let detail = session_detail(&session);
        assert_eq!(detail.categories, vec!["METALIS", "PP KOTOR", "SLITING"]);
        assert_eq!(detail.item_count, 4);
        assert_eq!(detail.total_weight, 5.0);
    }

    #[test]
    fn test_session_details_sorted_newest_first() {
        let sessions = vec![
            summary_of(date(2025, 12, 5), &[("A", 1.0)]),
            summary_of(date(2025, 12, 20), &[("A", 1.0)]),
            summary_of(date(2025, 12, 1), &[("A", 1.0)]),
        ];
        let dates: Vec<NaiveDate> = aggregate(&sessions)
            .sessions
            .iter()
            .map(|s| s.transaction_date)
            .collect();
        assert_eq!(dates, vec![date(2025, 12, 20), date(2025, 12, 5), date(2025, 12, 1)]);
    }

    #[tokio::test]
    async fn test_closing_period_report_example() -> Result<()> {
        let db = setup_test_db().await?;
        let pp = create_test_category(&db, "PP KOTOR").await?;
        create_test_session(&db, date(2025, 12, 1), &[(pp.id, 3.0)]).await?;
        create_test_session(&db, date(2025, 12, 15), &[(pp.id, 2.0)]).await?;
        // Outside the period
        create_test_session(&db, date(2026, 1, 1), &[(pp.id, 9.0)]).await?;

        let period = create_closing_period(&db, "Desember 2025", date(2025, 12, 1), date(2025, 12, 31)).await?;
        let report = load_period_report(&db, PeriodSelector::ClosingPeriod(period.id), date(2026, 1, 5))
            .await?
            .unwrap();

        assert_eq!(report.period.label, "Desember 2025");
        let summary = report.aggregate.summary.unwrap();
        assert_eq!(summary.total_sessions, 2);
        assert_eq!(summary.total_weight, 5.0);
        assert_eq!(summary.total_items, 2);

        assert_eq!(report.aggregate.categories.len(), 1);
        assert_eq!(report.aggregate.categories[0].category_name, "PP KOTOR");
        assert_eq!(report.aggregate.categories[0].total_weight, 5.0);
        assert_eq!(report.aggregate.categories[0].percentage, 100.0);

        assert_eq!(report.aggregate.sessions[0].transaction_date, date(2025, 12, 15));
        Ok(())
    }

    #[tokio::test]
    async fn test_period_without_sessions_is_no_data() -> Result<()> {
        let db = setup_test_db().await?;
        let period = create_closing_period(&db, "Kosong", date(2024, 1, 1), date(2024, 1, 31)).await?;

        let report = load_period_report(&db, PeriodSelector::ClosingPeriod(period.id), date(2024, 2, 1))
            .await?
            .unwrap();
        assert!(report.aggregate.summary.is_none());
        assert!(report.aggregate.categories.is_empty());
        assert!(report.aggregate.sessions.is_empty());

        assert!(
            load_period_report(&db, PeriodSelector::ClosingPeriod(12345), date(2024, 2, 1))
                .await?
                .is_none()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_weekly_dashboard() -> Result<()> {
        let db = setup_test_db().await?;
        let pp = create_test_category(&db, "PP KOTOR").await?;
        let metalis = create_test_category(&db, "METALIS").await?;
        // Week of Monday 2025-12-08
        create_test_session(&db, date(2025, 12, 8), &[(pp.id, 1.0), (metalis.id, 3.0)]).await?;
        create_test_session(&db, date(2025, 12, 14), &[(pp.id, 4.0)]).await?;
        // Previous Sunday and next Monday stay out
        create_test_session(&db, date(2025, 12, 7), &[(pp.id, 100.0)]).await?;
        create_test_session(&db, date(2025, 12, 15), &[(pp.id, 100.0)]).await?;

        let dashboard = load_weekly_dashboard(&db, date(2025, 12, 10)).await?;
        assert_eq!(dashboard.week_number, 2);
        assert_eq!(dashboard.interval, DateInterval::new(date(2025, 12, 8), date(2025, 12, 14)));

        let summary = dashboard.summary.unwrap();
        assert_eq!(summary.total_sessions, 2);
        assert_eq!(summary.total_weight, 8.0);
        assert_eq!(dashboard.categories[0].category_name, "PP KOTOR");
        assert_eq!(dashboard.categories[0].total_weight, 5.0);
        assert_eq!(dashboard.categories[0].percentage, 62.5);
        assert_eq!(dashboard.categories[1].percentage, 37.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_weekly_dashboard_empty_week() -> Result<()> {
        let db = setup_test_db().await?;
        let dashboard = load_weekly_dashboard(&db, date(2025, 12, 10)).await?;
        assert!(dashboard.summary.is_none());
        assert!(dashboard.categories.is_empty());
        Ok(())
    }
}
