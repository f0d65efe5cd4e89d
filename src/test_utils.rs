//! Shared test utilities for the weighing ledger.
//!
//! This module provides helpers for setting up test databases, creating stored
//! categories and sessions with sensible defaults, and building in-memory
//! [`SessionSummary`] values for the pure aggregation and formatting code.

use crate::{
    core::{
        category,
        session::{self, ItemDetail, NewItem, NewSession, SessionSummary},
    },
    entities::{CategoryIds, plastic_category, weighing_item, weighing_session},
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date. Panics on an invalid date, which is a test bug.
#[allow(clippy::unwrap_used)]
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Inserts one plastic category.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<plastic_category::Model> {
    let mut inserted = category::add_categories(db, &[name.to_string()]).await?;
    Ok(inserted.remove(0))
}

/// Stores a session with sensible defaults.
///
/// # Defaults
/// * `pic_name`: "Budi"
/// * `owner_name`: "CV Maju"
/// * no satuan, no start/end time
pub async fn create_test_session(
    db: &DatabaseConnection,
    transaction_date: NaiveDate,
    items: &[(i64, f64)],
) -> Result<SessionSummary> {
    create_custom_session(db, transaction_date, "Budi", "CV Maju", items).await
}

/// Stores a session with custom names. The selection is every category used by `items`.
pub async fn create_custom_session(
    db: &DatabaseConnection,
    transaction_date: NaiveDate,
    pic_name: &str,
    owner_name: &str,
    items: &[(i64, f64)],
) -> Result<SessionSummary> {
    session::create_session(
        db,
        NewSession {
            transaction_date,
            pic_name: pic_name.to_string(),
            owner_name: owner_name.to_string(),
            selected_category_ids: items.iter().map(|(id, _)| *id).collect(),
            items: items
                .iter()
                .map(|&(category_id, weight_kg)| NewItem {
                    category_id,
                    weight_kg,
                    satuan: None,
                })
                .collect(),
            start_time: None,
            end_time: None,
        },
    )
    .await
}

/// Builds an unsaved session summary from `(category name, weight)` pairs.
///
/// Each distinct name gets a stable category id in order of first appearance.
#[must_use]
pub fn summary_of(transaction_date: NaiveDate, items: &[(&str, f64)]) -> SessionSummary {
    let session_id = Uuid::new_v4();
    let mut names: Vec<&str> = Vec::new();
    let mut details = Vec::with_capacity(items.len());

    for (sequence_number, &(name, weight_kg)) in (1..).zip(items) {
        let position = names.iter().position(|n| *n == name).unwrap_or_else(|| {
            names.push(name);
            names.len() - 1
        });
        let category_id = i64::try_from(position).unwrap_or_default() + 1;
        details.push(ItemDetail {
            item: weighing_item::Model {
                id: Uuid::new_v4(),
                session_id,
                category_id,
                sequence_number,
                weight_kg,
                satuan: None,
            },
            category: Some(plastic_category::Model {
                id: category_id,
                name: name.to_string(),
                created_at: Utc::now(),
            }),
        });
    }

    let session = weighing_session::Model {
        id: session_id,
        transaction_date,
        pic_name: "Budi".to_string(),
        owner_name: "CV Maju".to_string(),
        selected_category_ids: CategoryIds((1..=i64::try_from(names.len()).unwrap_or_default()).collect()),
        start_time: None,
        end_time: None,
        created_at: Utc::now(),
    };
    SessionSummary::new(session, details)
}

/// Appends an item whose category reference does not resolve, then recomputes totals.
pub fn push_uncategorised_item(summary: &mut SessionSummary, weight_kg: f64) {
    let sequence_number = i32::try_from(summary.items.len()).unwrap_or_default() + 1;
    summary.items.push(ItemDetail {
        item: weighing_item::Model {
            id: Uuid::new_v4(),
            session_id: summary.session.id,
            category_id: 9_999,
            sequence_number,
            weight_kg,
            satuan: None,
        },
        category: None,
    });
    *summary = SessionSummary::new(summary.session.clone(), std::mem::take(&mut summary.items));
}
