//! Weighing session store - Creating, reading, editing and deleting sessions and items.
//!
//! A session is written together with its items inside one database transaction,
//! after validation has passed. Reads join every item with its plastic category;
//! the category link is optional so a dangling reference still contributes its
//! weight and is shown under [`UNKNOWN_CATEGORY`]. Deleting a session first writes
//! a deletion log entry (failure there is logged and ignored), then removes the
//! items and the session.

use crate::{
    core::{audit, category, period::DateInterval},
    entities::{
        CategoryIds, PlasticCategory, Satuan, WeighingItem, WeighingSession, plastic_category,
        weighing_item, weighing_session,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, Func, SimpleExpr},
};

/// Label used wherever an item's category cannot be resolved.
pub const UNKNOWN_CATEGORY: &str = "Tidak Diketahui";

/// An item joined with its category, if the category still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetail {
    /// The stored item
    pub item: weighing_item::Model,
    /// The referenced category, `None` when the reference does not resolve
    pub category: Option<plastic_category::Model>,
}

impl ItemDetail {
    /// Category name for display and grouping, falling back to [`UNKNOWN_CATEGORY`].
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map_or(UNKNOWN_CATEGORY, |category| category.name.as_str())
    }
}

/// A session with its items and computed totals.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// The stored session
    pub session: weighing_session::Model,
    /// Items ordered by sequence number
    pub items: Vec<ItemDetail>,
    /// Number of items
    pub total_items: usize,
    /// Sum of item weights in kilograms
    pub total_weight: f64,
}

impl SessionSummary {
    /// Wraps a session and its items, computing the totals.
    #[must_use]
    pub fn new(session: weighing_session::Model, items: Vec<ItemDetail>) -> Self {
        let total_weight = items.iter().map(|detail| detail.item.weight_kg).sum();
        Self {
            session,
            total_items: items.len(),
            total_weight,
            items,
        }
    }

    /// Time spent entering weights (end − start), when both timestamps were recorded.
    #[must_use]
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.session.start_time, self.session.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// One item as entered by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    /// Selected category id (0 means "not chosen yet")
    pub category_id: i64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Optional packing unit
    pub satuan: Option<Satuan>,
}

/// Input for [`create_session`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    /// Date of the weighing
    pub transaction_date: NaiveDate,
    /// Person responsible for the weighing
    pub pic_name: String,
    /// Owner of the goods
    pub owner_name: String,
    /// Categories picked before entering weights
    pub selected_category_ids: Vec<i64>,
    /// Items in entry order
    pub items: Vec<NewItem>,
    /// When the first weight was entered
    pub start_time: Option<DateTime<Utc>>,
    /// When the session was submitted
    pub end_time: Option<DateTime<Utc>>,
}

/// History filters. Empty strings and `None` mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    /// Earliest transaction date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest transaction date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the PIC name
    pub pic_name: Option<String>,
    /// Case-insensitive substring of the owner name
    pub owner_name: Option<String>,
}

impl SessionFilter {
    /// Filter matching every session whose date falls inside `interval`.
    #[must_use]
    pub const fn within(interval: DateInterval) -> Self {
        Self {
            start_date: Some(interval.start),
            end_date: Some(interval.end),
            pic_name: None,
            owner_name: None,
        }
    }
}

/// Partial update of session header fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUpdate {
    /// New transaction date
    pub transaction_date: Option<NaiveDate>,
    /// New PIC name
    pub pic_name: Option<String>,
    /// New owner name
    pub owner_name: Option<String>,
    /// New selection of categories
    pub selected_category_ids: Option<Vec<i64>>,
}

/// Partial update of a single item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    /// New category id
    pub category_id: Option<i64>,
    /// New weight in kilograms
    pub weight_kg: Option<f64>,
    /// New unit; `Some(None)` clears it
    pub satuan: Option<Option<Satuan>>,
}

/// Rejects weights that are not finite or not strictly positive.
pub fn validate_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(Error::InvalidWeight { weight });
    }
    Ok(())
}

fn validate_name(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Checks a new session the same way the input form does, before any write.
pub fn validate_new_session(new_session: &NewSession) -> Result<()> {
    validate_name(&new_session.pic_name, "PIC name")?;
    validate_name(&new_session.owner_name, "Owner name")?;

    if new_session.selected_category_ids.is_empty() {
        return Err(Error::validation("Select at least one plastic category"));
    }
    if new_session.items.is_empty() {
        return Err(Error::validation("Add at least one weighing item"));
    }

    for item in &new_session.items {
        if item.category_id <= 0 {
            return Err(Error::validation("Every item needs a plastic category"));
        }
        validate_weight(item.weight_kg)?;
    }

    Ok(())
}

/// Validates and stores a session with its items.
///
/// Items receive sequence numbers 1..n in the order given. The session and all
/// items are written in one transaction, so a failure leaves nothing behind.
pub async fn create_session(db: &DatabaseConnection, new_session: NewSession) -> Result<SessionSummary> {
    validate_new_session(&new_session)?;

    let session_id = Uuid::new_v4();
    let txn = db.begin().await?;

    let session = weighing_session::ActiveModel {
        id: Set(session_id),
        transaction_date: Set(new_session.transaction_date),
        pic_name: Set(new_session.pic_name.trim().to_string()),
        owner_name: Set(new_session.owner_name.trim().to_string()),
        selected_category_ids: Set(CategoryIds::from_selection(&new_session.selected_category_ids)),
        start_time: Set(new_session.start_time),
        end_time: Set(new_session.end_time),
        created_at: Set(Utc::now()),
    };
    session.insert(&txn).await?;

    for (sequence_number, item) in (1..).zip(new_session.items.iter()) {
        let item_model = weighing_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session_id),
            category_id: Set(item.category_id),
            sequence_number: Set(sequence_number),
            weight_kg: Set(item.weight_kg),
            satuan: Set(item.satuan),
        };
        item_model.insert(&txn).await?;
    }

    txn.commit().await?;
    tracing::info!(
        "Created weighing session {} with {} items",
        session_id,
        new_session.items.len()
    );

    get_session_with_items(db, session_id)
        .await?
        .ok_or(Error::SessionNotFound { id: session_id })
}

async fn load_items<C>(db: &C, session_id: Uuid) -> Result<Vec<ItemDetail>>
where
    C: ConnectionTrait,
{
    let rows = WeighingItem::find()
        .filter(weighing_item::Column::SessionId.eq(session_id))
        .order_by_asc(weighing_item::Column::SequenceNumber)
        .find_also_related(PlasticCategory)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(item, category)| ItemDetail { item, category })
        .collect())
}

/// Retrieves one session with its items, or None if it does not exist.
pub async fn get_session_with_items(
    db: &DatabaseConnection,
    session_id: Uuid,
) -> Result<Option<SessionSummary>> {
    let Some(session) = WeighingSession::find_by_id(session_id).one(db).await? else {
        return Ok(None);
    };
    let items = load_items(db, session_id).await?;
    Ok(Some(SessionSummary::new(session, items)))
}

fn contains_ignore_case(column: weighing_session::Column, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Lists sessions matching `filter`, newest transaction date first.
///
/// Items are fetched per session. If reading one session's items fails, that
/// session is skipped with a warning instead of failing the whole listing.
pub async fn get_session_summaries(
    db: &DatabaseConnection,
    filter: &SessionFilter,
) -> Result<Vec<SessionSummary>> {
    let mut query = WeighingSession::find();
    if let Some(start) = filter.start_date {
        query = query.filter(weighing_session::Column::TransactionDate.gte(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(weighing_session::Column::TransactionDate.lte(end));
    }
    if let Some(pic) = non_blank(filter.pic_name.as_ref()) {
        query = query.filter(contains_ignore_case(weighing_session::Column::PicName, pic));
    }
    if let Some(owner) = non_blank(filter.owner_name.as_ref()) {
        query = query.filter(contains_ignore_case(weighing_session::Column::OwnerName, owner));
    }

    let sessions = query
        .order_by_desc(weighing_session::Column::TransactionDate)
        .order_by_desc(weighing_session::Column::CreatedAt)
        .all(db)
        .await?;
    tracing::debug!("Loaded {} sessions for {:?}", sessions.len(), filter);

    let mut summaries = Vec::with_capacity(sessions.len());
    for session in sessions {
        match load_items(db, session.id).await {
            Ok(items) => summaries.push(SessionSummary::new(session, items)),
            Err(e) => {
                tracing::warn!("Skipping session {}: failed to load items: {}", session.id, e);
            }
        }
    }

    Ok(summaries)
}

/// Updates header fields of a session.
pub async fn update_session(
    db: &DatabaseConnection,
    session_id: Uuid,
    update: SessionUpdate,
) -> Result<weighing_session::Model> {
    if let Some(pic) = &update.pic_name {
        validate_name(pic, "PIC name")?;
    }
    if let Some(owner) = &update.owner_name {
        validate_name(owner, "Owner name")?;
    }
    if update.selected_category_ids.as_ref().is_some_and(Vec::is_empty) {
        return Err(Error::validation("Select at least one plastic category"));
    }

    let session = WeighingSession::find_by_id(session_id)
        .one(db)
        .await?
        .ok_or(Error::SessionNotFound { id: session_id })?;

    let mut active_model: weighing_session::ActiveModel = session.into();
    if let Some(date) = update.transaction_date {
        active_model.transaction_date = Set(date);
    }
    if let Some(pic) = update.pic_name {
        active_model.pic_name = Set(pic.trim().to_string());
    }
    if let Some(owner) = update.owner_name {
        active_model.owner_name = Set(owner.trim().to_string());
    }
    if let Some(ids) = update.selected_category_ids {
        active_model.selected_category_ids = Set(CategoryIds::from_selection(&ids));
    }

    let updated = active_model.update(db).await?;
    tracing::info!("Updated weighing session {}", session_id);
    Ok(updated)
}

/// Updates a single item in place. Its sequence number never changes.
pub async fn update_item(
    db: &DatabaseConnection,
    item_id: Uuid,
    update: ItemUpdate,
) -> Result<weighing_item::Model> {
    if let Some(weight) = update.weight_kg {
        validate_weight(weight)?;
    }
    if update.category_id.is_some_and(|id| id <= 0) {
        return Err(Error::validation("Every item needs a plastic category"));
    }

    let item = WeighingItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    if let Some(category_id) = update.category_id {
        if category::get_category_by_id(db, category_id).await?.is_none() {
            return Err(Error::validation(format!("Unknown plastic category {category_id}")));
        }
    }

    let mut active_model: weighing_item::ActiveModel = item.into();
    if let Some(category_id) = update.category_id {
        active_model.category_id = Set(category_id);
    }
    if let Some(weight) = update.weight_kg {
        active_model.weight_kg = Set(weight);
    }
    if let Some(satuan) = update.satuan {
        active_model.satuan = Set(satuan);
    }

    let updated = active_model.update(db).await?;
    tracing::info!("Updated weighing item {}", item_id);
    Ok(updated)
}

/// Deletes a single item. The remaining items keep their sequence numbers.
pub async fn delete_item(db: &DatabaseConnection, item_id: Uuid) -> Result<()> {
    let result = WeighingItem::delete_by_id(item_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ItemNotFound { id: item_id });
    }
    tracing::info!("Deleted weighing item {}", item_id);
    Ok(())
}

/// Deletes a session and its items, recording the deletion first.
///
/// The deletion log write is best effort: if it fails the failure is logged and
/// the session is deleted anyway. Items and session are removed in one transaction.
pub async fn delete_session(
    db: &DatabaseConnection,
    session_id: Uuid,
    user_agent: Option<&str>,
) -> Result<()> {
    let summary = get_session_with_items(db, session_id)
        .await?
        .ok_or(Error::SessionNotFound { id: session_id })?;

    if let Err(e) = audit::record_deletion(db, &summary, user_agent).await {
        tracing::warn!("Failed to write deletion log for session {}: {}", session_id, e);
    }

    let txn = db.begin().await?;
    WeighingItem::delete_many()
        .filter(weighing_item::Column::SessionId.eq(session_id))
        .exec(&txn)
        .await?;
    WeighingSession::delete_by_id(session_id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        "Deleted weighing session {} ({} items, {:.2} kg)",
        session_id,
        summary.total_items,
        summary.total_weight
    );
    Ok(())
}
