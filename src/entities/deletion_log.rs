//! Deletion log entity - Append-only audit trail of deleted weighing sessions.
//!
//! A row snapshots the session just before it is removed. Rows older than the
//! retention window are purged by `core::audit::purge_expired_logs`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Deletion log database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deletion_logs")]
pub struct Model {
    /// Unique identifier for the log entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the session that was deleted (the row itself no longer exists)
    pub deleted_session_id: Uuid,
    /// PIC of the deleted session
    pub nama_penimbang: String,
    /// Owner of the deleted session
    pub pemilik_barang: String,
    /// Total weight of the deleted session in kilograms
    pub total_berat_kg: f64,
    /// When the deletion was requested
    pub deleted_at: DateTimeUtc,
    /// Client user agent that issued the deletion, if known
    pub user_agent: Option<String>,
}

/// `DeletionLog` intentionally has no foreign key to the deleted session
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
