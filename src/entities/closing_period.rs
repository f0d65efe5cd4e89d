//! Closing period entity - A named, user-defined reporting interval.
//!
//! Periods are arbitrary (possibly overlapping) inclusive date ranges such as
//! "Desember 2025" covering 2025-11-27..2025-12-28. They are never hard-deleted;
//! `is_active = false` hides them from reporting.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closing period database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "closing_periods")]
pub struct Model {
    /// Unique identifier for the period
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Desember 2025")
    pub period_name: String,
    /// First day of the period, inclusive
    pub start_date: Date,
    /// Last day of the period, inclusive
    pub end_date: Date,
    /// Soft delete flag - inactive periods resolve to "no data"
    pub is_active: bool,
    /// When the period was created
    pub created_at: DateTime,
    /// When the period was last modified
    pub updated_at: DateTime,
}

/// `ClosingPeriod` has no relationships; sessions are matched by date range
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
