//! Weighing session entity - One weighing event at the facility.
//!
//! Each session has a transaction date, the person responsible for weighing (PIC),
//! the owner of the goods, the categories picked up front, and optional start/end
//! timestamps recorded while weights were being entered. Items hang off the
//! session and are removed with it.

use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Category ids selected when the session was opened, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CategoryIds(pub Vec<i64>);

impl CategoryIds {
    /// Builds the set from raw ids, dropping duplicates but keeping first-selection order.
    #[must_use]
    pub fn from_selection(ids: &[i64]) -> Self {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        Self(unique)
    }
}

/// Weighing session database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weighing_sessions")]
pub struct Model {
    /// Opaque identifier for the session
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Calendar date the goods were weighed
    pub transaction_date: Date,
    /// Person responsible for the weighing (penimbang)
    pub pic_name: String,
    /// Owner of the weighed goods (pemilik barang)
    pub owner_name: String,
    /// Categories chosen before weight entry started
    #[sea_orm(column_type = "Json")]
    pub selected_category_ids: CategoryIds,
    /// Set when the first weight was entered
    pub start_time: Option<DateTimeUtc>,
    /// Set when the session was submitted
    pub end_time: Option<DateTimeUtc>,
    /// When the session row was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `WeighingSession` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One session owns many weighing items
    #[sea_orm(has_many = "super::weighing_item::Entity")]
    WeighingItems,
}

impl Related<super::weighing_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeighingItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
