//! Plastic category entity - Reference data for the kinds of plastic weighed.
//!
//! Categories are seeded administratively (see `config::categories`) and are
//! never mutated through the normal weighing flow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plastic category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plastic_categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "PP KOTOR", "METALIS")
    pub name: String,
    /// When the category was seeded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PlasticCategory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category is referenced by many weighing items
    #[sea_orm(has_many = "super::weighing_item::Entity")]
    WeighingItems,
}

impl Related<super::weighing_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeighingItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
