//! Weighing item entity - One weighed quantity of a single plastic category.
//!
//! Items carry a 1-based `sequence_number` reflecting entry order inside their
//! session, the weight in kilograms and an optional packing unit (`satuan`: SAK, PRESS or BAL).
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Packing unit recorded next to a weight. A missing unit is stored as NULL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum Satuan {
    /// Sack
    #[sea_orm(string_value = "SAK")]
    Sak,
    /// Pressed bale
    #[sea_orm(string_value = "PRESS")]
    Press,
    /// Bale
    #[sea_orm(string_value = "BAL")]
    Bal,
}

impl Satuan {
    /// Parses a unit tag case-insensitively.
    ///
    /// Blank input is a valid "no unit" answer (`Ok(None)`); anything else that is
    /// not one of the known tags is rejected with the offending text.
    pub fn parse(raw: &str) -> Result<Option<Self>, String> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SAK" => Ok(Some(Self::Sak)),
            "PRESS" => Ok(Some(Self::Press)),
            "BAL" => Ok(Some(Self::Bal)),
            "" => Ok(None),
            other => Err(other.to_string()),
        }
    }

    /// The stored tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sak => "SAK",
            Self::Press => "PRESS",
            Self::Bal => "BAL",
        }
    }
}

impl fmt::Display for Satuan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighing item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weighing_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Session this item belongs to
    pub session_id: Uuid,
    /// Plastic category of the weighed goods
    pub category_id: i64,
    /// 1-based position in entry order, unique within the session
    pub sequence_number: i32,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Packing unit, `None` when the operator left it blank
    pub satuan: Option<Satuan>,
}

/// Defines relationships between `WeighingItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one session and goes away with it
    #[sea_orm(
        belongs_to = "super::weighing_session::Entity",
        from = "Column::SessionId",
        to = "super::weighing_session::Column::Id",
        on_delete = "Cascade"
    )]
    WeighingSession,
    /// Each item references one plastic category
    #[sea_orm(
        belongs_to = "super::plastic_category::Entity",
        from = "Column::CategoryId",
        to = "super::plastic_category::Column::Id"
    )]
    PlasticCategory,
}

impl Related<super::weighing_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeighingSession.def()
    }
}

impl Related<super::plastic_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlasticCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
