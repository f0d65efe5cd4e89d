//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod closing_period;
pub mod deletion_log;
pub mod plastic_category;
pub mod weighing_item;
pub mod weighing_session;

// Re-export specific types to avoid conflicts
pub use closing_period::{
    Column as ClosingPeriodColumn, Entity as ClosingPeriod, Model as ClosingPeriodModel,
};
pub use deletion_log::{Column as DeletionLogColumn, Entity as DeletionLog, Model as DeletionLogModel};
pub use plastic_category::{
    Column as PlasticCategoryColumn, Entity as PlasticCategory, Model as PlasticCategoryModel,
};
pub use weighing_item::{
    Column as WeighingItemColumn, Entity as WeighingItem, Model as WeighingItemModel, Satuan,
};
pub use weighing_session::{
    CategoryIds, Column as WeighingSessionColumn, Entity as WeighingSession,
    Model as WeighingSessionModel,
};
