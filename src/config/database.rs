//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated with `Schema::create_table_from_entity`, so the schema always
//! matches the entity definitions in [`crate::entities`] without hand-written SQL.
//! Item rows reference their session with `ON DELETE CASCADE`.

use crate::entities::{ClosingPeriod, DeletionLog, PlasticCategory, WeighingItem, WeighingSession};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Default `SQLite` location used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/weighlog.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to [`DEFAULT_DATABASE_URL`] when no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Categories and sessions are created before items so the foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut category_table = schema.create_table_from_entity(PlasticCategory);
    let mut session_table = schema.create_table_from_entity(WeighingSession);
    let mut item_table = schema.create_table_from_entity(WeighingItem);
    let mut period_table = schema.create_table_from_entity(ClosingPeriod);
    let mut log_table = schema.create_table_from_entity(DeletionLog);

    for table in [
        &mut category_table,
        &mut session_table,
        &mut item_table,
        &mut period_table,
        &mut log_table,
    ] {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    Ok(())
}
