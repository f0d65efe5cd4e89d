//! Category registry - Lookup and seeding of plastic categories.
//!
//! Categories are static reference data. End users only read them; new names are
//! added through configuration seeding or the administrative `add_categories` call.

use crate::{
    config::CategoryConfig,
    entities::{PlasticCategory, plastic_category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;

/// Retrieves all plastic categories, ordered alphabetically by name.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<plastic_category::Model>> {
    PlasticCategory::find()
        .order_by_asc(plastic_category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by id, returning None if it does not exist.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<plastic_category::Model>> {
    PlasticCategory::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Builds an id → name map of every category, for joining ids picked at session start.
pub async fn get_category_names(db: &DatabaseConnection) -> Result<HashMap<i64, String>> {
    Ok(get_all_categories(db)
        .await?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect())
}

/// Inserts new categories. Names are trimmed; a blank name rejects the whole batch.
pub async fn add_categories(
    db: &DatabaseConnection,
    names: &[String],
) -> Result<Vec<plastic_category::Model>> {
    let trimmed: Vec<&str> = names.iter().map(|name| name.trim()).collect();
    if trimmed.iter().any(|name| name.is_empty()) {
        return Err(Error::validation("Category name cannot be empty"));
    }

    let now = chrono::Utc::now();
    let mut inserted = Vec::with_capacity(trimmed.len());
    for name in trimmed {
        let category = plastic_category::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now),
            ..Default::default()
        };
        inserted.push(category.insert(db).await?);
    }

    tracing::info!("Added {} plastic categories", inserted.len());
    Ok(inserted)
}

/// Seeds configured categories that are not in the table yet.
///
/// Matching is by exact (trimmed) name, so running the seed twice inserts nothing
/// the second time. Returns the number of categories inserted.
pub async fn seed_categories(db: &DatabaseConnection, configured: &[CategoryConfig]) -> Result<usize> {
    let existing: Vec<String> = get_all_categories(db)
        .await?
        .into_iter()
        .map(|category| category.name)
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for config in configured {
        let name = config.name.trim();
        if name.is_empty() || existing.iter().any(|e| e == name) || missing.iter().any(|m| m == name) {
            continue;
        }
        missing.push(name.to_string());
    }

    if missing.is_empty() {
        tracing::debug!("All configured categories already present");
        return Ok(0);
    }

    Ok(add_categories(db, &missing).await?.len())
}
