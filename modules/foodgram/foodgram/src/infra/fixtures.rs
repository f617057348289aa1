//! JSON fixture files for seeding the catalog.
//!
//! Both files are arrays: tags as `{"name", "color", "slug"}` objects,
//! ingredients as `{"name", "measurement_unit"}` objects.

use std::path::Path;

use anyhow::Context;
use foodgram_sdk::{NewIngredient, NewTag};
use serde::de::DeserializeOwned;

use crate::domain::service::{CatalogService, LoadReport};

async fn read_array<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read fixture file {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse fixture file {}", path.display()))
}

/// Import tags from `path`. Re-running with the same file creates nothing.
pub async fn load_tags(catalog: &CatalogService, path: &Path) -> anyhow::Result<LoadReport> {
    let tags: Vec<NewTag> = read_array(path).await?;
    Ok(catalog.load_tags(tags).await?)
}

/// Import ingredients from `path`. Re-running with the same file creates
/// nothing.
pub async fn load_ingredients(
    catalog: &CatalogService,
    path: &Path,
) -> anyhow::Result<LoadReport> {
    let ingredients: Vec<NewIngredient> = read_array(path).await?;
    Ok(catalog.load_ingredients(ingredients).await?)
}
