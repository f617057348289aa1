use async_trait::async_trait;
use foodgram_sdk::{Ingredient, IngredientId, NewIngredient, NewTag, Tag, TagId};

use crate::domain::error::DomainError;

/// Repository trait for the tag and ingredient catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All tags, newest first.
    async fn list_tags(&self) -> Result<Vec<Tag>, DomainError>;

    async fn get_tag(&self, id: TagId) -> Result<Option<Tag>, DomainError>;

    /// Tags whose ids are in `ids`; unknown ids are skipped.
    async fn tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, DomainError>;

    /// Return the tag with the same slug, or insert a new one.
    /// The flag is `true` when a row was inserted.
    async fn get_or_create_tag(&self, tag: NewTag) -> Result<(Tag, bool), DomainError>;

    /// Ingredients, newest first, optionally filtered by a case-insensitive
    /// name prefix.
    async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, DomainError>;

    async fn get_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, DomainError>;

    /// Ingredients whose ids are in `ids`; unknown ids are skipped.
    async fn ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, DomainError>;

    /// Return the ingredient with the same `(name, measurement_unit)`, or
    /// insert a new one. The flag is `true` when a row was inserted.
    async fn get_or_create_ingredient(
        &self,
        ingredient: NewIngredient,
    ) -> Result<(Ingredient, bool), DomainError>;
}
