use async_trait::async_trait;
use foodgram_sdk::{
    NewRecipe, Page, PageRequest, Recipe, RecipeFilter, RecipeId, RecipeIngredient, RecipePatch,
    Tag, UserId,
};

use crate::domain::error::DomainError;

/// Repository trait for recipes and their tag and ingredient links.
#[async_trait]
pub trait RecipesRepository: Send + Sync {
    async fn get(&self, id: RecipeId) -> Result<Option<Recipe>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Recipe>, DomainError>;

    /// Filtered page of recipes, newest first. `viewer` scopes the
    /// favorite and shopping cart filters.
    async fn list_page(
        &self,
        filter: &RecipeFilter,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Page<Recipe>, DomainError>;

    /// Insert the recipe together with its tag and ingredient links.
    async fn create(&self, author_id: UserId, recipe: &NewRecipe) -> Result<Recipe, DomainError>;

    /// Apply the patch; link sets present in the patch replace the stored ones.
    async fn update(&self, id: RecipeId, patch: &RecipePatch) -> Result<Recipe, DomainError>;

    /// Delete the recipe with its links and marks. Returns `false` when the
    /// recipe did not exist.
    async fn delete(&self, id: RecipeId) -> Result<bool, DomainError>;

    async fn tags_for(&self, recipe_ids: &[RecipeId]) -> Result<Vec<(RecipeId, Tag)>, DomainError>;

    async fn ingredients_for(
        &self,
        recipe_ids: &[RecipeId],
    ) -> Result<Vec<(RecipeId, RecipeIngredient)>, DomainError>;

    /// The author's recipes, newest first, at most `limit` of them.
    async fn list_by_author(
        &self,
        author_id: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, DomainError>;

    async fn count_by_author(&self, author_id: UserId) -> Result<u64, DomainError>;
}
