use std::sync::Arc;

use foodgram_sdk::{Recipe, RecipeId};
use tracing::{info, instrument};

use crate::domain::error::DomainError;
use crate::domain::repos::{MarkKind, RecipeMarksRepository, RecipesRepository};
use crate::security::SecurityContext;

/// Favorites and shopping cart membership of the caller.
pub struct MarksService {
    marks: Arc<dyn RecipeMarksRepository>,
    recipes: Arc<dyn RecipesRepository>,
}

impl MarksService {
    #[must_use]
    pub fn new(marks: Arc<dyn RecipeMarksRepository>, recipes: Arc<dyn RecipesRepository>) -> Self {
        Self { marks, recipes }
    }

    /// Put a recipe on one of the caller's lists and return it.
    #[instrument(skip(self, ctx))]
    pub async fn add(
        &self,
        ctx: &SecurityContext,
        kind: MarkKind,
        recipe_id: RecipeId,
    ) -> Result<Recipe, DomainError> {
        let user_id = ctx.require_subject()?;
        let recipe = self
            .recipes
            .get(recipe_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Recipe", &recipe_id))?;
        if !self.marks.add(kind, user_id, recipe_id).await? {
            return Err(DomainError::bad_request(format!(
                "Recipe is already added to {}",
                kind.label()
            )));
        }
        info!(user_id, recipe_id, kind = kind.as_str(), "recipe marked");
        Ok(recipe)
    }

    #[instrument(skip(self, ctx))]
    pub async fn remove(
        &self,
        ctx: &SecurityContext,
        kind: MarkKind,
        recipe_id: RecipeId,
    ) -> Result<(), DomainError> {
        let user_id = ctx.require_subject()?;
        if self.recipes.get(recipe_id).await?.is_none() {
            return Err(DomainError::not_found("Recipe", &recipe_id));
        }
        if !self.marks.remove(kind, user_id, recipe_id).await? {
            return Err(DomainError::not_found(kind.entity(), &recipe_id));
        }
        info!(user_id, recipe_id, kind = kind.as_str(), "recipe unmarked");
        Ok(())
    }
}
