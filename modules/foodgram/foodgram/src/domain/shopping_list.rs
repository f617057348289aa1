//! Shopping list aggregation over a user's cart.

use async_trait::async_trait;
use foodgram_sdk::{IngredientLine, RecipeId, ShoppingList, UserId};
use tracing::debug;

use crate::domain::error::DomainError;

/// Read access to the data the aggregator consumes.
#[async_trait]
pub trait CartSource: Send + Sync {
    /// Recipes in the user's cart, in the order they were added.
    async fn cart_recipes(&self, user_id: UserId) -> Result<Vec<RecipeId>, DomainError>;

    /// Ingredient entries of a recipe, in stored order.
    async fn ingredient_entries(
        &self,
        recipe_id: RecipeId,
    ) -> Result<Vec<IngredientLine>, DomainError>;
}

/// Sums ingredient amounts across every recipe in a cart.
///
/// Stateless; a single instance can serve concurrent callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShoppingListAggregator;

impl ShoppingListAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the consolidated list for `user_id`.
    ///
    /// # Errors
    /// Returns the first error reported by `source`, unchanged.
    pub async fn aggregate(
        &self,
        source: &dyn CartSource,
        user_id: UserId,
    ) -> Result<ShoppingList, DomainError> {
        let recipes = source.cart_recipes(user_id).await?;
        let mut list = ShoppingList::new();
        for recipe_id in &recipes {
            for line in source.ingredient_entries(*recipe_id).await? {
                list.add(line);
            }
        }
        debug!(
            user_id,
            recipes = recipes.len(),
            lines = list.len(),
            "aggregated shopping list"
        );
        Ok(list)
    }
}
