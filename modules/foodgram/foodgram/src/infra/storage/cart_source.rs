//! Cart accessor backed by the recipe mark and ingredient tables.

use async_trait::async_trait;
use foodgram_sdk::{IngredientLine, RecipeId, UserId};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::db::db_err;
use super::entity::{IngredientEntity, ingredient, recipe_ingredient};
use super::marks_sea_repo::SeaOrmRecipeMarksRepository;
use crate::domain::error::DomainError;
use crate::domain::repos::{MarkKind, RecipeMarksRepository};
use crate::domain::shopping_list::CartSource;

/// Reads cart membership and raw ingredient rows; all summing happens in
/// the aggregator.
pub struct SeaOrmCartSource {
    db: DatabaseConnection,
    marks: SeaOrmRecipeMarksRepository,
}

impl SeaOrmCartSource {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            marks: SeaOrmRecipeMarksRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl CartSource for SeaOrmCartSource {
    async fn cart_recipes(&self, user_id: UserId) -> Result<Vec<RecipeId>, DomainError> {
        self.marks.recipes_of(MarkKind::ShoppingCart, user_id).await
    }

    async fn ingredient_entries(
        &self,
        recipe_id: RecipeId,
    ) -> Result<Vec<IngredientLine>, DomainError> {
        let rows: Vec<(i32, String, String)> = recipe_ingredient::Entity::find()
            .select_only()
            .column(recipe_ingredient::Column::Amount)
            .column(ingredient::Column::Name)
            .column(ingredient::Column::MeasurementUnit)
            .inner_join(IngredientEntity)
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .order_by_asc(recipe_ingredient::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(rows
            .into_iter()
            .map(|(amount, name, unit)| IngredientLine::new(name, unit, i64::from(amount)))
            .collect())
    }
}
