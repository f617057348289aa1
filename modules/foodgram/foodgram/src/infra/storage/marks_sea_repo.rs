//! `SeaORM` repository for favorites and shopping cart entries.

use std::collections::HashSet;

use async_trait::async_trait;
use foodgram_sdk::{RecipeId, UserId};
use sea_orm::sea_query::OnConflict;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::db::db_err;
use super::entity::recipe_mark;
use crate::domain::error::DomainError;
use crate::domain::repos::{MarkKind, RecipeMarksRepository};

pub struct SeaOrmRecipeMarksRepository {
    db: DatabaseConnection,
}

impl SeaOrmRecipeMarksRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn mark_condition(kind: MarkKind, user_id: UserId) -> Condition {
    Condition::all()
        .add(recipe_mark::Column::Kind.eq(kind.as_str()))
        .add(recipe_mark::Column::UserId.eq(user_id))
}

#[async_trait]
impl RecipeMarksRepository for SeaOrmRecipeMarksRepository {
    async fn add(
        &self,
        kind: MarkKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, DomainError> {
        let model = recipe_mark::ActiveModel {
            id: NotSet,
            kind: Set(kind.as_str().to_owned()),
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
        };
        let inserted = recipe_mark::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    recipe_mark::Column::Kind,
                    recipe_mark::Column::UserId,
                    recipe_mark::Column::RecipeId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        kind: MarkKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, DomainError> {
        let result = recipe_mark::Entity::delete_many()
            .filter(mark_condition(kind, user_id))
            .filter(recipe_mark::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(result.rows_affected > 0)
    }

    async fn marked_among(
        &self,
        kind: MarkKind,
        user_id: UserId,
        recipe_ids: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, DomainError> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<RecipeId> = recipe_mark::Entity::find()
            .select_only()
            .column(recipe_mark::Column::RecipeId)
            .filter(mark_condition(kind, user_id))
            .filter(recipe_mark::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(ids.into_iter().collect())
    }

    async fn recipes_of(
        &self,
        kind: MarkKind,
        user_id: UserId,
    ) -> Result<Vec<RecipeId>, DomainError> {
        recipe_mark::Entity::find()
            .select_only()
            .column(recipe_mark::Column::RecipeId)
            .filter(mark_condition(kind, user_id))
            .order_by_asc(recipe_mark::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))
    }
}
