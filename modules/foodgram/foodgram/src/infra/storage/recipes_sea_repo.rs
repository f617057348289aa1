//! `SeaORM` repository for recipes and their tag and ingredient links.

use async_trait::async_trait;
use foodgram_sdk::{
    IngredientAmount, NewRecipe, Page, PageRequest, Recipe, RecipeFilter, RecipeId,
    RecipeIngredient, RecipePatch, Tag, TagId, UserId,
};
use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
};

use super::db::db_err;
use super::entity::{
    IngredientEntity, RecipeEntity, recipe, recipe_ingredient, recipe_mark, recipe_tag, tag,
};
use super::mapper::recipe_ingredient as join_ingredient;
use crate::domain::error::DomainError;
use crate::domain::repos::{MarkKind, RecipesRepository};

pub struct SeaOrmRecipesRepository {
    db: DatabaseConnection,
}

impl SeaOrmRecipesRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Ids of recipes carrying any of the given tag slugs.
fn tagged_with(slugs: &[String]) -> SelectStatement {
    Query::select()
        .column((recipe_tag::Entity, recipe_tag::Column::RecipeId))
        .from(recipe_tag::Entity)
        .inner_join(
            tag::Entity,
            Expr::col((tag::Entity, tag::Column::Id))
                .equals((recipe_tag::Entity, recipe_tag::Column::TagId)),
        )
        .and_where(Expr::col((tag::Entity, tag::Column::Slug)).is_in(slugs.iter().cloned()))
        .to_owned()
}

/// Ids of recipes the user has marked with `kind`.
fn marked_by(kind: MarkKind, user_id: UserId) -> SelectStatement {
    Query::select()
        .column((recipe_mark::Entity, recipe_mark::Column::RecipeId))
        .from(recipe_mark::Entity)
        .and_where(recipe_mark::Column::Kind.eq(kind.as_str()))
        .and_where(recipe_mark::Column::UserId.eq(user_id))
        .to_owned()
}

fn apply_mark_filter(
    query: Select<RecipeEntity>,
    kind: MarkKind,
    wanted: Option<bool>,
    viewer: Option<UserId>,
) -> Select<RecipeEntity> {
    match (wanted, viewer) {
        (Some(true), Some(user_id)) => {
            query.filter(recipe::Column::Id.in_subquery(marked_by(kind, user_id)))
        }
        (Some(false), Some(user_id)) => {
            query.filter(recipe::Column::Id.not_in_subquery(marked_by(kind, user_id)))
        }
        _ => query,
    }
}

async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    recipe_id: RecipeId,
    tags: &[TagId],
    ingredients: &[IngredientAmount],
) -> Result<(), DomainError> {
    if !tags.is_empty() {
        let rows = tags.iter().map(|tag_id| recipe_tag::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        });
        recipe_tag::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| db_err(&e))?;
    }
    if !ingredients.is_empty() {
        let rows = ingredients.iter().map(|entry| recipe_ingredient::ActiveModel {
            id: NotSet,
            recipe_id: Set(recipe_id),
            ingredient_id: Set(entry.id),
            amount: Set(entry.amount),
        });
        recipe_ingredient::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| db_err(&e))?;
    }
    Ok(())
}

#[async_trait]
impl RecipesRepository for SeaOrmRecipesRepository {
    async fn get(&self, id: RecipeId) -> Result<Option<Recipe>, DomainError> {
        let row = RecipeEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Recipe>, DomainError> {
        let row = RecipeEntity::find()
            .filter(recipe::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(row.map(Into::into))
    }

    async fn list_page(
        &self,
        filter: &RecipeFilter,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Page<Recipe>, DomainError> {
        let mut query = RecipeEntity::find();
        if let Some(author_id) = filter.author {
            query = query.filter(recipe::Column::AuthorId.eq(author_id));
        }
        if !filter.tags.is_empty() {
            query = query.filter(recipe::Column::Id.in_subquery(tagged_with(&filter.tags)));
        }
        query = apply_mark_filter(query, MarkKind::Favorite, filter.is_favorited, viewer);
        query = apply_mark_filter(
            query,
            MarkKind::ShoppingCart,
            filter.is_in_shopping_cart,
            viewer,
        );

        let count = query.clone().count(&self.db).await.map_err(|e| db_err(&e))?;
        let rows = query
            .order_by_desc(recipe::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            count,
            page,
        ))
    }

    async fn create(&self, author_id: UserId, new: &NewRecipe) -> Result<Recipe, DomainError> {
        let txn = self.db.begin().await.map_err(|e| db_err(&e))?;
        let model = recipe::ActiveModel {
            id: NotSet,
            author_id: Set(author_id),
            name: Set(new.name.clone()),
            text: Set(new.text.clone()),
            image: Set(new.image.clone()),
            cooking_time: Set(new.cooking_time),
        }
        .insert(&txn)
        .await
        .map_err(|e| db_err(&e))?;
        insert_links(&txn, model.id, &new.tags, &new.ingredients).await?;
        txn.commit().await.map_err(|e| db_err(&e))?;
        Ok(model.into())
    }

    async fn update(&self, id: RecipeId, patch: &RecipePatch) -> Result<Recipe, DomainError> {
        let txn = self.db.begin().await.map_err(|e| db_err(&e))?;

        let mut active = recipe::ActiveModel {
            id: Unchanged(id),
            ..<recipe::ActiveModel as Default>::default()
        };
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(text) = &patch.text {
            active.text = Set(text.clone());
        }
        if let Some(image) = &patch.image {
            active.image = Set(Some(image.clone()));
        }
        if let Some(cooking_time) = patch.cooking_time {
            active.cooking_time = Set(cooking_time);
        }
        if active.is_changed() {
            active.update(&txn).await.map_err(|e| db_err(&e))?;
        }

        if let Some(tags) = &patch.tags {
            recipe_tag::Entity::delete_many()
                .filter(recipe_tag::Column::RecipeId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| db_err(&e))?;
            insert_links(&txn, id, tags, &[]).await?;
        }
        if let Some(ingredients) = &patch.ingredients {
            recipe_ingredient::Entity::delete_many()
                .filter(recipe_ingredient::Column::RecipeId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| db_err(&e))?;
            insert_links(&txn, id, &[], ingredients).await?;
        }

        let model = RecipeEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| db_err(&e))?
            .ok_or_else(|| DomainError::not_found("Recipe", &id))?;
        txn.commit().await.map_err(|e| db_err(&e))?;
        Ok(model.into())
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, DomainError> {
        let txn = self.db.begin().await.map_err(|e| db_err(&e))?;
        recipe_mark::Entity::delete_many()
            .filter(recipe_mark::Column::RecipeId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        recipe_tag::Entity::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        let result = RecipeEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| db_err(&e))?;
        txn.commit().await.map_err(|e| db_err(&e))?;
        Ok(result.rows_affected > 0)
    }

    async fn tags_for(&self, recipe_ids: &[RecipeId]) -> Result<Vec<(RecipeId, Tag)>, DomainError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = recipe_tag::Entity::find()
            .filter(recipe_tag::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .find_also_related(tag::Entity)
            .order_by_asc(recipe_tag::Column::TagId)
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(rows
            .into_iter()
            .filter_map(|(link, tag)| tag.map(|t| (link.recipe_id, t.into())))
            .collect())
    }

    async fn ingredients_for(
        &self,
        recipe_ids: &[RecipeId],
    ) -> Result<Vec<(RecipeId, RecipeIngredient)>, DomainError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = recipe_ingredient::Entity::find()
            .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .find_also_related(IngredientEntity)
            .order_by_asc(recipe_ingredient::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(rows
            .into_iter()
            .filter_map(|(entry, ingredient)| {
                ingredient.map(|i| (entry.recipe_id, join_ingredient(entry.amount, i)))
            })
            .collect())
    }

    async fn list_by_author(
        &self,
        author_id: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, DomainError> {
        let mut query = RecipeEntity::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .order_by_desc(recipe::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit.min(PageRequest::MAX_ROWS));
        }
        let rows = query.all(&self.db).await.map_err(|e| db_err(&e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_author(&self, author_id: UserId) -> Result<u64, DomainError> {
        RecipeEntity::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(|e| db_err(&e))
    }
}
