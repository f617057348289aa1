//! `SeaORM` repository for tags and ingredients.

use async_trait::async_trait;
use foodgram_sdk::{Ingredient, IngredientId, NewIngredient, NewTag, Tag, TagId};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::db::{db_err, escape_like};
use super::entity::{IngredientEntity, TagEntity, ingredient, tag};
use super::mapper::{new_ingredient_to_active_model, new_tag_to_active_model};
use crate::domain::error::DomainError;
use crate::domain::repos::CatalogRepository;

pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, DomainError> {
        let rows = TagEntity::find()
            .order_by_desc(tag::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_tag(&self, id: TagId) -> Result<Option<Tag>, DomainError> {
        let row = TagEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(row.map(Into::into))
    }

    async fn tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = TagEntity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_or_create_tag(&self, new_tag: NewTag) -> Result<(Tag, bool), DomainError> {
        if let Some(existing) = TagEntity::find()
            .filter(tag::Column::Slug.eq(new_tag.slug.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?
        {
            return Ok((existing.into(), false));
        }
        let created = TagEntity::insert(new_tag_to_active_model(new_tag))
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok((created.into(), true))
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, DomainError> {
        let mut query = IngredientEntity::find().order_by_desc(ingredient::Column::Id);
        if let Some(prefix) = name_prefix {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    ingredient::Entity,
                    ingredient::Column::Name,
                ))))
                .like(LikeExpr::new(pattern).escape('\\')),
            );
        }
        let rows = query.all(&self.db).await.map_err(|e| db_err(&e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, DomainError> {
        let row = IngredientEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(row.map(Into::into))
    }

    async fn ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = IngredientEntity::find()
            .filter(ingredient::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_or_create_ingredient(
        &self,
        new_ingredient: NewIngredient,
    ) -> Result<(Ingredient, bool), DomainError> {
        if let Some(existing) = IngredientEntity::find()
            .filter(ingredient::Column::Name.eq(new_ingredient.name.as_str()))
            .filter(ingredient::Column::MeasurementUnit.eq(new_ingredient.measurement_unit.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?
        {
            return Ok((existing.into(), false));
        }
        let created = IngredientEntity::insert(new_ingredient_to_active_model(new_ingredient))
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok((created.into(), true))
    }
}
