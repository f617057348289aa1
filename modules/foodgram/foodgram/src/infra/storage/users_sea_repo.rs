//! `SeaORM` repository for accounts, tokens and follows.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use foodgram_sdk::{NewUser, Page, PageRequest, User, UserId};
use sea_orm::sea_query::OnConflict;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::db::db_err;
use super::entity::{UserEntity, auth_token, follow, user};
use crate::domain::error::DomainError;
use crate::domain::repos::UsersRepository;

pub struct SeaOrmUsersRepository {
    db: DatabaseConnection,
}

impl SeaOrmUsersRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(row.map(Into::into))
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(row.map(Into::into))
    }

    async fn list_page(&self, page: PageRequest) -> Result<Page<User>, DomainError> {
        let count = UserEntity::find().count(&self.db).await.map_err(|e| db_err(&e))?;
        let rows = UserEntity::find()
            .order_by_asc(user::Column::Id)
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

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let model = user::ActiveModel {
            id: NotSet,
            email: Set(new_user.email),
            username: Set(new_user.username),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            role: Set(new_user.role.as_str().to_owned()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| db_err(&e))?;
        Ok(model.into())
    }

    async fn store_token(&self, user_id: UserId, digest: &str) -> Result<(), DomainError> {
        auth_token::ActiveModel {
            digest: Set(digest.to_owned()),
            user_id: Set(user_id),
        }
        .insert(&self.db)
        .await
        .map_err(|e| db_err(&e))?;
        Ok(())
    }

    async fn find_by_token(&self, digest: &str) -> Result<Option<User>, DomainError> {
        let row = auth_token::Entity::find_by_id(digest.to_owned())
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(row.and_then(|(_, user)| user).map(Into::into))
    }

    async fn follow(&self, user_id: UserId, author_id: UserId) -> Result<bool, DomainError> {
        let model = follow::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            author_id: Set(author_id),
        };
        let inserted = follow::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([follow::Column::UserId, follow::Column::AuthorId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(inserted > 0)
    }

    async fn unfollow(&self, user_id: UserId, author_id: UserId) -> Result<bool, DomainError> {
        let result = follow::Entity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(result.rows_affected > 0)
    }

    async fn followed_among(
        &self,
        user_id: UserId,
        author_ids: &[UserId],
    ) -> Result<HashSet<UserId>, DomainError> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<UserId> = follow::Entity::find()
            .select_only()
            .column(follow::Column::AuthorId)
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.is_in(author_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;
        Ok(ids.into_iter().collect())
    }

    async fn following_page(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, DomainError> {
        let query = follow::Entity::find().filter(follow::Column::UserId.eq(user_id));
        let count = query.clone().count(&self.db).await.map_err(|e| db_err(&e))?;
        let author_ids: Vec<UserId> = query
            .select_only()
            .column(follow::Column::AuthorId)
            .order_by_asc(follow::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| db_err(&e))?;

        let mut by_id: HashMap<UserId, User> = self
            .get_many(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let items = author_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();
        Ok(Page::new(items, count, page))
    }
}
