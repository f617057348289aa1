use std::collections::HashSet;

use async_trait::async_trait;
use foodgram_sdk::{NewUser, Page, PageRequest, User, UserId};

use crate::domain::error::DomainError;

/// Repository trait for accounts, access tokens and follow relations.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    async fn list_page(&self, page: PageRequest) -> Result<Page<User>, DomainError>;

    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Store the digest of a freshly issued access token.
    async fn store_token(&self, user_id: UserId, digest: &str) -> Result<(), DomainError>;

    async fn find_by_token(&self, digest: &str) -> Result<Option<User>, DomainError>;

    /// Record that `user_id` follows `author_id`. Returns `false` when the
    /// relation already existed.
    async fn follow(&self, user_id: UserId, author_id: UserId) -> Result<bool, DomainError>;

    /// Returns `false` when there was no relation to remove.
    async fn unfollow(&self, user_id: UserId, author_id: UserId) -> Result<bool, DomainError>;

    /// Which of `author_ids` the user follows.
    async fn followed_among(
        &self,
        user_id: UserId,
        author_ids: &[UserId],
    ) -> Result<HashSet<UserId>, DomainError>;

    /// Authors the user follows, in the order they were followed.
    async fn following_page(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, DomainError>;
}
