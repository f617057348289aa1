use std::collections::HashSet;

use async_trait::async_trait;
use foodgram_sdk::{RecipeId, UserId};

use crate::domain::error::DomainError;

/// The two per-user recipe lists backed by the same storage shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Favorite,
    ShoppingCart,
}

impl MarkKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MarkKind::Favorite => "favorite",
            MarkKind::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable list name for messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MarkKind::Favorite => "favorites",
            MarkKind::ShoppingCart => "shopping cart",
        }
    }

    /// Entity name used in not-found errors.
    #[must_use]
    pub fn entity(self) -> &'static str {
        match self {
            MarkKind::Favorite => "Favorite",
            MarkKind::ShoppingCart => "Shopping cart entry",
        }
    }
}

/// Repository trait for favorites and shopping cart entries.
///
/// At most one entry exists per `(kind, user, recipe)`.
#[async_trait]
pub trait RecipeMarksRepository: Send + Sync {
    /// Insert an entry. Returns `false` when it already existed.
    async fn add(
        &self,
        kind: MarkKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, DomainError>;

    /// Remove an entry. Returns `false` when there was nothing to remove.
    async fn remove(
        &self,
        kind: MarkKind,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, DomainError>;

    /// Which of `recipe_ids` the user has marked.
    async fn marked_among(
        &self,
        kind: MarkKind,
        user_id: UserId,
        recipe_ids: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, DomainError>;

    /// Every recipe the user has marked, in the order they were added.
    async fn recipes_of(&self, kind: MarkKind, user_id: UserId)
    -> Result<Vec<RecipeId>, DomainError>;
}
