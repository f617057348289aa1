use std::collections::HashSet;
use std::sync::Arc;

use foodgram_sdk::{Author, NewUser, Page, PageRequest, Subscription, User, UserId};
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::FoodgramConfig;
use crate::domain::error::{DomainError, Violation};
use crate::domain::repos::{RecipesRepository, UsersRepository};
use crate::security::SecurityContext;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_USERNAME_LENGTH: usize = 150;
const RESERVED_USERNAMES: &[&str] = &["me"];

/// Hex-encoded SHA-256 of an access token. Only digests are stored.
#[must_use]
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Accounts, tokens and subscriptions.
pub struct UsersService {
    users: Arc<dyn UsersRepository>,
    recipes: Arc<dyn RecipesRepository>,
    config: FoodgramConfig,
}

impl UsersService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UsersRepository>,
        recipes: Arc<dyn RecipesRepository>,
        config: FoodgramConfig,
    ) -> Self {
        Self {
            users,
            recipes,
            config,
        }
    }

    /// Resolve a presented token to a security context.
    ///
    /// # Errors
    /// `InvalidToken` when no account holds the token.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<SecurityContext, DomainError> {
        let Some(user) = self.users.find_by_token(&token_digest(token)).await? else {
            warn!("rejected unknown access token");
            return Err(DomainError::InvalidToken);
        };
        Ok(SecurityContext::for_user(&user))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: NewUser) -> Result<User, DomainError> {
        let user = NewUser {
            email: user.email.trim().to_lowercase(),
            username: user.username.trim().to_owned(),
            ..user
        };
        validate_new_user(&user)?;
        if self.users.find_by_email(&user.email).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "a user with email '{}' already exists",
                user.email
            )));
        }
        if self.users.find_by_username(&user.username).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "a user named '{}' already exists",
                user.username
            )));
        }
        let created = self.users.create(user).await?;
        info!(user_id = created.id, role = created.role.as_str(), "user created");
        Ok(created)
    }

    /// Issue a fresh access token for the account with `email`. The plain
    /// token is returned once and never stored.
    #[instrument(skip(self))]
    pub async fn issue_token(&self, email: &str) -> Result<(User, String), DomainError> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found("User", &email))?;
        let token = Uuid::new_v4().simple().to_string();
        self.users.store_token(user.id, &token_digest(&token)).await?;
        info!(user_id = user.id, "access token issued");
        Ok((user, token))
    }

    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        page: PageRequest,
    ) -> Result<Page<Author>, DomainError> {
        let page = self.clamp(page);
        let users = self.users.list_page(page).await?;
        let ids: Vec<UserId> = users.items.iter().map(|u| u.id).collect();
        let followed = match ctx.subject_id() {
            Some(viewer) => self.users.followed_among(viewer, &ids).await?,
            None => HashSet::new(),
        };
        Ok(users.map_items(|user| Author {
            is_subscribed: followed.contains(&user.id),
            user,
        }))
    }

    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &SecurityContext, id: UserId) -> Result<Author, DomainError> {
        let user = self.load(id).await?;
        self.author_for(ctx, user).await
    }

    /// The caller's own profile.
    #[instrument(skip(self, ctx))]
    pub async fn me(&self, ctx: &SecurityContext) -> Result<Author, DomainError> {
        let id = ctx.require_subject()?;
        let user = self.load(id).await?;
        Ok(Author {
            user,
            is_subscribed: false,
        })
    }

    #[instrument(skip(self, ctx))]
    pub async fn subscribe(
        &self,
        ctx: &SecurityContext,
        author_id: UserId,
        recipes_limit: Option<u64>,
    ) -> Result<Subscription, DomainError> {
        let user_id = ctx.require_subject()?;
        let author = self.load(author_id).await?;
        if user_id == author_id {
            return Err(DomainError::bad_request("You cannot subscribe to yourself"));
        }
        if !self.users.follow(user_id, author_id).await? {
            return Err(DomainError::bad_request(
                "You are already subscribed to this author",
            ));
        }
        info!(user_id, author_id, "subscribed");
        self.subscription(author, recipes_limit).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn unsubscribe(
        &self,
        ctx: &SecurityContext,
        author_id: UserId,
    ) -> Result<(), DomainError> {
        let user_id = ctx.require_subject()?;
        self.load(author_id).await?;
        if !self.users.unfollow(user_id, author_id).await? {
            return Err(DomainError::bad_request(
                "You are not subscribed to this author",
            ));
        }
        info!(user_id, author_id, "unsubscribed");
        Ok(())
    }

    /// Authors the caller follows, each with a preview of their recipes.
    #[instrument(skip(self, ctx))]
    pub async fn subscriptions(
        &self,
        ctx: &SecurityContext,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Page<Subscription>, DomainError> {
        let user_id = ctx.require_subject()?;
        let authors = self.users.following_page(user_id, self.clamp(page)).await?;
        let Page {
            items,
            count,
            request,
        } = authors;
        let mut out = Vec::with_capacity(items.len());
        for author in items {
            out.push(self.subscription(author, recipes_limit).await?);
        }
        Ok(Page::new(out, count, request))
    }

    async fn subscription(
        &self,
        author: User,
        recipes_limit: Option<u64>,
    ) -> Result<Subscription, DomainError> {
        let limit = recipes_limit.or(self.config.default_recipes_limit);
        let recipes = self.recipes.list_by_author(author.id, limit).await?;
        let recipes_count = self.recipes.count_by_author(author.id).await?;
        Ok(Subscription {
            author: Author {
                user: author,
                is_subscribed: true,
            },
            recipes,
            recipes_count,
        })
    }

    async fn author_for(&self, ctx: &SecurityContext, user: User) -> Result<Author, DomainError> {
        let is_subscribed = match ctx.subject_id() {
            Some(viewer) => self
                .users
                .followed_among(viewer, &[user.id])
                .await?
                .contains(&user.id),
            None => false,
        };
        Ok(Author {
            user,
            is_subscribed,
        })
    }

    async fn load(&self, id: UserId) -> Result<User, DomainError> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", &id))
    }

    fn clamp(&self, page: PageRequest) -> PageRequest {
        PageRequest::new(page.page, page.limit.min(self.config.max_page_size))
    }
}

fn validate_new_user(user: &NewUser) -> Result<(), DomainError> {
    let mut violations = Vec::new();
    if user.email.is_empty() {
        violations.push(Violation::new("email", "must not be empty"));
    } else if user.email.len() > MAX_EMAIL_LENGTH {
        violations.push(Violation::new(
            "email",
            format!("must be at most {MAX_EMAIL_LENGTH} characters"),
        ));
    } else if !looks_like_email(&user.email) {
        violations.push(Violation::new("email", "must be a valid email address"));
    }

    if user.username.is_empty() {
        violations.push(Violation::new("username", "must not be empty"));
    } else if user.username.chars().count() > MAX_USERNAME_LENGTH {
        violations.push(Violation::new(
            "username",
            format!("must be at most {MAX_USERNAME_LENGTH} characters"),
        ));
    } else if RESERVED_USERNAMES.contains(&user.username.to_lowercase().as_str()) {
        violations.push(Violation::new("username", "is reserved"));
    } else if !user
        .username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
    {
        violations.push(Violation::new(
            "username",
            "may contain only letters, digits and . @ + - _",
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DomainError::violations(violations))
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, username: &str) -> NewUser {
        NewUser {
            email: email.to_owned(),
            username: username.to_owned(),
            ..NewUser::default()
        }
    }

    #[test]
    fn digest_is_stable_hex() {
        let digest = token_digest("abc");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn valid_user_passes() {
        assert!(validate_new_user(&new_user("cook@example.com", "cook.42")).is_ok());
    }

    #[test]
    fn reserved_and_malformed_values_are_rejected() {
        let err = validate_new_user(&new_user("not-an-email", "me")).unwrap_err();
        match err {
            DomainError::Validation { violations } => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "username"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn username_charset_is_restricted() {
        assert!(validate_new_user(&new_user("a@b.io", "chef mario")).is_err());
        assert!(validate_new_user(&new_user("a@b.io", "chef_mario")).is_ok());
    }
}
