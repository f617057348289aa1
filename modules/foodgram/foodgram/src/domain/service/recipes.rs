use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use foodgram_sdk::{
    Author, IngredientAmount, NewRecipe, Page, PageRequest, Recipe, RecipeDetails, RecipeFilter,
    RecipeId, RecipeIngredient, RecipePatch, Tag, TagId, User, UserId,
};
use tracing::{debug, info, instrument};

use crate::config::FoodgramConfig;
use crate::domain::error::{DomainError, Violation};
use crate::domain::repos::{
    CatalogRepository, MarkKind, RecipeMarksRepository, RecipesRepository, UsersRepository,
};
use crate::security::SecurityContext;

/// Recipe CRUD, listing and the per-caller recipe view.
pub struct RecipesService {
    recipes: Arc<dyn RecipesRepository>,
    catalog: Arc<dyn CatalogRepository>,
    marks: Arc<dyn RecipeMarksRepository>,
    users: Arc<dyn UsersRepository>,
    config: FoodgramConfig,
}

impl RecipesService {
    #[must_use]
    pub fn new(
        recipes: Arc<dyn RecipesRepository>,
        catalog: Arc<dyn CatalogRepository>,
        marks: Arc<dyn RecipeMarksRepository>,
        users: Arc<dyn UsersRepository>,
        config: FoodgramConfig,
    ) -> Self {
        Self {
            recipes,
            catalog,
            marks,
            users,
            config,
        }
    }

    #[instrument(skip(self, ctx, recipe), fields(name = %recipe.name))]
    pub async fn create(
        &self,
        ctx: &SecurityContext,
        recipe: NewRecipe,
    ) -> Result<RecipeDetails, DomainError> {
        let author_id = ctx.require_subject()?;
        let recipe = NewRecipe {
            name: recipe.name.trim().to_owned(),
            ..recipe
        };

        let mut violations = Vec::new();
        self.check_name(&recipe.name, &mut violations);
        check_text(&recipe.text, &mut violations);
        check_cooking_time(recipe.cooking_time, &mut violations);
        self.check_ingredients(&recipe.ingredients, &mut violations)
            .await?;
        self.check_tags(&recipe.tags, &mut violations).await?;
        if !violations.is_empty() {
            return Err(DomainError::violations(violations));
        }
        self.ensure_name_free(&recipe.name, None).await?;

        let created = self.recipes.create(author_id, &recipe).await?;
        info!(recipe_id = created.id, author_id, "recipe created");
        self.details_one(ctx, created).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &SecurityContext, id: RecipeId) -> Result<RecipeDetails, DomainError> {
        let recipe = self.load(id).await?;
        self.details_one(ctx, recipe).await
    }

    /// Filtered page of recipes, newest first.
    ///
    /// Favorite and cart filters only make sense for a known caller: for
    /// anonymous callers `true` yields an empty page and `false` is ignored.
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        mut filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<RecipeDetails>, DomainError> {
        let page = self.clamp(page);
        let viewer = ctx.subject_id();
        if viewer.is_none() {
            if filter.is_favorited == Some(true) || filter.is_in_shopping_cart == Some(true) {
                return Ok(Page::new(Vec::new(), 0, page));
            }
            filter.is_favorited = None;
            filter.is_in_shopping_cart = None;
        }
        filter.tags.retain(|slug| !slug.trim().is_empty());

        let Page {
            items,
            count,
            request,
        } = self.recipes.list_page(&filter, viewer, page).await?;
        let items = self.details(ctx, items).await?;
        Ok(Page::new(items, count, request))
    }

    /// Partial update by the author or an admin.
    #[instrument(skip(self, ctx, patch))]
    pub async fn update(
        &self,
        ctx: &SecurityContext,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeDetails, DomainError> {
        ctx.require_subject()?;
        let existing = self.load(id).await?;
        if !ctx.can_modify(existing.author_id) {
            return Err(DomainError::forbidden(
                "only the author or an admin may change this recipe",
            ));
        }

        let patch = RecipePatch {
            name: patch.name.map(|n| n.trim().to_owned()),
            ..patch
        };
        let mut violations = Vec::new();
        if let Some(name) = &patch.name {
            self.check_name(name, &mut violations);
        }
        if let Some(text) = &patch.text {
            check_text(text, &mut violations);
        }
        if let Some(cooking_time) = patch.cooking_time {
            check_cooking_time(cooking_time, &mut violations);
        }
        if let Some(ingredients) = &patch.ingredients {
            self.check_ingredients(ingredients, &mut violations).await?;
        }
        if let Some(tags) = &patch.tags {
            self.check_tags(tags, &mut violations).await?;
        }
        if !violations.is_empty() {
            return Err(DomainError::violations(violations));
        }
        if let Some(name) = &patch.name {
            self.ensure_name_free(name, Some(id)).await?;
        }

        let updated = self.recipes.update(id, &patch).await?;
        info!(recipe_id = id, "recipe updated");
        self.details_one(ctx, updated).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &SecurityContext, id: RecipeId) -> Result<(), DomainError> {
        ctx.require_subject()?;
        let existing = self.load(id).await?;
        if !ctx.can_modify(existing.author_id) {
            return Err(DomainError::forbidden(
                "only the author or an admin may delete this recipe",
            ));
        }
        if !self.recipes.delete(id).await? {
            return Err(DomainError::not_found("Recipe", &id));
        }
        info!(recipe_id = id, "recipe deleted");
        Ok(())
    }

    async fn load(&self, id: RecipeId) -> Result<Recipe, DomainError> {
        self.recipes
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Recipe", &id))
    }

    fn clamp(&self, page: PageRequest) -> PageRequest {
        PageRequest::new(page.page, page.limit.min(self.config.max_page_size))
    }

    async fn details_one(
        &self,
        ctx: &SecurityContext,
        recipe: Recipe,
    ) -> Result<RecipeDetails, DomainError> {
        let id = recipe.id;
        self.details(ctx, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| DomainError::internal(format!("details of recipe {id} were not built")))
    }

    /// Attach authors, tags, ingredients and the caller's flags to each
    /// recipe, preserving input order. Relations are fetched in bulk.
    pub(crate) async fn details(
        &self,
        ctx: &SecurityContext,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeDetails>, DomainError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<RecipeId> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<UserId> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut tags: HashMap<RecipeId, Vec<Tag>> = HashMap::new();
        for (recipe_id, tag) in self.recipes.tags_for(&ids).await? {
            tags.entry(recipe_id).or_default().push(tag);
        }
        let mut ingredients: HashMap<RecipeId, Vec<RecipeIngredient>> = HashMap::new();
        for (recipe_id, entry) in self.recipes.ingredients_for(&ids).await? {
            ingredients.entry(recipe_id).or_default().push(entry);
        }
        let authors: HashMap<UserId, User> = self
            .users
            .get_many(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let (followed, favorites, cart) = match ctx.subject_id() {
            Some(viewer) => (
                self.users.followed_among(viewer, &author_ids).await?,
                self.marks
                    .marked_among(MarkKind::Favorite, viewer, &ids)
                    .await?,
                self.marks
                    .marked_among(MarkKind::ShoppingCart, viewer, &ids)
                    .await?,
            ),
            None => (HashSet::new(), HashSet::new(), HashSet::new()),
        };

        let mut out = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let user = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                DomainError::internal(format!(
                    "author {} of recipe {} is missing",
                    recipe.author_id, recipe.id
                ))
            })?;
            out.push(RecipeDetails {
                author: Author {
                    is_subscribed: followed.contains(&user.id),
                    user,
                },
                tags: tags.remove(&recipe.id).unwrap_or_default(),
                ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorites.contains(&recipe.id),
                is_in_shopping_cart: cart.contains(&recipe.id),
                recipe,
            });
        }
        debug!(count = out.len(), "recipe details assembled");
        Ok(out)
    }

    fn check_name(&self, name: &str, violations: &mut Vec<Violation>) {
        if name.is_empty() {
            violations.push(Violation::new("name", "must not be empty"));
        } else if name.chars().count() > self.config.max_name_length {
            violations.push(Violation::new(
                "name",
                format!(
                    "must be at most {} characters",
                    self.config.max_name_length
                ),
            ));
        }
    }

    async fn check_ingredients(
        &self,
        entries: &[IngredientAmount],
        violations: &mut Vec<Violation>,
    ) -> Result<(), DomainError> {
        if entries.is_empty() {
            violations.push(Violation::new("ingredients", "must not be empty"));
            return Ok(());
        }
        let mut seen = HashSet::new();
        for entry in entries {
            if entry.amount < 1 {
                violations.push(Violation::new(
                    "ingredients",
                    format!("amount of ingredient {} must be at least 1", entry.id),
                ));
            }
            if !seen.insert(entry.id) {
                violations.push(Violation::new(
                    "ingredients",
                    format!("ingredient {} is listed more than once", entry.id),
                ));
            }
        }

        let ids: Vec<_> = seen.into_iter().collect();
        let known: HashSet<_> = self
            .catalog
            .ingredients_by_ids(&ids)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();
        let mut missing: Vec<_> = ids.into_iter().filter(|id| !known.contains(id)).collect();
        missing.sort_unstable();
        for id in missing {
            violations.push(Violation::new(
                "ingredients",
                format!("ingredient {id} does not exist"),
            ));
        }
        Ok(())
    }

    async fn check_tags(
        &self,
        tag_ids: &[TagId],
        violations: &mut Vec<Violation>,
    ) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for id in tag_ids {
            if !seen.insert(*id) {
                violations.push(Violation::new(
                    "tags",
                    format!("tag {id} is listed more than once"),
                ));
            }
        }
        if seen.is_empty() {
            return Ok(());
        }

        let ids: Vec<_> = seen.into_iter().collect();
        let known: HashSet<_> = self
            .catalog
            .tags_by_ids(&ids)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let mut missing: Vec<_> = ids.into_iter().filter(|id| !known.contains(id)).collect();
        missing.sort_unstable();
        for id in missing {
            violations.push(Violation::new("tags", format!("tag {id} does not exist")));
        }
        Ok(())
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        except: Option<RecipeId>,
    ) -> Result<(), DomainError> {
        match self.recipes.find_by_name(name).await? {
            Some(other) if Some(other.id) != except => Err(DomainError::conflict(format!(
                "a recipe named '{name}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}

fn check_text(text: &str, violations: &mut Vec<Violation>) {
    if text.trim().is_empty() {
        violations.push(Violation::new("text", "must not be empty"));
    }
}

fn check_cooking_time(cooking_time: i32, violations: &mut Vec<Violation>) {
    if cooking_time < 1 {
        violations.push(Violation::new("cooking_time", "must be at least 1"));
    }
}
