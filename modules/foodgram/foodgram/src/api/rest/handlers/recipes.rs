use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::rest::auth::Authz;
use crate::api::rest::dto::{
    CreateRecipeRequest, PageDto, RecipeDto, RecipeShortDto, UpdateRecipeRequest,
};
use crate::api::rest::error::ApiResult;
use crate::api::rest::extract::{JsonBody, PathId, QueryParams};
use crate::api::rest::pagination::page_dto;
use crate::api::rest::problem::Problem;
use crate::domain::repos::MarkKind;
use crate::domain::service::AppServices;
use crate::security::SecurityContext;

/// GET `/api/recipes/` - Filtered page of recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/recipes/",
    tag = "recipes",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("author" = Option<i32>, Query, description = "Author id"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs, any of"),
        ("is_favorited" = Option<u8>, Query, description = "1 or 0"),
        ("is_in_shopping_cart" = Option<u8>, Query, description = "1 or 0")
    ),
    responses(
        (status = 200, description = "Page of recipes", body = PageDto<RecipeDto>),
        (status = 400, description = "Malformed filter", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc, query))]
pub async fn list_recipes(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    query: QueryParams,
) -> ApiResult<Json<PageDto<RecipeDto>>> {
    let filter = query.recipe_filter()?;
    let page = query.page(&svc.config)?;
    let recipes = svc.recipes.list(&ctx, filter, page).await?;
    Ok(Json(page_dto(recipes, &query)))
}

/// POST `/api/recipes/`
#[utoipa::path(
    post,
    path = "/api/recipes/",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeDto),
        (status = 401, description = "Not logged in", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Name already taken", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Invalid recipe", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc, req), fields(name = %req.name))]
pub async fn create_recipe(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    JsonBody(req): JsonBody<CreateRecipeRequest>,
) -> ApiResult<impl IntoResponse> {
    let recipe = svc.recipes.create(&ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(RecipeDto::from(recipe))))
}

/// GET `/api/recipes/{id}/`
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeDto),
        (status = 404, description = "Unknown recipe", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn get_recipe(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<Json<RecipeDto>> {
    let recipe = svc.recipes.get(&ctx, id).await?;
    Ok(Json(recipe.into()))
}

/// PATCH `/api/recipes/{id}/` - Partial update; `tags` and `ingredients`
/// replace the whole set when present.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDto),
        (status = 403, description = "Not the author", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Unknown recipe", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Invalid recipe", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc, req))]
pub async fn update_recipe(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateRecipeRequest>,
) -> ApiResult<Json<RecipeDto>> {
    let recipe = svc.recipes.update(&ctx, id, req.into()).await?;
    Ok(Json(recipe.into()))
}

/// DELETE `/api/recipes/{id}/`
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 403, description = "Not the author", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Unknown recipe", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn delete_recipe(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    svc.recipes.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark(
    svc: &AppServices,
    ctx: &SecurityContext,
    kind: MarkKind,
    id: i32,
) -> ApiResult<(StatusCode, Json<RecipeShortDto>)> {
    let recipe = svc.marks.add(ctx, kind, id).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

async fn unmark(
    svc: &AppServices,
    ctx: &SecurityContext,
    kind: MarkKind,
    id: i32,
) -> ApiResult<StatusCode> {
    svc.marks.remove(ctx, kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/api/recipes/{id}/favorite/`
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to favorites", body = RecipeShortDto),
        (status = 400, description = "Already a favorite", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Unknown recipe", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn add_favorite(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<(StatusCode, Json<RecipeShortDto>)> {
    mark(&svc, &ctx, MarkKind::Favorite, id).await
}

/// DELETE `/api/recipes/{id}/favorite/`
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 404, description = "Unknown recipe or not a favorite", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn remove_favorite(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    unmark(&svc, &ctx, MarkKind::Favorite, id).await
}

/// POST `/api/recipes/{id}/shopping_cart/`
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to the shopping cart", body = RecipeShortDto),
        (status = 400, description = "Already in the cart", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Unknown recipe", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn add_to_cart(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<(StatusCode, Json<RecipeShortDto>)> {
    mark(&svc, &ctx, MarkKind::ShoppingCart, id).await
}

/// DELETE `/api/recipes/{id}/shopping_cart/`
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    tag = "recipes",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 404, description = "Unknown recipe or not in the cart", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn remove_from_cart(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    unmark(&svc, &ctx, MarkKind::ShoppingCart, id).await
}
