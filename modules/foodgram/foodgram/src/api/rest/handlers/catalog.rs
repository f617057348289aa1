use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;

use crate::api::rest::dto::{IngredientDto, TagDto};
use crate::api::rest::error::ApiResult;
use crate::api::rest::extract::{PathId, QueryParams};
use crate::api::rest::problem::Problem;
use crate::domain::service::AppServices;

/// GET `/api/tags/` - All tags, unpaginated.
#[utoipa::path(
    get,
    path = "/api/tags/",
    tag = "tags",
    responses((status = 200, description = "All tags", body = [TagDto]))
)]
#[tracing::instrument(skip(svc))]
pub async fn list_tags(Extension(svc): Extension<Arc<AppServices>>) -> ApiResult<Json<Vec<TagDto>>> {
    let tags = svc.catalog.list_tags().await?;
    Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

/// GET `/api/tags/{id}/`
#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagDto),
        (status = 404, description = "Unknown tag", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc))]
pub async fn get_tag(
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<Json<TagDto>> {
    let tag = svc.catalog.get_tag(id).await?;
    Ok(Json(tag.into()))
}

/// GET `/api/ingredients/?name=` - Ingredients, optionally filtered by a
/// case-insensitive name prefix.
#[utoipa::path(
    get,
    path = "/api/ingredients/",
    tag = "ingredients",
    params(("name" = Option<String>, Query, description = "Name prefix, case-insensitive")),
    responses((status = 200, description = "Matching ingredients", body = [IngredientDto]))
)]
#[tracing::instrument(skip(svc, query))]
pub async fn list_ingredients(
    Extension(svc): Extension<Arc<AppServices>>,
    query: QueryParams,
) -> ApiResult<Json<Vec<IngredientDto>>> {
    let ingredients = svc.catalog.list_ingredients(query.get("name")).await?;
    Ok(Json(
        ingredients.into_iter().map(IngredientDto::from).collect(),
    ))
}

/// GET `/api/ingredients/{id}/`
#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    tag = "ingredients",
    params(("id" = i32, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientDto),
        (status = 404, description = "Unknown ingredient", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc))]
pub async fn get_ingredient(
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<Json<IngredientDto>> {
    let ingredient = svc.catalog.get_ingredient(id).await?;
    Ok(Json(ingredient.into()))
}
