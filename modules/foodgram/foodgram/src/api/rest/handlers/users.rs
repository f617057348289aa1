use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;

use crate::api::rest::auth::Authz;
use crate::api::rest::dto::{PageDto, SubscriptionDto, UserDto};
use crate::api::rest::error::ApiResult;
use crate::api::rest::extract::{PathId, QueryParams};
use crate::api::rest::pagination::page_dto;
use crate::api::rest::problem::Problem;
use crate::domain::service::AppServices;

/// GET `/api/users/`
#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "users",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Page of users", body = PageDto<UserDto>))
)]
#[tracing::instrument(skip(ctx, svc, query))]
pub async fn list_users(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    query: QueryParams,
) -> ApiResult<Json<PageDto<UserDto>>> {
    let page = query.page(&svc.config)?;
    let users = svc.users.list(&ctx, page).await?;
    Ok(Json(page_dto(users, &query)))
}

/// GET `/api/users/{id}/`
#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = UserDto),
        (status = 404, description = "Unknown user", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn get_user(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<Json<UserDto>> {
    let user = svc.users.get(&ctx, id).await?;
    Ok(Json(user.into()))
}

/// GET `/api/users/me/`
#[utoipa::path(
    get,
    path = "/api/users/me/",
    tag = "users",
    responses(
        (status = 200, description = "The caller's profile", body = UserDto),
        (status = 401, description = "Not logged in", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn me(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.users.me(&ctx).await?;
    Ok(Json(user.into()))
}

/// GET `/api/users/subscriptions/` - Followed authors with recipe previews.
#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    tag = "users",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("recipes_limit" = Option<u64>, Query, description = "Recipes previewed per author")
    ),
    responses(
        (status = 200, description = "Page of followed authors", body = PageDto<SubscriptionDto>),
        (status = 401, description = "Not logged in", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc, query))]
pub async fn subscriptions(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    query: QueryParams,
) -> ApiResult<Json<PageDto<SubscriptionDto>>> {
    let page = query.page(&svc.config)?;
    let recipes_limit = query.number::<u64>("recipes_limit")?;
    let authors = svc.users.subscriptions(&ctx, page, recipes_limit).await?;
    Ok(Json(page_dto(authors, &query)))
}

/// POST `/api/users/{id}/subscribe/`
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author id"),
        ("recipes_limit" = Option<u64>, Query, description = "Recipes previewed")
    ),
    responses(
        (status = 201, description = "Now following", body = SubscriptionDto),
        (status = 400, description = "Self-subscription or already following", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Unknown author", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc, query))]
pub async fn subscribe(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
    query: QueryParams,
) -> ApiResult<(StatusCode, Json<SubscriptionDto>)> {
    let recipes_limit = query.number::<u64>("recipes_limit")?;
    let subscription = svc.users.subscribe(&ctx, id, recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(subscription.into())))
}

/// DELETE `/api/users/{id}/subscribe/`
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 204, description = "No longer following"),
        (status = 400, description = "Not following", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Unknown author", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc))]
pub async fn unsubscribe(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    svc.users.unsubscribe(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
