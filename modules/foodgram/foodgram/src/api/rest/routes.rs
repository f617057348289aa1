//! Route table of the REST surface.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Router, middleware};

use super::auth::authenticate;
use super::error::problem_context_middleware;
use super::handlers::{catalog, recipes, shopping, users};
use super::openapi::openapi_json;
use super::problem::Problem;
use crate::domain::service::AppServices;

/// Every `/api` route, with token authentication and problem decoration
/// applied.
pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/api/tags/", get(catalog::list_tags))
        .route("/api/tags/{id}/", get(catalog::get_tag))
        .route("/api/ingredients/", get(catalog::list_ingredients))
        .route("/api/ingredients/{id}/", get(catalog::get_ingredient))
        .route(
            "/api/recipes/",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipes/download_shopping_cart/",
            get(shopping::download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}/",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite/",
            post(recipes::add_favorite).delete(recipes::remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
        .route("/api/users/", get(users::list_users))
        .route("/api/users/me/", get(users::me))
        .route("/api/users/subscriptions/", get(users::subscriptions))
        .route("/api/users/{id}/", get(users::get_user))
        .route(
            "/api/users/{id}/subscribe/",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/api/openapi.json", get(openapi_json))
        .fallback(not_found)
        .layer(Extension(services.clone()))
        .layer(middleware::from_fn_with_state(services, authenticate))
        .layer(middleware::from_fn(problem_context_middleware))
}

async fn not_found() -> Problem {
    Problem::new(StatusCode::NOT_FOUND, "Not Found", "No resource matches this path")
        .with_code("NOT_FOUND")
}
