//! `OpenAPI` document for the REST surface, served at `/api/openapi.json`.

use axum::Json;
use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

use super::dto::{
    CreateRecipeRequest, IngredientAmountDto, IngredientDto, RecipeDto, RecipeIngredientDto,
    RecipeShortDto, SubscriptionDto, TagDto, UpdateRecipeRequest, UserDto,
};
use super::handlers::{catalog, recipes, shopping, users};
use super::problem::{Problem, ValidationViolation};

#[derive(OpenApi)]
#[openapi(
    info(title = "Foodgram API", description = "Recipes, favorites, shopping cart and subscriptions"),
    paths(
        catalog::list_tags,
        catalog::get_tag,
        catalog::list_ingredients,
        catalog::get_ingredient,
        recipes::list_recipes,
        recipes::create_recipe,
        recipes::get_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        recipes::add_favorite,
        recipes::remove_favorite,
        recipes::add_to_cart,
        recipes::remove_from_cart,
        shopping::download_shopping_cart,
        users::list_users,
        users::get_user,
        users::me,
        users::subscriptions,
        users::subscribe,
        users::unsubscribe,
    ),
    components(schemas(
        TagDto,
        IngredientDto,
        UserDto,
        RecipeDto,
        RecipeShortDto,
        RecipeIngredientDto,
        IngredientAmountDto,
        CreateRecipeRequest,
        UpdateRecipeRequest,
        SubscriptionDto,
        Problem,
        ValidationViolation,
    )),
    modifiers(&TokenAuth),
    tags(
        (name = "tags", description = "Recipe tags"),
        (name = "ingredients", description = "Ingredient catalog"),
        (name = "recipes", description = "Recipes, favorites and the shopping cart"),
        (name = "users", description = "Profiles and subscriptions")
    )
)]
pub struct ApiDoc;

/// `Authorization: Token <key>`
struct TokenAuth;

impl utoipa::Modify for TokenAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <key>",
            ))),
        );
    }
}

/// GET `/api/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/tags/",
            "/api/ingredients/{id}/",
            "/api/recipes/",
            "/api/recipes/{id}/favorite/",
            "/api/recipes/download_shopping_cart/",
            "/api/users/me/",
            "/api/users/{id}/subscribe/",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("token"))
        );
    }
}
