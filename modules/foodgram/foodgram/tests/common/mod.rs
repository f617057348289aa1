#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Shared setup for foodgram integration tests: an in-memory SQLite
//! database with migrations applied and a small seeded catalog.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use foodgram::domain::service::AppServices;
use foodgram::{
    FoodgramConfig, FoodgramModule, Ingredient, IngredientAmount, NewIngredient, NewRecipe, NewTag,
    NewUser, Role, SecurityContext, Tag, User,
};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use tower::ServiceExt;

pub struct TestApp {
    pub services: Arc<AppServices>,
    pub router: Router,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

pub struct TestUser {
    pub user: User,
    pub token: String,
    pub ctx: SecurityContext,
}

pub async fn app() -> TestApp {
    app_with(FoodgramConfig::default()).await
}

pub async fn app_with(config: FoodgramConfig) -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");

    let module = FoodgramModule::new(db, config);
    module.migrate().await.expect("migrations");
    let services = module.services();

    services
        .catalog
        .load_tags(vec![
            new_tag("Breakfast", "#E26C2D", "breakfast"),
            new_tag("Lunch", "#49B64E", "lunch"),
            new_tag("Dinner", "#8775D2", "dinner"),
        ])
        .await
        .unwrap();
    services
        .catalog
        .load_ingredients(vec![
            new_ingredient("egg", "pcs"),
            new_ingredient("flour", "g"),
            new_ingredient("milk", "ml"),
            new_ingredient("sugar", "g"),
            new_ingredient("sugar", "tbsp"),
        ])
        .await
        .unwrap();

    let tags = services.catalog.list_tags().await.unwrap();
    let ingredients = services.catalog.list_ingredients(None).await.unwrap();
    TestApp {
        router: module.router(),
        services,
        tags,
        ingredients,
    }
}

fn new_tag(name: &str, color: &str, slug: &str) -> NewTag {
    NewTag {
        name: name.to_owned(),
        color: Some(color.to_owned()),
        slug: slug.to_owned(),
    }
}

fn new_ingredient(name: &str, unit: &str) -> NewIngredient {
    NewIngredient {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

impl TestApp {
    pub fn tag(&self, slug: &str) -> i32 {
        self.tags.iter().find(|t| t.slug == slug).unwrap().id
    }

    pub fn ingredient(&self, name: &str, unit: &str) -> i32 {
        self.ingredients
            .iter()
            .find(|i| i.name == name && i.measurement_unit == unit)
            .unwrap()
            .id
    }

    pub async fn user(&self, username: &str) -> TestUser {
        self.user_with_role(username, Role::User).await
    }

    pub async fn user_with_role(&self, username: &str, role: Role) -> TestUser {
        let user = self
            .services
            .users
            .create_user(NewUser {
                email: format!("{username}@example.com"),
                username: username.to_owned(),
                first_name: username.to_owned(),
                last_name: "Cook".to_owned(),
                role,
            })
            .await
            .unwrap();
        let (_, token) = self.services.users.issue_token(&user.email).await.unwrap();
        TestUser {
            ctx: SecurityContext::for_user(&user),
            user,
            token,
        }
    }

    /// A recipe with the given ingredients as `(name, unit, amount)`.
    pub fn recipe(&self, name: &str, tags: &[&str], ingredients: &[(&str, &str, i32)]) -> NewRecipe {
        NewRecipe {
            name: name.to_owned(),
            text: format!("How to cook {name}"),
            image: None,
            cooking_time: 15,
            tags: tags.iter().map(|slug| self.tag(slug)).collect(),
            ingredients: ingredients
                .iter()
                .map(|(n, unit, amount)| IngredientAmount {
                    id: self.ingredient(n, unit),
                    amount: *amount,
                })
                .collect(),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
