#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests through the full `/api` router.

mod common;

use axum::http::{StatusCode, header};
use common::{body_bytes, body_json, get, request};
use serde_json::json;

#[tokio::test]
async fn tags_and_ingredients_are_public() {
    let app = common::app().await;

    let resp = app.send(get("/api/tags/", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tags = body_json(resp).await;
    assert_eq!(tags.as_array().unwrap().len(), 3);

    let resp = app.send(get("/api/ingredients/?name=SUG", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let units: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["measurement_unit"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(units.len(), 2);
    assert!(units.contains(&"g".to_owned()));
    assert!(units.contains(&"tbsp".to_owned()));

    let id = app.tag("lunch");
    let resp = app.send(get(&format!("/api/tags/{id}/"), None)).await;
    assert_eq!(body_json(resp).await["slug"], "lunch");
}

#[tokio::test]
async fn unknown_ids_are_problem_404s() {
    let app = common::app().await;

    let resp = app.send(get("/api/recipes/777/", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    let problem = body_json(resp).await;
    assert_eq!(problem["status"], 404);
    assert_eq!(problem["code"], "NOT_FOUND");
    assert_eq!(problem["instance"], "/api/recipes/777/");

    let resp = app.send(get("/api/tags/abc/", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.send(get("/api/nothing-here/", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_tokens_are_rejected_and_missing_ones_are_anonymous() {
    let app = common::app().await;

    let resp = app.send(get("/api/recipes/", Some("bogus"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app.send(get("/api/recipes/", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.send(get("/api/users/me/", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn me_returns_the_token_owner() {
    let app = common::app().await;
    let alice = app.user("alice").await;

    let resp = app.send(get("/api/users/me/", Some(&alice.token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["username"], "alice");
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["is_subscribed"], false);
}

#[tokio::test]
async fn recipe_create_update_delete_over_http() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;

    let body = json!({
        "name": "Pancakes",
        "text": "Mix and fry",
        "cooking_time": 20,
        "tags": [app.tag("breakfast")],
        "ingredients": [
            {"id": app.ingredient("egg", "pcs"), "amount": 2},
            {"id": app.ingredient("flour", "g"), "amount": 150}
        ]
    });
    let resp = app
        .send(request("POST", "/api/recipes/", Some(&alice.token), Some(body)))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["author"]["username"], "alice");
    assert_eq!(created["ingredients"][0]["name"], "egg");
    assert_eq!(created["ingredients"][0]["amount"], 2);
    assert_eq!(created["tags"][0]["slug"], "breakfast");

    let uri = format!("/api/recipes/{id}/");
    let resp = app
        .send(request(
            "PATCH",
            &uri,
            Some(&bob.token),
            Some(json!({"cooking_time": 5})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .send(request(
            "PATCH",
            &uri,
            Some(&alice.token),
            Some(json!({"cooking_time": 5})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["cooking_time"], 5);

    let resp = app.send(request("DELETE", &uri, Some(&alice.token), None)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app.send(get(&uri, None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_recipe_is_422_with_field_errors() {
    let app = common::app().await;
    let alice = app.user("alice").await;

    let body = json!({
        "name": "",
        "text": "x",
        "cooking_time": 0,
        "ingredients": []
    });
    let resp = app
        .send(request("POST", "/api/recipes/", Some(&alice.token), Some(body)))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let problem = body_json(resp).await;
    let fields: Vec<_> = problem["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_owned())
        .collect();
    for field in ["name", "cooking_time", "ingredients"] {
        assert!(fields.contains(&field.to_owned()), "missing {field}: {fields:?}");
    }

    let resp = app
        .send(request(
            "POST",
            "/api/recipes/",
            Some(&alice.token),
            Some(json!({"name": "no body fields"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn recipe_list_is_paginated_with_links() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    for n in 0..3 {
        app.services
            .recipes
            .create(
                &alice.ctx,
                app.recipe(&format!("Dish {n}"), &["lunch"], &[("egg", "pcs", 1)]),
            )
            .await
            .unwrap();
    }

    let resp = app
        .send(get("/api/recipes/?tags=lunch&limit=2", None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert_eq!(page["next"], "/api/recipes/?tags=lunch&limit=2&page=2");
    assert!(page["previous"].is_null());

    let resp = app
        .send(get("/api/recipes/?tags=lunch&limit=2&page=2", None))
        .await;
    let page = body_json(resp).await;
    assert_eq!(page["results"][0]["name"], "Dish 0");
    assert!(page["next"].is_null());
    assert_eq!(page["previous"], "/api/recipes/?tags=lunch&limit=2");

    let resp = app
        .send(get("/api/recipes/?is_favorited=maybe", None))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_paging_values_are_handled() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    app.services
        .recipes
        .create(&bob.ctx, app.recipe("Bread", &[], &[("flour", "g", 400)]))
        .await
        .unwrap();

    for uri in [
        "/api/recipes/?page=18446744073709551615",
        "/api/users/?page=18446744073709551615&limit=18446744073709551615",
        "/api/users/subscriptions/?page=9223372036854775807",
    ] {
        let resp = app.send(get(uri, Some(&alice.token))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
    }

    let resp = app
        .send(get("/api/recipes/?limit=18446744073709551615", None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["count"], 1);

    let uri = format!(
        "/api/users/{}/subscribe/?recipes_limit=18446744073709551615",
        bob.user.id
    );
    let resp = app.send(request("POST", &uri, Some(&alice.token), None)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["recipes"].as_array().unwrap().len(), 1);

    let resp = app
        .send(get(
            "/api/users/subscriptions/?recipes_limit=18446744073709551615",
            Some(&alice.token),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn favorite_twice_is_400_and_unfavorite_twice_is_404() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let recipe = app
        .services
        .recipes
        .create(&alice.ctx, app.recipe("Jam", &[], &[("sugar", "g", 500)]))
        .await
        .unwrap();
    let uri = format!("/api/recipes/{}/favorite/", recipe.recipe.id);

    let resp = app.send(request("POST", &uri, Some(&alice.token), None)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let short = body_json(resp).await;
    assert_eq!(short["name"], "Jam");
    assert_eq!(short["cooking_time"], 15);

    let resp = app.send(request("POST", &uri, Some(&alice.token), None)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.send(request("DELETE", &uri, Some(&alice.token), None)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app.send(request("DELETE", &uri, Some(&alice.token), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.send(request("POST", &uri, None, None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn download_shopping_cart_as_text_and_pdf() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let cook = app.user("cook").await;
    for recipe in [
        app.recipe("Pancakes", &[], &[("egg", "pcs", 2), ("milk", "ml", 200)]),
        app.recipe("Omelette", &[], &[("egg", "pcs", 3)]),
    ] {
        let created = app.services.recipes.create(&cook.ctx, recipe).await.unwrap();
        let uri = format!("/api/recipes/{}/shopping_cart/", created.recipe.id);
        let resp = app.send(request("POST", &uri, Some(&alice.token), None)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app
        .send(get(
            "/api/recipes/download_shopping_cart/?format=txt",
            Some(&alice.token),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"shopping_list.txt\""
    );
    assert_eq!(
        String::from_utf8(body_bytes(resp).await).unwrap(),
        "Shopping list\n\negg (pcs) - 5\nmilk (ml) - 200\n"
    );

    let resp = app
        .send(get("/api/recipes/download_shopping_cart/", Some(&alice.token)))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
    assert!(body_bytes(resp).await.starts_with(b"%PDF-"));

    let resp = app
        .send(get(
            "/api/recipes/download_shopping_cart/?format=docx",
            Some(&alice.token),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .send(get("/api/recipes/download_shopping_cart/", None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn subscribe_over_http_respects_recipes_limit() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    for name in ["Bread", "Buns"] {
        app.services
            .recipes
            .create(&bob.ctx, app.recipe(name, &[], &[("flour", "g", 400)]))
            .await
            .unwrap();
    }

    let uri = format!("/api/users/{}/subscribe/?recipes_limit=1", bob.user.id);
    let resp = app.send(request("POST", &uri, Some(&alice.token), None)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let sub = body_json(resp).await;
    assert_eq!(sub["username"], "bob");
    assert_eq!(sub["is_subscribed"], true);
    assert_eq!(sub["recipes_count"], 2);
    assert_eq!(sub["recipes"].as_array().unwrap().len(), 1);

    let resp = app
        .send(get("/api/users/subscriptions/", Some(&alice.token)))
        .await;
    let page = body_json(resp).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 2);

    let uri = format!("/api/users/{}/subscribe/", bob.user.id);
    let resp = app.send(request("DELETE", &uri, Some(&alice.token), None)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = common::app().await;
    let resp = app.send(get("/api/openapi.json", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    assert!(doc["paths"]["/api/recipes/{id}/shopping_cart/"].is_object());
}
