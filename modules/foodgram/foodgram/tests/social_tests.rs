#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Favorites, shopping cart marks and subscriptions against SQLite.

mod common;

use foodgram::domain::error::DomainError;
use foodgram::domain::repos::MarkKind;
use foodgram::{PageRequest, SecurityContext};

#[tokio::test]
async fn marks_are_added_once_and_removed_once() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let recipe = app
        .services
        .recipes
        .create(&alice.ctx, app.recipe("Pie", &[], &[("flour", "g", 300)]))
        .await
        .unwrap();
    let id = recipe.recipe.id;

    for kind in [MarkKind::Favorite, MarkKind::ShoppingCart] {
        let short = app.services.marks.add(&alice.ctx, kind, id).await.unwrap();
        assert_eq!(short.name, "Pie");

        let err = app
            .services
            .marks
            .add(&alice.ctx, kind, id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BadRequest { .. }), "{kind:?}: {err}");

        app.services.marks.remove(&alice.ctx, kind, id).await.unwrap();
        let err = app
            .services
            .marks
            .remove(&alice.ctx, kind, id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }), "{kind:?}: {err}");
    }
}

#[tokio::test]
async fn marking_unknown_recipe_is_not_found() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let err = app
        .services
        .marks
        .add(&alice.ctx, MarkKind::Favorite, 404)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn anonymous_callers_cannot_mark() {
    let app = common::app().await;
    let err = app
        .services
        .marks
        .add(&SecurityContext::anonymous(), MarkKind::ShoppingCart, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn marks_are_per_user() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let recipe = app
        .services
        .recipes
        .create(&alice.ctx, app.recipe("Tea", &[], &[("milk", "ml", 50)]))
        .await
        .unwrap();
    app.services
        .marks
        .add(&alice.ctx, MarkKind::Favorite, recipe.recipe.id)
        .await
        .unwrap();

    let seen_by_bob = app
        .services
        .recipes
        .get(&bob.ctx, recipe.recipe.id)
        .await
        .unwrap();
    assert!(!seen_by_bob.is_favorited);
    let seen_by_alice = app
        .services
        .recipes
        .get(&alice.ctx, recipe.recipe.id)
        .await
        .unwrap();
    assert!(seen_by_alice.is_favorited);
}

#[tokio::test]
async fn subscription_lifecycle() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    for name in ["Bread", "Buns", "Bagels"] {
        app.services
            .recipes
            .create(&bob.ctx, app.recipe(name, &[], &[("flour", "g", 500)]))
            .await
            .unwrap();
    }

    let sub = app
        .services
        .users
        .subscribe(&alice.ctx, bob.user.id, Some(2))
        .await
        .unwrap();
    assert!(sub.author.is_subscribed);
    assert_eq!(sub.recipes_count, 3);
    let names: Vec<_> = sub.recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Bagels", "Buns"]);

    let err = app
        .services
        .users
        .subscribe(&alice.ctx, bob.user.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::BadRequest { .. }));

    let author = app.services.users.get(&alice.ctx, bob.user.id).await.unwrap();
    assert!(author.is_subscribed);

    let page = app
        .services
        .users
        .subscriptions(&alice.ctx, PageRequest::new(1, 10), None)
        .await
        .unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].author.user.username, "bob");
    assert_eq!(page.items[0].recipes.len(), 3);

    app.services
        .users
        .unsubscribe(&alice.ctx, bob.user.id)
        .await
        .unwrap();
    let err = app
        .services
        .users
        .unsubscribe(&alice.ctx, bob.user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::BadRequest { .. }));
}

#[tokio::test]
async fn cannot_subscribe_to_self_or_unknown_user() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let err = app
        .services
        .users
        .subscribe(&alice.ctx, alice.user.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::BadRequest { .. }));

    let err = app
        .services
        .users
        .subscribe(&alice.ctx, 9_999, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn issued_tokens_authenticate_and_unknown_ones_do_not() {
    let app = common::app().await;
    let alice = app.user("alice").await;

    let ctx = app.services.users.authenticate(&alice.token).await.unwrap();
    assert_eq!(ctx.subject_id(), Some(alice.user.id));

    let err = app
        .services
        .users
        .authenticate("not-a-token")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidToken));
}

#[tokio::test]
async fn duplicate_accounts_conflict() {
    let app = common::app().await;
    app.user("alice").await;
    let err = app
        .services
        .users
        .create_user(foodgram::NewUser {
            email: "ALICE@example.com".to_owned(),
            username: "alice2".to_owned(),
            ..foodgram::NewUser::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}
