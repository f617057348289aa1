#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Shopping list aggregation over the SQLite-backed cart.

mod common;

use foodgram::domain::error::DomainError;
use foodgram::domain::ports::ExportFormat;
use foodgram::domain::repos::MarkKind;
use foodgram::{IngredientLine, SecurityContext};

async fn cart_with_three_recipes(app: &common::TestApp, who: &common::TestUser) {
    let cook = app.user("cook").await;
    let recipes = [
        app.recipe(
            "Pancakes",
            &["breakfast"],
            &[("egg", "pcs", 2), ("flour", "g", 150), ("milk", "ml", 300)],
        ),
        app.recipe("Omelette", &[], &[("egg", "pcs", 3), ("milk", "ml", 50)]),
        app.recipe(
            "Syrup",
            &[],
            &[("sugar", "g", 20), ("sugar", "tbsp", 1)],
        ),
    ];
    for recipe in recipes {
        let created = app.services.recipes.create(&cook.ctx, recipe).await.unwrap();
        app.services
            .marks
            .add(&who.ctx, MarkKind::ShoppingCart, created.recipe.id)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn cart_totals_merge_by_name_and_unit() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    cart_with_three_recipes(&app, &alice).await;

    let list = app.services.shopping.build(&alice.ctx).await.unwrap();
    let lines: Vec<IngredientLine> = list.lines().collect();
    assert_eq!(
        lines,
        vec![
            IngredientLine::new("egg", "pcs", 5),
            IngredientLine::new("flour", "g", 150),
            IngredientLine::new("milk", "ml", 350),
            IngredientLine::new("sugar", "g", 20),
            IngredientLine::new("sugar", "tbsp", 1),
        ]
    );
    assert_eq!(list.grand_total(), 526);
}

#[tokio::test]
async fn other_users_carts_are_not_included() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    cart_with_three_recipes(&app, &alice).await;

    let list = app.services.shopping.build(&bob.ctx).await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn removing_from_cart_shrinks_the_list() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    let cook = app.user("cook").await;
    let recipe = app
        .services
        .recipes
        .create(&cook.ctx, app.recipe("Toast", &[], &[("flour", "g", 80)]))
        .await
        .unwrap();
    let marks = &app.services.marks;
    marks
        .add(&alice.ctx, MarkKind::ShoppingCart, recipe.recipe.id)
        .await
        .unwrap();
    assert_eq!(
        app.services.shopping.build(&alice.ctx).await.unwrap().len(),
        1
    );

    marks
        .remove(&alice.ctx, MarkKind::ShoppingCart, recipe.recipe.id)
        .await
        .unwrap();
    assert!(app.services.shopping.build(&alice.ctx).await.unwrap().is_empty());
}

#[tokio::test]
async fn text_export_lists_totals_under_title() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    cart_with_three_recipes(&app, &alice).await;

    let doc = app
        .services
        .shopping
        .export(&alice.ctx, ExportFormat::Text)
        .await
        .unwrap();
    assert_eq!(doc.file_name, "shopping_list.txt");
    assert_eq!(
        String::from_utf8(doc.bytes).unwrap(),
        "Shopping list\n\negg (pcs) - 5\nflour (g) - 150\nmilk (ml) - 350\nsugar (g) - 20\nsugar (tbsp) - 1\n"
    );
}

#[tokio::test]
async fn pdf_export_is_a_readable_document() {
    let app = common::app().await;
    let alice = app.user("alice").await;
    cart_with_three_recipes(&app, &alice).await;

    let doc = app
        .services
        .shopping
        .export(&alice.ctx, ExportFormat::Pdf)
        .await
        .unwrap();
    assert_eq!(doc.content_type, "application/pdf");
    assert!(doc.bytes.starts_with(b"%PDF-"));
    let text: String = pdf_extract::extract_text_from_mem(&doc.bytes)
        .unwrap()
        .split_whitespace()
        .collect();
    assert!(text.contains("Shoppinglist"), "{text}");
    assert!(text.contains("egg(pcs)-5"), "{text}");
    assert!(text.contains("milk(ml)-350"), "{text}");
}

#[tokio::test]
async fn anonymous_callers_have_no_shopping_list() {
    let app = common::app().await;
    let err = app
        .services
        .shopping
        .export(&SecurityContext::anonymous(), ExportFormat::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}
