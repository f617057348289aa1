#![allow(clippy::missing_errors_doc)] // Failure modes are the `DomainError` variants

//! Foodgram module implementation
//!
//! Recipes, the tag and ingredient catalog, favorites, the shopping cart,
//! subscriptions between users and the shopping list export. The public
//! models live in `foodgram-sdk` and are re-exported here.

pub use foodgram_sdk::{
    Author, Ingredient, IngredientAmount, IngredientKey, IngredientLine, NewIngredient, NewRecipe,
    NewTag, NewUser, Page, PageRequest, Recipe, RecipeDetails, RecipeFilter, RecipePatch, Role,
    ShoppingList, Subscription, Tag, User,
};

pub mod module;
pub use module::FoodgramModule;

pub mod config;
pub use config::FoodgramConfig;

pub mod security;
pub use security::SecurityContext;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
