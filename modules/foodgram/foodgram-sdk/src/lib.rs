//! Foodgram SDK
//!
//! Transport-agnostic models shared by the foodgram module and its consumers:
//! catalog entries, recipes, users, pagination and the aggregated
//! [`ShoppingList`].

pub mod models;
pub mod page;
pub mod shopping_list;

pub use models::{
    Author, Ingredient, IngredientAmount, IngredientId, NewIngredient, NewRecipe, NewTag,
    NewUser, Recipe, RecipeDetails, RecipeFilter, RecipeId, RecipeIngredient, RecipePatch,
    Role, Subscription, Tag, TagId, User, UserId,
};
pub use page::{Page, PageRequest};
pub use shopping_list::{IngredientKey, IngredientLine, ShoppingList};
