//! REST data transfer objects.

use foodgram_sdk::{
    Author, Ingredient, IngredientAmount, NewRecipe, Recipe, RecipeDetails, RecipeIngredient,
    RecipePatch, Subscription, Tag,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagDto {
    pub id: i32,
    pub name: String,
    /// `#RRGGBB`
    pub color: Option<String>,
    pub slug: String,
}

impl From<Tag> for TagDto {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            color: t.color,
            slug: t.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientDto {
    fn from(i: Ingredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
        }
    }
}

/// A user as seen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl From<Author> for UserDto {
    fn from(a: Author) -> Self {
        Self {
            id: a.user.id,
            email: a.user.email,
            username: a.user.username,
            first_name: a.user.first_name,
            last_name: a.user.last_name,
            is_subscribed: a.is_subscribed,
        }
    }
}

/// Ingredient entry of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredient> for RecipeIngredientDto {
    fn from(e: RecipeIngredient) -> Self {
        Self {
            id: e.ingredient.id,
            name: e.ingredient.name,
            measurement_unit: e.ingredient.measurement_unit,
            amount: e.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeDto {
    pub id: i32,
    pub tags: Vec<TagDto>,
    pub author: UserDto,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
}

impl From<RecipeDetails> for RecipeDto {
    fn from(d: RecipeDetails) -> Self {
        Self {
            id: d.recipe.id,
            tags: d.tags.into_iter().map(Into::into).collect(),
            author: d.author.into(),
            ingredients: d.ingredients.into_iter().map(Into::into).collect(),
            is_favorited: d.is_favorited,
            is_in_shopping_cart: d.is_in_shopping_cart,
            name: d.recipe.name,
            image: d.recipe.image,
            text: d.recipe.text,
            cooking_time: d.recipe.cooking_time,
        }
    }
}

/// Compact recipe used in favorites, cart and subscription responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeShortDto {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<Recipe> for RecipeShortDto {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            name: r.name,
            image: r.image,
            cooking_time: r.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub recipes: Vec<RecipeShortDto>,
    pub recipes_count: u64,
}

impl From<Subscription> for SubscriptionDto {
    fn from(s: Subscription) -> Self {
        Self {
            user: s.author.into(),
            recipes: s.recipes.into_iter().map(Into::into).collect(),
            recipes_count: s.recipes_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct IngredientAmountDto {
    /// Ingredient id
    pub id: i32,
    pub amount: i32,
}

impl From<IngredientAmountDto> for IngredientAmount {
    fn from(d: IngredientAmountDto) -> Self {
        Self {
            id: d.id,
            amount: d.amount,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub ingredients: Vec<IngredientAmountDto>,
    /// Tag ids
    #[serde(default)]
    pub tags: Vec<i32>,
    #[serde(default)]
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<CreateRecipeRequest> for NewRecipe {
    fn from(r: CreateRecipeRequest) -> Self {
        Self {
            name: r.name,
            text: r.text,
            image: r.image,
            cooking_time: r.cooking_time,
            tags: r.tags,
            ingredients: r.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

/// Partial update; `tags` and `ingredients` replace the stored sets.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountDto>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

impl From<UpdateRecipeRequest> for RecipePatch {
    fn from(r: UpdateRecipeRequest) -> Self {
        Self {
            name: r.name,
            text: r.text,
            image: r.image,
            cooking_time: r.cooking_time,
            tags: r.tags,
            ingredients: r
                .ingredients
                .map(|list| list.into_iter().map(Into::into).collect()),
        }
    }
}

/// Page-number paginated response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageDto<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
