//! Entity to domain model mappers.

use foodgram_sdk::{Ingredient, NewIngredient, NewTag, Recipe, RecipeIngredient, Role, Tag, User};
use sea_orm::ActiveValue::{NotSet, Set};

use super::entity::{ingredient, recipe, tag, user};

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            role: Role::parse(&model.role).unwrap_or_default(),
        }
    }
}

impl From<tag::Model> for Tag {
    fn from(model: tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
            slug: model.slug,
        }
    }
}

impl From<ingredient::Model> for Ingredient {
    fn from(model: ingredient::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            measurement_unit: model.measurement_unit,
        }
    }
}

impl From<recipe::Model> for Recipe {
    fn from(model: recipe::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            name: model.name,
            text: model.text,
            image: model.image,
            cooking_time: model.cooking_time,
        }
    }
}

/// Join an ingredient entry with its catalog row.
#[must_use]
pub fn recipe_ingredient(amount: i32, ingredient: ingredient::Model) -> RecipeIngredient {
    RecipeIngredient {
        ingredient: ingredient.into(),
        amount,
    }
}

#[must_use]
pub fn new_tag_to_active_model(tag: NewTag) -> tag::ActiveModel {
    tag::ActiveModel {
        id: NotSet,
        name: Set(tag.name),
        color: Set(tag.color),
        slug: Set(tag.slug),
    }
}

#[must_use]
pub fn new_ingredient_to_active_model(ingredient: NewIngredient) -> ingredient::ActiveModel {
    ingredient::ActiveModel {
        id: NotSet,
        name: Set(ingredient.name),
        measurement_unit: Set(ingredient.measurement_unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_maps_to_plain_user() {
        let user: User = user::Model {
            id: 3,
            email: "a@b.io".to_owned(),
            username: "a".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            role: "superuser".to_owned(),
        }
        .into();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn admin_role_is_preserved() {
        let user: User = user::Model {
            id: 1,
            email: "root@b.io".to_owned(),
            username: "root".to_owned(),
            first_name: "Root".to_owned(),
            last_name: String::new(),
            role: "admin".to_owned(),
        }
        .into();
        assert!(user.is_admin());
    }
}
