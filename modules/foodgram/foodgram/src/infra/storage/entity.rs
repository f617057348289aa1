//! `SeaORM` entities for the foodgram tables.

pub use ingredient::Entity as IngredientEntity;
pub use recipe::Entity as RecipeEntity;
pub use tag::Entity as TagEntity;
pub use user::Entity as UserEntity;

/// Account entity for the `users` table.
pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub email: String,
        #[sea_orm(unique)]
        pub username: String,
        pub first_name: String,
        pub last_name: String,
        pub role: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::recipe::Entity")]
        Recipes,
        #[sea_orm(has_many = "super::auth_token::Entity")]
        Tokens,
    }

    impl Related<super::recipe::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Recipes.def()
        }
    }

    impl Related<super::auth_token::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tokens.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Access token digests for the `auth_tokens` table.
pub mod auth_token {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "auth_tokens")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub digest: String,
        pub user_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::UserId",
            to = "super::user::Column::Id"
        )]
        User,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Follow relation for the `follows` table: `user_id` follows `author_id`.
pub mod follow {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "follows")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub user_id: i32,
        pub author_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Tag entity for the `tags` table.
pub mod tag {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tags")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub name: String,
        #[sea_orm(unique)]
        pub color: Option<String>,
        #[sea_orm(unique)]
        pub slug: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::recipe_tag::Entity")]
        RecipeTags,
    }

    impl Related<super::recipe_tag::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::RecipeTags.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Ingredient entity for the `ingredients` table.
pub mod ingredient {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "ingredients")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub measurement_unit: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::recipe_ingredient::Entity")]
        RecipeIngredients,
    }

    impl Related<super::recipe_ingredient::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::RecipeIngredients.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Recipe entity for the `recipes` table.
pub mod recipe {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "recipes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub author_id: i32,
        #[sea_orm(unique)]
        pub name: String,
        pub text: String,
        pub image: Option<String>,
        pub cooking_time: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::AuthorId",
            to = "super::user::Column::Id"
        )]
        Author,
        #[sea_orm(has_many = "super::recipe_tag::Entity")]
        Tags,
        #[sea_orm(has_many = "super::recipe_ingredient::Entity")]
        Ingredients,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Author.def()
        }
    }

    impl Related<super::recipe_tag::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tags.def()
        }
    }

    impl Related<super::recipe_ingredient::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Ingredients.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Recipe to tag link for the `recipe_tags` table.
pub mod recipe_tag {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "recipe_tags")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub recipe_id: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub tag_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::recipe::Entity",
            from = "Column::RecipeId",
            to = "super::recipe::Column::Id"
        )]
        Recipe,
        #[sea_orm(
            belongs_to = "super::tag::Entity",
            from = "Column::TagId",
            to = "super::tag::Column::Id"
        )]
        Tag,
    }

    impl Related<super::recipe::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Recipe.def()
        }
    }

    impl Related<super::tag::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tag.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Ingredient entries for the `recipe_ingredients` table.
pub mod recipe_ingredient {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "recipe_ingredients")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub recipe_id: i32,
        pub ingredient_id: i32,
        pub amount: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::recipe::Entity",
            from = "Column::RecipeId",
            to = "super::recipe::Column::Id"
        )]
        Recipe,
        #[sea_orm(
            belongs_to = "super::ingredient::Entity",
            from = "Column::IngredientId",
            to = "super::ingredient::Column::Id"
        )]
        Ingredient,
    }

    impl Related<super::recipe::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Recipe.def()
        }
    }

    impl Related<super::ingredient::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Ingredient.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Favorites and cart entries for the `recipe_marks` table.
pub mod recipe_mark {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "recipe_marks")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub kind: String,
        pub user_id: i32,
        pub recipe_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::recipe::Entity",
            from = "Column::RecipeId",
            to = "super::recipe::Column::Id"
        )]
        Recipe,
    }

    impl Related<super::recipe::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Recipe.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
