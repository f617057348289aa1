use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_users(manager).await?;
        create_follows(manager).await?;
        create_catalog(manager).await?;
        create_recipes(manager).await?;
        create_recipe_ingredients(manager).await?;
        create_recipe_marks(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeMarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

async fn create_users(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Users::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(Users::Email)
                        .string_len(254)
                        .not_null()
                        .unique_key(),
                )
                .col(
                    ColumnDef::new(Users::Username)
                        .string_len(150)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                .col(ColumnDef::new(Users::LastName).string_len(150).not_null())
                .col(
                    ColumnDef::new(Users::Role)
                        .string_len(16)
                        .not_null()
                        .default("user"),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(AuthTokens::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(AuthTokens::Digest)
                        .string_len(64)
                        .not_null()
                        .primary_key(),
                )
                .col(ColumnDef::new(AuthTokens::UserId).integer().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .from(AuthTokens::Table, AuthTokens::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;
    Ok(())
}

async fn create_follows(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Follows::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Follows::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Follows::UserId).integer().not_null())
                .col(ColumnDef::new(Follows::AuthorId).integer().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .from(Follows::Table, Follows::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(Follows::Table, Follows::AuthorId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_follows_user_author")
                .table(Follows::Table)
                .col(Follows::UserId)
                .col(Follows::AuthorId)
                .unique()
                .to_owned(),
        )
        .await?;
    Ok(())
}

async fn create_catalog(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Tags::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Tags::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(Tags::Name)
                        .string_len(40)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Tags::Color).string_len(7).unique_key())
                .col(
                    ColumnDef::new(Tags::Slug)
                        .string_len(40)
                        .not_null()
                        .unique_key(),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Ingredients::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Ingredients::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Ingredients::Name).string_len(200).not_null())
                .col(
                    ColumnDef::new(Ingredients::MeasurementUnit)
                        .string_len(50)
                        .not_null(),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_ingredients_name_unit")
                .table(Ingredients::Table)
                .col(Ingredients::Name)
                .col(Ingredients::MeasurementUnit)
                .unique()
                .to_owned(),
        )
        .await?;
    Ok(())
}

async fn create_recipes(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Recipes::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Recipes::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Recipes::AuthorId).integer().not_null())
                .col(
                    ColumnDef::new(Recipes::Name)
                        .string_len(200)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Recipes::Text).text().not_null())
                .col(ColumnDef::new(Recipes::Image).text())
                .col(ColumnDef::new(Recipes::CookingTime).integer().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .from(Recipes::Table, Recipes::AuthorId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_recipes_author")
                .table(Recipes::Table)
                .col(Recipes::AuthorId)
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(RecipeTags::Table)
                .if_not_exists()
                .col(ColumnDef::new(RecipeTags::RecipeId).integer().not_null())
                .col(ColumnDef::new(RecipeTags::TagId).integer().not_null())
                .primary_key(
                    Index::create()
                        .col(RecipeTags::RecipeId)
                        .col(RecipeTags::TagId),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(RecipeTags::Table, RecipeTags::RecipeId)
                        .to(Recipes::Table, Recipes::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(RecipeTags::Table, RecipeTags::TagId)
                        .to(Tags::Table, Tags::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;
    Ok(())
}

async fn create_recipe_ingredients(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(RecipeIngredients::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(RecipeIngredients::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(RecipeIngredients::RecipeId)
                        .integer()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(RecipeIngredients::IngredientId)
                        .integer()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(RecipeIngredients::Amount)
                        .integer()
                        .not_null()
                        .check(Expr::col(RecipeIngredients::Amount).gte(1)),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(RecipeIngredients::Table, RecipeIngredients::RecipeId)
                        .to(Recipes::Table, Recipes::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(RecipeIngredients::Table, RecipeIngredients::IngredientId)
                        .to(Ingredients::Table, Ingredients::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_recipe_ingredients_recipe_ingredient")
                .table(RecipeIngredients::Table)
                .col(RecipeIngredients::RecipeId)
                .col(RecipeIngredients::IngredientId)
                .unique()
                .to_owned(),
        )
        .await?;
    Ok(())
}

async fn create_recipe_marks(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(RecipeMarks::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(RecipeMarks::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(RecipeMarks::Kind).string_len(16).not_null())
                .col(ColumnDef::new(RecipeMarks::UserId).integer().not_null())
                .col(ColumnDef::new(RecipeMarks::RecipeId).integer().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .from(RecipeMarks::Table, RecipeMarks::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(RecipeMarks::Table, RecipeMarks::RecipeId)
                        .to(Recipes::Table, Recipes::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("uq_recipe_marks_kind_user_recipe")
                .table(RecipeMarks::Table)
                .col(RecipeMarks::Kind)
                .col(RecipeMarks::UserId)
                .col(RecipeMarks::RecipeId)
                .unique()
                .to_owned(),
        )
        .await?;
    Ok(())
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    Role,
}

#[derive(DeriveIden)]
enum AuthTokens {
    Table,
    Digest,
    UserId,
}

#[derive(DeriveIden)]
enum Follows {
    Table,
    Id,
    UserId,
    AuthorId,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    Color,
    Slug,
}

#[derive(DeriveIden)]
enum Ingredients {
    Table,
    Id,
    Name,
    MeasurementUnit,
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    AuthorId,
    Name,
    Text,
    Image,
    CookingTime,
}

#[derive(DeriveIden)]
enum RecipeTags {
    Table,
    RecipeId,
    TagId,
}

#[derive(DeriveIden)]
enum RecipeIngredients {
    Table,
    Id,
    RecipeId,
    IngredientId,
    Amount,
}

#[derive(DeriveIden)]
enum RecipeMarks {
    Table,
    Id,
    Kind,
    UserId,
    RecipeId,
}
