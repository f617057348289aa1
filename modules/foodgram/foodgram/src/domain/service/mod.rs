//! Domain services. Every operation takes the caller's `SecurityContext`
//! explicitly.

use std::sync::Arc;

use crate::config::FoodgramConfig;
use crate::domain::ports::ShoppingListRenderer;
use crate::domain::repos::{
    CatalogRepository, RecipeMarksRepository, RecipesRepository, UsersRepository,
};
use crate::domain::shopping_list::CartSource;

mod catalog;
mod marks;
mod recipes;
mod shopping_list;
mod users;

pub use catalog::{CatalogService, LoadReport};
pub use marks::MarksService;
pub use recipes::RecipesService;
pub use shopping_list::ShoppingListService;
pub use users::{UsersService, token_digest};

/// Storage handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub catalog: Arc<dyn CatalogRepository>,
    pub recipes: Arc<dyn RecipesRepository>,
    pub marks: Arc<dyn RecipeMarksRepository>,
    pub users: Arc<dyn UsersRepository>,
    pub cart: Arc<dyn CartSource>,
}

/// All services of the module, shared by the REST layer and the CLI.
pub struct AppServices {
    pub catalog: CatalogService,
    pub recipes: RecipesService,
    pub marks: MarksService,
    pub users: UsersService,
    pub shopping: ShoppingListService,
    pub config: FoodgramConfig,
}

impl AppServices {
    #[must_use]
    pub fn new(
        repos: Repositories,
        renderers: Vec<Arc<dyn ShoppingListRenderer>>,
        config: FoodgramConfig,
    ) -> Self {
        Self {
            catalog: CatalogService::new(repos.catalog.clone()),
            recipes: RecipesService::new(
                repos.recipes.clone(),
                repos.catalog,
                repos.marks.clone(),
                repos.users.clone(),
                config.clone(),
            ),
            marks: MarksService::new(repos.marks, repos.recipes.clone()),
            users: UsersService::new(repos.users, repos.recipes, config.clone()),
            shopping: ShoppingListService::new(
                repos.cart,
                renderers,
                config.shopping_list_title.clone(),
            ),
            config,
        }
    }
}
