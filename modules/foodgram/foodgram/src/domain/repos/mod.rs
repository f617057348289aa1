mod catalog_repo;
mod marks_repo;
mod recipes_repo;
mod users_repo;

pub use catalog_repo::CatalogRepository;
pub use marks_repo::{MarkKind, RecipeMarksRepository};
pub use recipes_repo::RecipesRepository;
pub use users_repo::UsersRepository;
