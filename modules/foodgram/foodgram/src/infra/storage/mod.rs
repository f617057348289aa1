//! `SeaORM` storage for the foodgram module.

pub mod cart_source;
pub mod catalog_sea_repo;
pub(crate) mod db;
pub mod entity;
pub mod mapper;
pub mod marks_sea_repo;
pub mod migrations;
pub mod recipes_sea_repo;
pub mod users_sea_repo;

pub use cart_source::SeaOrmCartSource;
pub use catalog_sea_repo::SeaOrmCatalogRepository;
pub use marks_sea_repo::SeaOrmRecipeMarksRepository;
pub use migrations::Migrator;
pub use recipes_sea_repo::SeaOrmRecipesRepository;
pub use users_sea_repo::SeaOrmUsersRepository;
