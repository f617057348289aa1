//! Composition root: wires sea-orm storage, renderers and services together.

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::config::FoodgramConfig;
use crate::domain::service::{AppServices, Repositories};
use crate::infra::render::default_renderers;
use crate::infra::storage::{
    Migrator, SeaOrmCartSource, SeaOrmCatalogRepository, SeaOrmRecipeMarksRepository,
    SeaOrmRecipesRepository, SeaOrmUsersRepository,
};

pub struct FoodgramModule {
    db: DatabaseConnection,
    services: Arc<AppServices>,
}

impl FoodgramModule {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: FoodgramConfig) -> Self {
        let repos = Repositories {
            catalog: Arc::new(SeaOrmCatalogRepository::new(db.clone())),
            recipes: Arc::new(SeaOrmRecipesRepository::new(db.clone())),
            marks: Arc::new(SeaOrmRecipeMarksRepository::new(db.clone())),
            users: Arc::new(SeaOrmUsersRepository::new(db.clone())),
            cart: Arc::new(SeaOrmCartSource::new(db.clone())),
        };
        let services = Arc::new(AppServices::new(repos, default_renderers(), config));
        Self { db, services }
    }

    /// Apply pending schema migrations.
    ///
    /// # Errors
    /// Fails when a migration cannot be applied.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running foodgram database migrations");
        Migrator::up(&self.db, None).await?;
        info!("Foodgram database migrations completed");
        Ok(())
    }

    #[must_use]
    pub fn services(&self) -> Arc<AppServices> {
        Arc::clone(&self.services)
    }

    /// The `/api` router.
    #[must_use]
    pub fn router(&self) -> Router {
        info!("Registering foodgram REST routes");
        routes::router(self.services())
    }
}
