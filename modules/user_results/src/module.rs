use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::domain::service::Service;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::{SeaOrmResultsRepository, SeaOrmUsersRepository};

/// The users/results module: owns the schema and contributes the REST routes.
#[derive(Clone)]
pub struct UserResults {
    db: DatabaseConnection,
    service: Arc<Service>,
}

impl UserResults {
    /// Wire the SeaORM repositories (infra) into the domain service.
    pub fn new(db: DatabaseConnection) -> Self {
        info!("Initializing user_results module");

        // DatabaseConnection is a cheap cloneable pool handle
        let users = SeaOrmUsersRepository::new(db.clone());
        let results = SeaOrmResultsRepository::new(db.clone());
        let service = Service::new(Arc::new(users), Arc::new(results));

        Self {
            db,
            service: Arc::new(service),
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running user_results database migrations");
        Migrator::up(&self.db, None).await?;
        info!("user_results database migrations completed successfully");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering user_results REST routes");
        routes::register_routes(router, self.service())
    }
}
