use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Order, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::desks;

pub mod migrator;
pub mod repositories;

pub use repositories::desk::{Assignment, SortColumn, VacantDesk, parse_order};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn desk_repo(&self) -> repositories::desk::DeskRepository {
        repositories::desk::DeskRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Desk Repository Methods ==========

    pub async fn get_desk(&self, desk_id: i32) -> Result<Option<desks::Model>> {
        self.desk_repo().get(desk_id).await
    }

    pub async fn list_desks(&self, sort: SortColumn, order: Order) -> Result<Vec<desks::Model>> {
        self.desk_repo().list(sort, order).await
    }

    pub async fn vacant_desks(&self, today: &str) -> Result<Vec<VacantDesk>> {
        self.desk_repo().vacant(today).await
    }

    pub async fn assign_occupant(
        &self,
        desk: desks::Model,
        assignment: Assignment,
    ) -> Result<()> {
        self.desk_repo().assign(desk, assignment).await
    }

    pub async fn clear_occupant(&self, desk: desks::Model) -> Result<()> {
        self.desk_repo().clear_occupant(desk).await
    }

    pub async fn set_desk_details(
        &self,
        desk: desks::Model,
        location: String,
        supervisor: Option<String>,
        status: Option<String>,
    ) -> Result<desks::Model> {
        self.desk_repo()
            .set_details(desk, location, supervisor, status)
            .await
    }

    pub async fn add_desk(&self, location: String) -> Result<i32> {
        self.desk_repo().add(location).await
    }

    // ========== User Repository Methods ==========

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }
}
