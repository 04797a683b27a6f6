//! Database layer for PaperNest
//!
//! Provides:
//! - SeaORM entity models
//! - Repository pattern for data access
//! - Connection pool management
//! - Schema bootstrap derived from the entities

pub mod models;
mod repository;

pub use repository::{PaperPage, PaperSort, PaperStore, PaperView, Repository, SearchParams, SortDirection};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use models::{LibraryEntity, PaperColumn, PaperEntity, PaperTagEntity, TagEntity};
use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        if let Some(path) = sqlite_file_path(&config.url) {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
        }

        info!(url = %config.url, "Connecting to database...");

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(false);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { conn })
    }

    /// Connect and make sure the schema exists
    pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<Self> {
        let pool = Self::new(config).await?;
        pool.migrate().await?;
        Ok(pool)
    }

    /// Get the underlying connection
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Create tables and indexes if they do not exist yet
    pub async fn migrate(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        // Parents before children so foreign keys resolve
        let mut tables = [
            schema.create_table_from_entity(PaperEntity),
            schema.create_table_from_entity(LibraryEntity),
            schema.create_table_from_entity(TagEntity),
            schema.create_table_from_entity(PaperTagEntity),
        ];

        for table in tables.iter_mut() {
            table.if_not_exists();
            self.conn.execute(backend.build(&*table)).await?;
        }

        let published_index = Index::create()
            .if_not_exists()
            .name("idx_papers_published_at")
            .table(PaperEntity)
            .col(PaperColumn::PublishedAt)
            .to_owned();
        self.conn.execute(backend.build(&published_index)).await?;

        info!("Database schema ready");
        Ok(())
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;

        Ok(())
    }
}

/// File path behind a SQLite URL, `None` for in-memory databases
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(Path::new(path))
    }
}
