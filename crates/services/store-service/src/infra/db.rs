//! Database connection and initialization.

use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    error::ErrorKind,
    options::{ClientOptions, IndexOptions},
    Client, Collection, IndexModel,
};

use common::{AppResult, DatabaseConfig};

use super::collections::unique_indexes;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Server error code returned when a collection does not exist yet
const NAMESPACE_NOT_FOUND: i32 = 26;

/// Server error code returned when dropping an index that does not exist
const INDEX_NOT_FOUND: i32 = 27;

/// Process-wide MongoDB handle. Clones share one connection pool.
#[derive(Clone)]
pub struct Database {
    database: mongodb::Database,
}

impl Database {
    /// Connect, verify the server answers and ensure the unique indexes exist.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let database = Self::connect_without_indexes(config).await?;

        database.ensure_indexes().await?;
        tracing::info!("Database connected and indexes ensured");

        Ok(database)
    }

    /// Connect without touching indexes (for CLI commands).
    pub async fn connect_without_indexes(config: &DatabaseConfig) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(config.app_name.clone());
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);

        let client = Client::with_options(options)?;
        let database = client.database(&config.database_name);

        database.run_command(doc! { "ping": 1 }).await?;
        tracing::debug!("Connected to MongoDB database {}", config.database_name);

        Ok(Self { database })
    }

    /// Get a typed handle to a collection.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection::<T>(name)
    }

    /// Name of the database in use.
    pub fn name(&self) -> &str {
        self.database.name()
    }

    /// Create every declared unique index (no-op for indexes that already exist).
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        for spec in unique_indexes() {
            let options = IndexOptions::builder()
                .name(spec.name.to_string())
                .unique(true)
                .build();
            let model = IndexModel::builder()
                .keys(spec.keys)
                .options(options)
                .build();

            self.collection::<Document>(spec.collection)
                .create_index(model)
                .await?;
            tracing::debug!("Index {} ensured on {}", spec.name, spec.collection);
        }
        Ok(())
    }

    /// List every declared index with whether it exists on the server.
    pub async fn index_status(&self) -> AppResult<Vec<(String, bool)>> {
        let mut status = Vec::new();

        for spec in unique_indexes() {
            let existing = match self
                .collection::<Document>(spec.collection)
                .list_index_names()
                .await
            {
                Ok(names) => names,
                Err(e) if server_code(&e) == Some(NAMESPACE_NOT_FOUND) => Vec::new(),
                Err(e) => return Err(e.into()),
            };

            let name = format!("{}.{}", spec.collection, spec.name);
            status.push((name, existing.iter().any(|n| n == spec.name)));
        }

        Ok(status)
    }

    /// Drop every declared index. Missing collections and indexes are skipped.
    pub async fn drop_indexes(&self) -> AppResult<()> {
        for spec in unique_indexes() {
            match self
                .collection::<Document>(spec.collection)
                .drop_index(spec.name)
                .await
            {
                Ok(()) => tracing::info!("Dropped index {} on {}", spec.name, spec.collection),
                Err(e)
                    if matches!(
                        server_code(&e),
                        Some(NAMESPACE_NOT_FOUND) | Some(INDEX_NOT_FOUND)
                    ) =>
                {
                    tracing::debug!("Index {} on {} not present", spec.name, spec.collection);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Server-side error code of a failed command, if any.
fn server_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

/// Liveness check of the backing store.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Check database connectivity with a ping command
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
impl HealthCheck for Database {
    async fn ping(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
