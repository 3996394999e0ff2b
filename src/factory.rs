//! Database factory facade.
//!
//! Ties the pipeline together: registry lookup, credential resolution and
//! descriptor building via [`describe`], plus sqlx pool creation and caching
//! via [`connect`] for the backends a driver exists for.
//!
//! [`describe`]: DatabaseFactory::describe
//! [`connect`]: DatabaseFactory::connect

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{MySqlPool, PgPool, SqlitePool};
use tokio::sync::RwLock;

use crate::builder::DescriptorBuilder;
use crate::config::FactoryConfig;
use crate::errors::{FactoryError, FactoryResult};
use crate::models::{ConnectionDescriptor, ConnectionField, ConnectionRequest};
use crate::registry::{BackendRegistry, DbBackend};
use crate::resolver::CredentialResolver;
use crate::secrets::SecretStore;

/// Connection pool wrapper for the sqlx-capable backends.
#[derive(Clone, Debug)]
pub enum DatabasePool {
    /// MySQL connection pool.
    MySQL(MySqlPool),
    /// PostgreSQL connection pool.
    Postgres(PgPool),
    /// SQLite connection pool.
    SQLite(SqlitePool),
}

impl DatabasePool {
    /// Runs a liveness probe (`SELECT 1`) and returns the elapsed time.
    pub async fn ping(&self) -> FactoryResult<Duration> {
        let start = std::time::Instant::now();
        match self {
            DatabasePool::MySQL(pool) => {
                sqlx::query("SELECT 1")
                    .execute(pool)
                    .await
                    .map_err(|e| FactoryError::DatabaseQuery(e.to_string()))?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query("SELECT 1")
                    .execute(pool)
                    .await
                    .map_err(|e| FactoryError::DatabaseQuery(e.to_string()))?;
            }
            DatabasePool::SQLite(pool) => {
                sqlx::query("SELECT 1")
                    .execute(pool)
                    .await
                    .map_err(|e| FactoryError::DatabaseQuery(e.to_string()))?;
            }
        }
        Ok(start.elapsed())
    }
}

/// Unified connection factory.
///
/// [`describe`] is the stateless resolution pipeline; [`connect`] additionally
/// opens a connection pool and caches it under the request name. The cache is
/// the only shared state; resolution itself holds none.
///
/// [`describe`]: DatabaseFactory::describe
/// [`connect`]: DatabaseFactory::connect
pub struct DatabaseFactory {
    config: FactoryConfig,
    resolver: CredentialResolver,
    /// Runtime connection pools indexed by request name.
    pools: RwLock<HashMap<String, DatabasePool>>,
}

impl DatabaseFactory {
    /// Creates a factory without secret store access.
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            config,
            resolver: CredentialResolver::new(),
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a factory backed by a secret store.
    pub fn with_secret_store(config: FactoryConfig, secret_store: Arc<dyn SecretStore>) -> Self {
        Self {
            config,
            resolver: CredentialResolver::with_secret_store(secret_store),
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves a request into a connection descriptor.
    pub async fn describe(
        &self,
        request: &ConnectionRequest,
    ) -> FactoryResult<ConnectionDescriptor> {
        let descriptor = BackendRegistry::descriptor(request.backend);
        let credentials = self.resolver.resolve(request, descriptor).await?;
        let built = DescriptorBuilder::build(descriptor, &credentials)?;

        tracing::info!(name = %request.name, backend = %request.backend, "descriptor built");
        Ok(built)
    }

    /// Resolves a request and opens a connection pool, cached under the
    /// request name. A cached pool is returned as-is.
    ///
    /// # Errors
    /// `FactoryError::UnsupportedDriver` for backends without a sqlx driver
    /// (snowflake, bigquery); `FactoryError::DatabaseConnection` when the
    /// database cannot be reached.
    pub async fn connect(&self, request: &ConnectionRequest) -> FactoryResult<DatabasePool> {
        if let Some(pool) = self.get_pool(&request.name).await {
            return Ok(pool);
        }

        let descriptor = self.describe(request).await?;
        let pool = self.create_pool(&descriptor).await?;
        self.pools
            .write()
            .await
            .insert(request.name.clone(), pool.clone());

        tracing::info!(name = %request.name, backend = %request.backend, "pool created");
        Ok(pool)
    }

    async fn create_pool(&self, descriptor: &ConnectionDescriptor) -> FactoryResult<DatabasePool> {
        let timeout = Duration::from_secs(self.config.connect_timeout_secs);
        let max_connections = self.config.max_connections;

        match descriptor.backend {
            DbBackend::MySQL => {
                let pool = MySqlPoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(timeout)
                    .connect(&descriptor.uri)
                    .await
                    .map_err(|e| FactoryError::DatabaseConnection(e.to_string()))?;
                Ok(DatabasePool::MySQL(pool))
            }
            DbBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(timeout)
                    .connect(&descriptor.uri)
                    .await
                    .map_err(|e| FactoryError::DatabaseConnection(e.to_string()))?;
                Ok(DatabasePool::Postgres(pool))
            }
            DbBackend::SQLite => {
                let url = Self::sqlite_url(descriptor)?;
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect(&url)
                    .await
                    .map_err(|e| FactoryError::DatabaseConnection(e.to_string()))?;
                Ok(DatabasePool::SQLite(pool))
            }
            DbBackend::Snowflake | DbBackend::BigQuery => {
                Err(FactoryError::UnsupportedDriver(descriptor.backend))
            }
        }
    }

    /// sqlx expects `sqlite:<path>` rather than the descriptor's file URI.
    fn sqlite_url(descriptor: &ConnectionDescriptor) -> FactoryResult<String> {
        let path = descriptor
            .param(ConnectionField::FilePath)
            .ok_or_else(|| FactoryError::Validation("sqlite descriptor missing file_path".into()))?;
        if path == ":memory:" {
            return Ok("sqlite::memory:".to_string());
        }
        let mode = descriptor.param(ConnectionField::Mode).unwrap_or("rwc");
        Ok(format!("sqlite:{}?mode={}", path, mode))
    }

    /// Gets a cached pool by connection name.
    pub async fn get_pool(&self, name: &str) -> Option<DatabasePool> {
        self.pools.read().await.get(name).cloned()
    }

    /// Pings a cached pool by connection name.
    pub async fn ping(&self, name: &str) -> FactoryResult<Duration> {
        let pool = self
            .get_pool(name)
            .await
            .ok_or_else(|| FactoryError::ConnectionNotFound(name.to_string()))?;
        pool.ping().await
    }

    /// Drops a cached pool.
    pub async fn remove(&self, name: &str) -> FactoryResult<()> {
        match self.pools.write().await.remove(name) {
            Some(_) => {
                tracing::info!(name = %name, "pool removed");
                Ok(())
            }
            None => Err(FactoryError::ConnectionNotFound(name.to_string())),
        }
    }

    /// Number of cached pools.
    pub async fn pool_count(&self) -> usize {
        self.pools.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemorySecretStore;

    fn sqlite_memory_request(name: &str) -> ConnectionRequest {
        ConnectionRequest::new(name, DbBackend::SQLite)
            .with_field(ConnectionField::FilePath, ":memory:")
    }

    #[tokio::test]
    async fn test_describe_builds_expected_uris() -> anyhow::Result<()> {
        crate::test_util::init_tracing();
        let factory = DatabaseFactory::new(FactoryConfig::default());

        let postgres = ConnectionRequest::new("orders", DbBackend::Postgres)
            .with_field(ConnectionField::Host, "db.local")
            .with_field(ConnectionField::Username, "a")
            .with_field(ConnectionField::Password, "p")
            .with_field(ConnectionField::Database, "x");
        let descriptor = factory.describe(&postgres).await?;
        assert_eq!(descriptor.uri, "postgresql://a:p@db.local/x");

        let sqlite = ConnectionRequest::new("scratch", DbBackend::SQLite)
            .with_field(ConnectionField::FilePath, "/tmp/t.db");
        let descriptor = factory.describe(&sqlite).await?;
        assert_eq!(descriptor.uri, "sqlite:////tmp/t.db");
        Ok(())
    }

    #[tokio::test]
    async fn test_describe_with_secret_store() -> anyhow::Result<()> {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("prod-pg", "password", "p");
        let factory = DatabaseFactory::with_secret_store(FactoryConfig::default(), store);

        let request = ConnectionRequest::new("orders", DbBackend::Postgres)
            .with_field(ConnectionField::Host, "db.local")
            .with_field(ConnectionField::Username, "a")
            .with_field(ConnectionField::Database, "x")
            .with_secret_ref("prod-pg");
        let descriptor = factory.describe(&request).await?;
        assert_eq!(descriptor.uri, "postgresql://a:p@db.local/x");
        Ok(())
    }

    #[tokio::test]
    async fn test_connect_sqlite_memory_and_ping() {
        crate::test_util::init_tracing();
        let factory = DatabaseFactory::new(FactoryConfig::default());
        let request = sqlite_memory_request("scratch");

        let pool = factory.connect(&request).await.unwrap();
        assert!(matches!(pool, DatabasePool::SQLite(_)));
        assert_eq!(factory.pool_count().await, 1);

        let latency = factory.ping("scratch").await.unwrap();
        assert!(latency < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_connect_reuses_cached_pool() {
        let factory = DatabaseFactory::new(FactoryConfig::default());
        let request = sqlite_memory_request("scratch");

        factory.connect(&request).await.unwrap();
        factory.connect(&request).await.unwrap();
        assert_eq!(factory.pool_count().await, 1);
    }

    #[tokio::test]
    async fn test_connect_unsupported_driver() {
        let factory = DatabaseFactory::new(FactoryConfig::default());
        let request = ConnectionRequest::new("warehouse", DbBackend::Snowflake)
            .with_field(ConnectionField::Account, "xy12345")
            .with_field(ConnectionField::Username, "loader")
            .with_field(ConnectionField::Password, "p")
            .with_field(ConnectionField::Database, "analytics");

        let err = factory.connect(&request).await.unwrap_err();
        assert!(matches!(
            err,
            FactoryError::UnsupportedDriver(DbBackend::Snowflake)
        ));
        assert_eq!(factory.pool_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_and_not_found() {
        let factory = DatabaseFactory::new(FactoryConfig::default());
        let request = sqlite_memory_request("scratch");

        factory.connect(&request).await.unwrap();
        factory.remove("scratch").await.unwrap();
        assert_eq!(factory.pool_count().await, 0);

        let err = factory.remove("scratch").await.unwrap_err();
        assert!(matches!(err, FactoryError::ConnectionNotFound(_)));
        let err = factory.ping("scratch").await.unwrap_err();
        assert!(matches!(err, FactoryError::ConnectionNotFound(_)));
    }
}
