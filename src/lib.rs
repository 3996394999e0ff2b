//! Unified database connection factory.
//!
//! Resolves connection requests for multiple database backends (SQLite,
//! PostgreSQL, MySQL, Snowflake, BigQuery) into validated connection
//! descriptors:
//! - Backend registry: per-backend field lists and URI templates
//! - Credential resolution: explicit fields or an external secret store
//! - Descriptor building: URI assembly with percent-encoded credentials
//! - Pool factory: sqlx connection pools for the backends a driver exists for
//!
//! ```no_run
//! use std::sync::Arc;
//! use database_factory::{
//!     ConnectionField, ConnectionRequest, DatabaseFactory, DbBackend, EnvSecretStore,
//!     FactoryConfig,
//! };
//!
//! # async fn example() -> database_factory::FactoryResult<()> {
//! let factory = DatabaseFactory::with_secret_store(
//!     FactoryConfig::from_env(),
//!     Arc::new(EnvSecretStore::new()),
//! );
//!
//! let request = ConnectionRequest::new("orders", DbBackend::Postgres)
//!     .with_field(ConnectionField::Host, "db.local")
//!     .with_field(ConnectionField::Database, "orders")
//!     .with_secret_ref("prod-pg");
//!
//! let descriptor = factory.describe(&request).await?;
//! let pool = factory.connect(&request).await?;
//! # let _ = (descriptor, pool);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod errors;
pub mod factory;
pub mod models;
pub mod registry;
pub mod resolver;
pub mod secrets;

// Re-export commonly used types
pub use builder::DescriptorBuilder;
pub use config::FactoryConfig;
pub use errors::{FactoryError, FactoryResult};
pub use factory::{DatabaseFactory, DatabasePool};
pub use models::{ConnectionDescriptor, ConnectionField, ConnectionRequest, ResolvedCredentials};
pub use registry::{BackendDescriptor, BackendRegistry, DbBackend};
pub use resolver::CredentialResolver;
pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};
