//! Error types for the database factory.
//!
//! All fallible operations return [`FactoryResult`], with [`FactoryError`]
//! describing the failure cause. Errors surface to the caller immediately;
//! nothing is retried internally.

use thiserror::Error;

use crate::models::ConnectionField;
use crate::registry::DbBackend;

/// Result alias used across the crate.
pub type FactoryResult<T> = Result<T, FactoryError>;

/// Errors produced by the connection factory.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Backend name is not among the supported set.
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// A required field could not be resolved from the request or the secret
    /// store.
    #[error("missing required field `{field}` for backend {backend}")]
    MissingField {
        /// Backend the request targeted.
        backend: DbBackend,
        /// Field that stayed unresolved.
        field: ConnectionField,
    },

    /// Secret store unreachable, lookup failed, or a referenced field is
    /// absent from the store.
    #[error("secret resolution failed: {0}")]
    SecretResolution(String),

    /// Template substitution left unresolved placeholders.
    #[error("template error: {0}")]
    Template(String),

    /// Request-level validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Connecting to the database failed.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// A query against an established connection failed.
    #[error("database query error: {0}")]
    DatabaseQuery(String),

    /// No sqlx driver exists for this backend.
    #[error("no driver available for backend {0}")]
    UnsupportedDriver(DbBackend),

    /// No cached connection with the given name.
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),
}
