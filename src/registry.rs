//! Backend registry.
//!
//! Maps backend names to descriptor templates and required/optional field
//! lists. The table is fixed at compile time; no runtime mutation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{FactoryError, FactoryResult};
use crate::models::ConnectionField;

/// Database backend enumeration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DbBackend {
    /// SQLite file database.
    SQLite,
    /// PostgreSQL database.
    Postgres,
    /// MySQL database.
    MySQL,
    /// Snowflake data warehouse.
    Snowflake,
    /// Google BigQuery.
    BigQuery,
}

impl DbBackend {
    /// Returns the default port for this backend.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            DbBackend::SQLite => None,
            DbBackend::Postgres => Some(5432),
            DbBackend::MySQL => Some(3306),
            DbBackend::Snowflake => Some(443),
            DbBackend::BigQuery => None,
        }
    }

    /// True for backends reached over the network.
    pub fn is_remote(&self) -> bool {
        !matches!(self, DbBackend::SQLite)
    }
}

impl fmt::Display for DbBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbBackend::SQLite => write!(f, "sqlite"),
            DbBackend::Postgres => write!(f, "postgres"),
            DbBackend::MySQL => write!(f, "mysql"),
            DbBackend::Snowflake => write!(f, "snowflake"),
            DbBackend::BigQuery => write!(f, "bigquery"),
        }
    }
}

impl FromStr for DbBackend {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DbBackend::SQLite),
            "postgres" | "postgresql" => Ok(DbBackend::Postgres),
            "mysql" => Ok(DbBackend::MySQL),
            "snowflake" => Ok(DbBackend::Snowflake),
            "bigquery" => Ok(DbBackend::BigQuery),
            _ => Err(FactoryError::UnknownBackend(s.to_string())),
        }
    }
}

/// Immutable per-backend descriptor template.
///
/// `uri_template` substitutes `{field}` placeholders and drops `[..{field}..]`
/// segments whose field did not resolve. `query_fields` are appended as URI
/// query parameters, in order, when resolved.
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    /// Backend this descriptor belongs to.
    pub backend: DbBackend,
    /// Fields that must resolve for a connection to be possible.
    pub required_fields: &'static [ConnectionField],
    /// Optional fields with their defaults (`None` = omitted when unresolved).
    pub optional_fields: &'static [(ConnectionField, Option<&'static str>)],
    /// URI template in the backend's dialect.
    pub uri_template: &'static str,
    /// Optional fields rendered as URI query parameters.
    pub query_fields: &'static [ConnectionField],
}

impl BackendDescriptor {
    /// True if `field` must resolve for this backend.
    pub fn is_required(&self, field: ConnectionField) -> bool {
        self.required_fields.contains(&field)
    }

    /// Returns the default for an optional field, if any.
    pub fn default_for(&self, field: ConnectionField) -> Option<&'static str> {
        self.optional_fields
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, default)| *default)
    }
}

/// Fixed backend table, indexed by [`BackendRegistry::descriptor`].
static DESCRIPTORS: [BackendDescriptor; 5] = [
    BackendDescriptor {
        backend: DbBackend::SQLite,
        required_fields: &[ConnectionField::FilePath],
        optional_fields: &[(ConnectionField::Mode, None)],
        uri_template: "sqlite:///{file_path}",
        query_fields: &[ConnectionField::Mode],
    },
    BackendDescriptor {
        backend: DbBackend::Postgres,
        required_fields: &[
            ConnectionField::Host,
            ConnectionField::Username,
            ConnectionField::Password,
            ConnectionField::Database,
        ],
        optional_fields: &[(ConnectionField::Port, None)],
        uri_template: "postgresql://{username}:{password}@{host}[:{port}]/{database}",
        query_fields: &[],
    },
    BackendDescriptor {
        backend: DbBackend::MySQL,
        required_fields: &[
            ConnectionField::Host,
            ConnectionField::Username,
            ConnectionField::Password,
            ConnectionField::Database,
        ],
        optional_fields: &[(ConnectionField::Port, None)],
        uri_template: "mysql://{username}:{password}@{host}[:{port}]/{database}",
        query_fields: &[],
    },
    BackendDescriptor {
        backend: DbBackend::Snowflake,
        required_fields: &[
            ConnectionField::Account,
            ConnectionField::Username,
            ConnectionField::Password,
            ConnectionField::Database,
        ],
        optional_fields: &[
            (ConnectionField::Schema, None),
            (ConnectionField::Warehouse, None),
            (ConnectionField::Role, None),
        ],
        uri_template: "snowflake://{username}:{password}@{account}/{database}[/{schema}]",
        query_fields: &[ConnectionField::Warehouse, ConnectionField::Role],
    },
    BackendDescriptor {
        backend: DbBackend::BigQuery,
        required_fields: &[ConnectionField::Project],
        optional_fields: &[
            (ConnectionField::Dataset, None),
            (ConnectionField::Location, None),
        ],
        uri_template: "bigquery://{project}[/{dataset}]",
        query_fields: &[ConnectionField::Location],
    },
];

/// Read-only registry over the fixed backend table.
pub struct BackendRegistry;

impl BackendRegistry {
    /// Looks up a descriptor by backend name.
    ///
    /// # Errors
    /// Returns `FactoryError::UnknownBackend` if the name is not among the
    /// supported set.
    pub fn get(name: &str) -> FactoryResult<&'static BackendDescriptor> {
        let backend = name.parse::<DbBackend>()?;
        Ok(Self::descriptor(backend))
    }

    /// Looks up a descriptor by backend.
    pub fn descriptor(backend: DbBackend) -> &'static BackendDescriptor {
        let index = match backend {
            DbBackend::SQLite => 0,
            DbBackend::Postgres => 1,
            DbBackend::MySQL => 2,
            DbBackend::Snowflake => 3,
            DbBackend::BigQuery => 4,
        };
        &DESCRIPTORS[index]
    }

    /// Iterates the supported backends.
    pub fn supported() -> impl Iterator<Item = DbBackend> {
        DESCRIPTORS.iter().map(|d| d.backend)
    }
}
