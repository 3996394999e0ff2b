//! Connection field names.
//!
//! Every backend draws its required and optional parameters from this fixed,
//! enumerated set; free-form keys are rejected at deserialization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FactoryError;

/// Enumerated connection parameter names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionField {
    /// Database host (network backends).
    Host,
    /// Database port.
    Port,
    /// Login username.
    #[serde(alias = "user")]
    Username,
    /// Login password.
    Password,
    /// Database name.
    #[serde(alias = "dbname")]
    Database,
    /// SQLite file path.
    #[serde(alias = "path")]
    FilePath,
    /// Snowflake account identifier.
    Account,
    /// Snowflake virtual warehouse.
    Warehouse,
    /// Schema within the database.
    Schema,
    /// Snowflake role.
    Role,
    /// BigQuery project ID.
    Project,
    /// BigQuery dataset.
    Dataset,
    /// BigQuery processing location.
    Location,
    /// SQLite open mode.
    Mode,
}

impl ConnectionField {
    /// Returns the canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionField::Host => "host",
            ConnectionField::Port => "port",
            ConnectionField::Username => "username",
            ConnectionField::Password => "password",
            ConnectionField::Database => "database",
            ConnectionField::FilePath => "file_path",
            ConnectionField::Account => "account",
            ConnectionField::Warehouse => "warehouse",
            ConnectionField::Schema => "schema",
            ConnectionField::Role => "role",
            ConnectionField::Project => "project",
            ConnectionField::Dataset => "dataset",
            ConnectionField::Location => "location",
            ConnectionField::Mode => "mode",
        }
    }
}

impl fmt::Display for ConnectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConnectionField {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(ConnectionField::Host),
            "port" => Ok(ConnectionField::Port),
            "username" | "user" => Ok(ConnectionField::Username),
            "password" => Ok(ConnectionField::Password),
            "database" | "dbname" => Ok(ConnectionField::Database),
            "file_path" | "path" => Ok(ConnectionField::FilePath),
            "account" => Ok(ConnectionField::Account),
            "warehouse" => Ok(ConnectionField::Warehouse),
            "schema" => Ok(ConnectionField::Schema),
            "role" => Ok(ConnectionField::Role),
            "project" => Ok(ConnectionField::Project),
            "dataset" => Ok(ConnectionField::Dataset),
            "location" => Ok(ConnectionField::Location),
            "mode" => Ok(ConnectionField::Mode),
            other => Err(FactoryError::Validation(format!(
                "unknown connection field: {}",
                other
            ))),
        }
    }
}
