//! Resolved credentials and the final connection descriptor.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::field::ConnectionField;
use crate::registry::DbBackend;

/// Fully resolved connection parameters.
///
/// Ephemeral: produced by the credential resolver, consumed by the descriptor
/// builder, then discarded. Not serializable, since it carries plaintext
/// credentials.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    fields: BTreeMap<ConnectionField, String>,
}

impl ResolvedCredentials {
    pub(crate) fn new(fields: BTreeMap<ConnectionField, String>) -> Self {
        Self { fields }
    }

    /// Returns a resolved field value.
    pub fn get(&self, field: ConnectionField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Returns the full resolved field map.
    pub fn fields(&self) -> &BTreeMap<ConnectionField, String> {
        &self.fields
    }
}

/// Final connection descriptor, handed to an external database client.
///
/// Immutable once built; the factory performs no further lifecycle management
/// on it.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionDescriptor {
    /// Target backend.
    pub backend: DbBackend,
    /// Connection URI in the backend's dialect.
    pub uri: String,
    /// Driver-specific parameter bundle (the resolved fields).
    pub params: BTreeMap<ConnectionField, String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ConnectionDescriptor {
    /// Returns a value from the parameter bundle.
    pub fn param(&self, field: ConnectionField) -> Option<&str> {
        self.params.get(&field).map(String::as_str)
    }
}
