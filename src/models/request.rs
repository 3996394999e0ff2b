//! Connection request model.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::field::ConnectionField;
use crate::registry::DbBackend;

/// A caller-supplied connection request.
///
/// Immutable after construction: build it with [`ConnectionRequest::new`] and
/// the `with_*` methods (or deserialize it), then hand it to the factory.
/// Not serializable, since `fields` may carry a plaintext password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = validate_field_values))]
pub struct ConnectionRequest {
    /// Connection display name, also the pool cache key.
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    /// Target backend.
    pub backend: DbBackend,
    /// Explicit connection parameters.
    #[serde(default)]
    pub fields: BTreeMap<ConnectionField, String>,
    /// Reference into the secret store for unresolved required fields.
    #[serde(default)]
    pub secret_ref: Option<String>,
}

impl ConnectionRequest {
    /// Creates a request with no fields set.
    pub fn new(name: impl Into<String>, backend: DbBackend) -> Self {
        Self {
            name: name.into(),
            backend,
            fields: BTreeMap::new(),
            secret_ref: None,
        }
    }

    /// Sets an explicit field value.
    pub fn with_field(mut self, field: ConnectionField, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Sets the secret store reference.
    pub fn with_secret_ref(mut self, secret_ref: impl Into<String>) -> Self {
        self.secret_ref = Some(secret_ref.into());
        self
    }

    /// Returns an explicit field value, if set.
    pub fn field(&self, field: ConnectionField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }
}

/// Schema-level checks that individual field values are well-formed.
fn validate_field_values(req: &ConnectionRequest) -> Result<(), ValidationError> {
    if let Some(port) = req.fields.get(&ConnectionField::Port) {
        if port.parse::<u16>().is_err() {
            return Err(ValidationError::new("port_not_numeric"));
        }
    }
    Ok(())
}
