//! Credential resolution.
//!
//! Turns a [`ConnectionRequest`] into [`ResolvedCredentials`] against a
//! backend descriptor. Resolution is all-or-nothing: any failure aborts and
//! no partially resolved state escapes.

use std::collections::BTreeMap;
use std::sync::Arc;

use validator::Validate;

use crate::errors::{FactoryError, FactoryResult};
use crate::models::{ConnectionField, ConnectionRequest, ResolvedCredentials};
use crate::registry::BackendDescriptor;
use crate::secrets::SecretStore;

/// Resolves connection credentials from explicit fields and the secret store.
///
/// Each resolution is an independent, stateless call; concurrent resolutions
/// need no coordination. The only blocking operation is the secret store
/// lookup; callers needing cancellation or timeouts apply them there.
#[derive(Clone, Default)]
pub struct CredentialResolver {
    secret_store: Option<Arc<dyn SecretStore>>,
}

impl CredentialResolver {
    /// Creates a resolver without secret store access.
    pub fn new() -> Self {
        Self { secret_store: None }
    }

    /// Creates a resolver backed by a secret store.
    pub fn with_secret_store(secret_store: Arc<dyn SecretStore>) -> Self {
        Self {
            secret_store: Some(secret_store),
        }
    }

    /// Resolves all fields of `request` against `descriptor`.
    ///
    /// Required fields take the explicit request value when present, else a
    /// secret store lookup when `secret_ref` is set, else fail with
    /// `MissingField`. Optional fields take the explicit value, else the
    /// descriptor default, else are omitted; the store is never consulted
    /// for them, so a request carrying every required field explicitly
    /// performs no store lookups.
    pub async fn resolve(
        &self,
        request: &ConnectionRequest,
        descriptor: &BackendDescriptor,
    ) -> FactoryResult<ResolvedCredentials> {
        request
            .validate()
            .map_err(|e| FactoryError::Validation(e.to_string()))?;
        if request.backend != descriptor.backend {
            return Err(FactoryError::Validation(format!(
                "request targets {} but descriptor is for {}",
                request.backend, descriptor.backend
            )));
        }

        let mut fields = BTreeMap::new();

        for &field in descriptor.required_fields {
            if let Some(value) = request.field(field) {
                fields.insert(field, value.to_string());
                continue;
            }
            let Some(secret_ref) = request.secret_ref.as_deref() else {
                return Err(FactoryError::MissingField {
                    backend: descriptor.backend,
                    field,
                });
            };
            let value = self.lookup_secret(secret_ref, field).await?;
            fields.insert(field, value);
        }

        for &(field, default) in descriptor.optional_fields {
            if let Some(value) = request.field(field) {
                fields.insert(field, value.to_string());
            } else if let Some(default) = default {
                fields.insert(field, default.to_string());
            }
        }

        tracing::debug!(
            name = %request.name,
            backend = %descriptor.backend,
            fields = fields.len(),
            "credentials resolved"
        );
        Ok(ResolvedCredentials::new(fields))
    }

    async fn lookup_secret(
        &self,
        secret_ref: &str,
        field: ConnectionField,
    ) -> FactoryResult<String> {
        let Some(store) = &self.secret_store else {
            return Err(FactoryError::SecretResolution(format!(
                "secret reference `{}` given but no secret store is configured",
                secret_ref
            )));
        };
        match store.get_secret(secret_ref, field.as_str()).await? {
            Some(value) => Ok(value),
            None => Err(FactoryError::SecretResolution(format!(
                "field `{}` not found under reference `{}`",
                field, secret_ref
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BackendRegistry, DbBackend};
    use crate::secrets::MemorySecretStore;

    fn postgres_request() -> ConnectionRequest {
        ConnectionRequest::new("orders", DbBackend::Postgres)
            .with_field(ConnectionField::Host, "db.local")
            .with_field(ConnectionField::Username, "a")
            .with_field(ConnectionField::Password, "p")
            .with_field(ConnectionField::Database, "x")
    }

    #[tokio::test]
    async fn test_explicit_fields_skip_secret_store() {
        crate::test_util::init_tracing();
        let store = Arc::new(MemorySecretStore::new());
        let resolver = CredentialResolver::with_secret_store(store.clone());
        let descriptor = BackendRegistry::descriptor(DbBackend::Postgres);

        // Even with a secret_ref set, fully explicit requests stay local.
        let request = postgres_request().with_secret_ref("prod-pg");
        let credentials = resolver.resolve(&request, descriptor).await.unwrap();

        assert_eq!(credentials.get(ConnectionField::Host), Some("db.local"));
        assert_eq!(store.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_required_field_without_secret_ref() {
        let resolver = CredentialResolver::new();
        let descriptor = BackendRegistry::descriptor(DbBackend::Postgres);
        let request = ConnectionRequest::new("orders", DbBackend::Postgres)
            .with_field(ConnectionField::Host, "db.local");

        let err = resolver.resolve(&request, descriptor).await.unwrap_err();
        assert!(matches!(
            err,
            FactoryError::MissingField {
                backend: DbBackend::Postgres,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_secret_store_fills_missing_required_fields() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("prod-pg", "username", "a");
        store.insert("prod-pg", "password", "p");
        let resolver = CredentialResolver::with_secret_store(store.clone());
        let descriptor = BackendRegistry::descriptor(DbBackend::Postgres);

        let request = ConnectionRequest::new("orders", DbBackend::Postgres)
            .with_field(ConnectionField::Host, "db.local")
            .with_field(ConnectionField::Database, "x")
            .with_secret_ref("prod-pg");
        let credentials = resolver.resolve(&request, descriptor).await.unwrap();

        assert_eq!(credentials.get(ConnectionField::Username), Some("a"));
        assert_eq!(credentials.get(ConnectionField::Password), Some("p"));
        assert_eq!(store.lookup_count(), 2);
    }

    #[tokio::test]
    async fn test_field_absent_from_store_is_secret_resolution_error() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("prod-pg", "username", "a");
        let resolver = CredentialResolver::with_secret_store(store);
        let descriptor = BackendRegistry::descriptor(DbBackend::Postgres);

        let request = ConnectionRequest::new("orders", DbBackend::Postgres)
            .with_field(ConnectionField::Host, "db.local")
            .with_field(ConnectionField::Database, "x")
            .with_secret_ref("prod-pg");

        let err = resolver.resolve(&request, descriptor).await.unwrap_err();
        assert!(matches!(err, FactoryError::SecretResolution(_)));
    }

    #[tokio::test]
    async fn test_unreachable_store_aborts_resolution() {
        let resolver =
            CredentialResolver::with_secret_store(Arc::new(MemorySecretStore::failing()));
        let descriptor = BackendRegistry::descriptor(DbBackend::Postgres);
        let request = ConnectionRequest::new("orders", DbBackend::Postgres)
            .with_field(ConnectionField::Host, "db.local")
            .with_secret_ref("prod-pg");

        let err = resolver.resolve(&request, descriptor).await.unwrap_err();
        assert!(matches!(err, FactoryError::SecretResolution(_)));
    }

    #[tokio::test]
    async fn test_secret_ref_without_store_is_secret_resolution_error() {
        let resolver = CredentialResolver::new();
        let descriptor = BackendRegistry::descriptor(DbBackend::Postgres);
        let request = ConnectionRequest::new("orders", DbBackend::Postgres)
            .with_secret_ref("prod-pg");

        let err = resolver.resolve(&request, descriptor).await.unwrap_err();
        assert!(matches!(err, FactoryError::SecretResolution(_)));
    }

    #[tokio::test]
    async fn test_optional_default_applied() {
        static TEST_DESCRIPTOR: BackendDescriptor = BackendDescriptor {
            backend: DbBackend::SQLite,
            required_fields: &[ConnectionField::FilePath],
            optional_fields: &[(ConnectionField::Mode, Some("ro"))],
            uri_template: "sqlite:///{file_path}",
            query_fields: &[ConnectionField::Mode],
        };
        let resolver = CredentialResolver::new();
        let request = ConnectionRequest::new("scratch", DbBackend::SQLite)
            .with_field(ConnectionField::FilePath, "/tmp/t.db");

        let credentials = resolver.resolve(&request, &TEST_DESCRIPTOR).await.unwrap();
        assert_eq!(credentials.get(ConnectionField::Mode), Some("ro"));
    }

    #[tokio::test]
    async fn test_backend_mismatch_rejected() {
        let resolver = CredentialResolver::new();
        let descriptor = BackendRegistry::descriptor(DbBackend::MySQL);
        let err = resolver
            .resolve(&postgres_request(), descriptor)
            .await
            .unwrap_err();
        assert!(matches!(err, FactoryError::Validation(_)));
    }
}
