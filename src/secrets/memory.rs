//! In-memory secret store.
//!
//! Backs tests and embedded use. Counts lookups so callers can assert when
//! the store was (or was not) consulted, and can be switched into a failing
//! mode to exercise error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::errors::{FactoryError, FactoryResult};
use crate::secrets::SecretStore;

/// Map-backed secret store with a lookup counter.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<(String, String), String>>,
    lookups: AtomicUsize,
    fail: bool,
}

impl MemorySecretStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every lookup fails, simulating an unreachable
    /// backend.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Stores a secret value under `(secret_ref, field)`.
    pub fn insert(
        &self,
        secret_ref: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.secrets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((secret_ref.into(), field.into()), value.into());
    }

    /// Number of lookups performed against this store.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, secret_ref: &str, field: &str) -> FactoryResult<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FactoryError::SecretResolution(
                "secret store unavailable".to_string(),
            ));
        }
        let secrets = self
            .secrets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(secrets
            .get(&(secret_ref.to_string(), field.to_string()))
            .cloned())
    }
}
