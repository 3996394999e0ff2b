//! Secret store abstraction.
//!
//! Required fields left unresolved by a request can be pulled from an
//! external secret store, addressed by a reference string plus field name.
//! The store implementation (cloud secret manager, environment variables,
//! vault) is behind the [`SecretStore`] trait.

use async_trait::async_trait;

use crate::errors::FactoryResult;

pub mod env;
pub mod memory;

pub use env::EnvSecretStore;
pub use memory::MemorySecretStore;

/// External secret store contract.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetches one secret value.
    ///
    /// Returns `Ok(None)` when the store is reachable but holds no value for
    /// `(secret_ref, field)`. Transport or store failures surface as
    /// `FactoryError::SecretResolution`.
    async fn get_secret(&self, secret_ref: &str, field: &str) -> FactoryResult<Option<String>>;
}
