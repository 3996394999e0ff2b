//! Environment-variable backed secret store.

use async_trait::async_trait;

use crate::errors::FactoryResult;
use crate::secrets::SecretStore;

/// Secret store reading `<SECRET_REF>_<FIELD>` environment variables.
///
/// The reference and field name are uppercased and non-alphanumeric
/// characters become underscores, so `secret_ref = "prod-pg"` with field
/// `password` reads `PROD_PG_PASSWORD`.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    /// Creates an environment-variable secret store.
    pub fn new() -> Self {
        Self
    }

    fn env_key(secret_ref: &str, field: &str) -> String {
        let sanitize = |s: &str| {
            s.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() {
                        c.to_ascii_uppercase()
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        };
        format!("{}_{}", sanitize(secret_ref), sanitize(field))
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, secret_ref: &str, field: &str) -> FactoryResult<Option<String>> {
        Ok(std::env::var(Self::env_key(secret_ref, field)).ok())
    }
}
