use std::collections::HashMap;

use async_trait::async_trait;
use dynsync_application::CredentialStore;
use dynsync_core::CredentialField;
use dynsync_domain::Credentials;
use tokio::sync::RwLock;

/// Process-local settings store for the Dynamics 365 credentials.
///
/// Values live for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the non-empty fields of `credentials`.
    #[must_use]
    pub fn with_credentials(credentials: &Credentials) -> Self {
        let values = CredentialField::ALL
            .into_iter()
            .map(|field| (field, credentials.value(field).trim()))
            .filter(|(_, value)| !value.is_empty())
            .map(|(field, value)| (field.store_key().to_owned(), value.to_owned()))
            .collect();

        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: &str) -> String {
        self.values
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    async fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
    }
}
