use async_trait::async_trait;
use dynsync_core::CredentialField;
use dynsync_domain::Credentials;

/// Key-value settings store holding the Dynamics 365 credentials.
///
/// Absent keys read as an empty string.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the value stored under `key`, or an empty string.
    async fn get(&self, key: &str) -> String;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str);
}

/// Reads all four credential settings.
pub(crate) async fn read_credentials(store: &dyn CredentialStore) -> Credentials {
    Credentials::new(
        store.get(CredentialField::ClientId.store_key()).await,
        store.get(CredentialField::ClientSecret.store_key()).await,
        store.get(CredentialField::TenantId.store_key()).await,
        store.get(CredentialField::ResourceUrl.store_key()).await,
    )
}

/// Writes all four credential settings.
pub(crate) async fn write_credentials(store: &dyn CredentialStore, credentials: &Credentials) {
    for field in CredentialField::ALL {
        store.set(field.store_key(), credentials.value(field)).await;
    }
}
