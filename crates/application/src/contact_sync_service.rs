use std::sync::Arc;

use dynsync_core::{AuthError, ConfigError, FormErrors, RepoError, SyncError};
use dynsync_domain::{Contact, ContactFields, Credentials, validate_credentials};
use tracing::{info, warn};

use crate::crm_ports::{read_credentials, write_credentials};
use crate::{
    ConnectionProbe, ContactLookup, ContactRepository, CredentialStore, CrmClientConfig,
    CrmTransport, ProbeOutcome, TokenProvider, UpsertOutcome,
};

/// What the contact form should be pre-filled with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPrefill {
    /// Existing CRM contact for the user, if any.
    pub contact: Option<Contact>,
    /// Message to show above the form when the lookup failed.
    pub notice: Option<String>,
}

/// Entry points used by the host application.
///
/// Every call reads credentials fresh from the store and builds its own token
/// provider and repository, so nothing is shared between requests.
#[derive(Clone)]
pub struct ContactSyncService {
    credential_store: Arc<dyn CredentialStore>,
    transport: Arc<dyn CrmTransport>,
    config: CrmClientConfig,
}

impl ContactSyncService {
    /// Creates a new service from its ports.
    #[must_use]
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        transport: Arc<dyn CrmTransport>,
        config: CrmClientConfig,
    ) -> Self {
        Self {
            credential_store,
            transport,
            config,
        }
    }

    /// Returns the stored credentials without validating them.
    pub async fn load_credentials(&self) -> Credentials {
        read_credentials(self.credential_store.as_ref()).await
    }

    /// Validates the stored credentials without touching the network.
    pub async fn validate_config(&self) -> Result<Credentials, ConfigError> {
        let credentials = self.load_credentials().await;
        validate_credentials(&credentials)?;
        Ok(credentials)
    }

    /// Trims, validates and stores a new credential set.
    ///
    /// Nothing is written unless all four fields pass validation.
    pub async fn save_credentials(&self, credentials: &Credentials) -> Result<(), ConfigError> {
        let credentials = credentials.trimmed();
        validate_credentials(&credentials).inspect_err(|error| {
            warn!(error = %error, "rejected dynamics credentials");
        })?;

        write_credentials(self.credential_store.as_ref(), &credentials).await;
        info!(
            tenant_id = %credentials.tenant_id(),
            resource_url = %credentials.resource_base(),
            "dynamics credentials saved"
        );
        Ok(())
    }

    /// Runs the connection probe against the stored credentials.
    pub async fn test_connection(&self) -> ProbeOutcome {
        let credentials = self.load_credentials().await;
        ConnectionProbe::new(self.transport.clone(), self.config.clone())
            .test(&credentials)
            .await
    }

    /// Creates or updates the CRM contact identified by `email`.
    pub async fn sync_contact(
        &self,
        email: &str,
        fields: &ContactFields,
    ) -> Result<UpsertOutcome, SyncError> {
        let email = require_email(email)?;
        let mut repository = self.repository().await?;

        let outcome = repository.upsert(email, fields).await.inspect_err(|error| {
            warn!(error = %error, "contact sync failed");
        })?;
        Ok(outcome)
    }

    /// Reads the CRM contact identified by `email`.
    pub async fn fetch_contact(&self, email: &str) -> Result<ContactLookup, SyncError> {
        let email = require_email(email)?;
        let mut repository = self.repository().await?;

        let lookup = repository.find_by_email(email).await.inspect_err(|error| {
            warn!(error = %error, "contact fetch failed");
        })?;
        Ok(lookup)
    }

    /// Fetches the contact for pre-filling the form, degrading to an empty
    /// form when anything goes wrong.
    ///
    /// Unconfigured credentials are silent; CRM failures carry a notice.
    pub async fn prefill_contact(&self, email: &str) -> ContactPrefill {
        match self.fetch_contact(email).await {
            Ok(ContactLookup::Found(contact)) => ContactPrefill {
                contact: Some(contact),
                notice: None,
            },
            Ok(ContactLookup::NotFound) | Err(SyncError::Config(_) | SyncError::Form(_)) => {
                ContactPrefill::default()
            }
            Err(SyncError::Repo(error)) => ContactPrefill {
                contact: None,
                notice: Some(prefill_notice(&error).to_owned()),
            },
        }
    }

    async fn repository(&self) -> Result<ContactRepository, ConfigError> {
        let credentials = self.validate_config().await?;
        let token_provider = TokenProvider::new(credentials, self.transport.clone(), &self.config);
        Ok(ContactRepository::new(
            token_provider,
            self.transport.clone(),
            &self.config,
        ))
    }
}

fn require_email(email: &str) -> Result<&str, FormErrors> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormErrors::new(vec!["Email is required.".to_owned()]));
    }
    Ok(email)
}

fn prefill_notice(error: &RepoError) -> &'static str {
    match error {
        RepoError::Auth(AuthError::InvalidResponse(_) | AuthError::Network(_)) => {
            "Unable to authenticate with Microsoft Dynamics 365."
        }
        RepoError::Transport(_) => "Network error while connecting to Dynamics 365.",
        _ => "Unable to retrieve your information from Dynamics 365.",
    }
}

#[cfg(test)]
mod tests;
