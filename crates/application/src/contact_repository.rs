use std::sync::Arc;
use std::time::Duration;

use dynsync_core::RepoError;
use dynsync_domain::{Contact, ContactFields};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    ContactEndpoints, CrmClientConfig, CrmRequest, CrmResponse, CrmTransport, TokenProvider,
};

/// Result of an email lookup. An empty match set is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactLookup {
    /// First contact the CRM returned for the email.
    Found(Contact),
    /// No contact has this email.
    NotFound,
}

/// Which write path `upsert` took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new contact was created (HTTP 201).
    Created,
    /// An existing contact was updated (HTTP 204).
    Updated {
        /// CRM id of the updated contact.
        contact_id: String,
    },
}

#[derive(Debug, Deserialize)]
struct ContactPage {
    value: Vec<Contact>,
}

/// Reads and writes contacts through the Dynamics 365 Web API.
///
/// Every call round-trips to the CRM; nothing is cached except the token
/// held by the inner [`TokenProvider`].
pub struct ContactRepository {
    token_provider: TokenProvider,
    transport: Arc<dyn CrmTransport>,
    endpoints: ContactEndpoints,
    request_timeout: Duration,
}

impl ContactRepository {
    /// Creates a repository for the provider's environment.
    #[must_use]
    pub fn new(
        token_provider: TokenProvider,
        transport: Arc<dyn CrmTransport>,
        config: &CrmClientConfig,
    ) -> Self {
        let endpoints = ContactEndpoints::new(token_provider.credentials(), config);
        Self {
            token_provider,
            transport,
            endpoints,
            request_timeout: config.request_timeout,
        }
    }

    /// Looks up a contact by exact `emailaddress1` match.
    ///
    /// When the CRM holds duplicates the first one in server order wins.
    pub async fn find_by_email(&mut self, email: &str) -> Result<ContactLookup, RepoError> {
        let request = CrmRequest::get(self.endpoints.filter_by_email(email));
        let response = self.send(request).await?;

        if response.status != 200 {
            warn!(status = response.status, "contact lookup failed");
            return Err(RepoError::HttpError {
                status: response.status,
                body: response.body,
            });
        }

        let page: ContactPage = serde_json::from_str(&response.body).map_err(|error| {
            RepoError::MalformedResponse(format!("contact lookup body: {error}"))
        })?;

        if page.value.len() > 1 {
            warn!(
                matches = page.value.len(),
                "multiple contacts share this email; using the first"
            );
        }

        Ok(page
            .value
            .into_iter()
            .next()
            .map_or(ContactLookup::NotFound, ContactLookup::Found))
    }

    /// Creates the contact for `email` or updates the existing one.
    ///
    /// The lookup and the write are separate requests. A concurrent create or
    /// delete of the same email in between can produce a duplicate or a write
    /// to a stale id; the Web API offers no idempotency key to prevent it.
    pub async fn upsert(
        &mut self,
        email: &str,
        fields: &ContactFields,
    ) -> Result<UpsertOutcome, RepoError> {
        match self.find_by_email(email).await? {
            ContactLookup::NotFound => self.create(fields).await,
            ContactLookup::Found(contact) => {
                let contact_id = contact.contact_id().ok_or_else(|| {
                    RepoError::MalformedResponse("matched contact has no contactid".to_owned())
                })?;
                self.update(contact_id, fields).await
            }
        }
    }

    async fn create(&mut self, fields: &ContactFields) -> Result<UpsertOutcome, RepoError> {
        let request = CrmRequest::post_json(self.endpoints.collection(), contact_payload(fields)?);
        let response = self.send(request).await?;

        if response.status != 201 {
            warn!(status = response.status, "contact create failed");
            return Err(RepoError::CreateFailed {
                status: response.status,
                body: response.body,
            });
        }

        info!("contact created");
        Ok(UpsertOutcome::Created)
    }

    async fn update(
        &mut self,
        contact_id: &str,
        fields: &ContactFields,
    ) -> Result<UpsertOutcome, RepoError> {
        let request =
            CrmRequest::patch_json(self.endpoints.entity(contact_id), contact_payload(fields)?);
        let response = self.send(request).await?;

        if response.status != 204 {
            warn!(
                status = response.status,
                contact_id = %contact_id,
                "contact update failed"
            );
            return Err(RepoError::UpdateFailed {
                status: response.status,
                body: response.body,
            });
        }

        info!(contact_id = %contact_id, "contact updated");
        Ok(UpsertOutcome::Updated {
            contact_id: contact_id.to_owned(),
        })
    }

    async fn send(&mut self, request: CrmRequest) -> Result<CrmResponse, RepoError> {
        let token = self.token_provider.get_token().await?;
        let request = request
            .with_bearer(token.value())
            .with_timeout(self.request_timeout);

        self.transport.execute(request).await.map_err(|error| {
            warn!(error = %error, "contact request did not reach the CRM");
            RepoError::from(error)
        })
    }
}

fn contact_payload(fields: &ContactFields) -> Result<serde_json::Value, RepoError> {
    serde_json::to_value(fields).map_err(|error| RepoError::Payload(error.to_string()))
}
