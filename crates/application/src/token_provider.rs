use std::sync::Arc;

use dynsync_core::AuthError;
use dynsync_domain::{AccessToken, Credentials};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{CrmClientConfig, CrmRequest, CrmResponse, CrmTransport};

/// Acquires an OAuth2 client-credentials token and caches it for its own
/// lifetime.
///
/// There is no expiry tracking. Build a new provider to get a new token.
pub struct TokenProvider {
    credentials: Credentials,
    transport: Arc<dyn CrmTransport>,
    token_endpoint: String,
    cached_token: Option<AccessToken>,
}

impl TokenProvider {
    /// Creates a provider with an empty cache.
    #[must_use]
    pub fn new(
        credentials: Credentials,
        transport: Arc<dyn CrmTransport>,
        config: &CrmClientConfig,
    ) -> Self {
        let token_endpoint = config.token_endpoint(credentials.tenant_id());
        Self {
            credentials,
            transport,
            token_endpoint,
            cached_token: None,
        }
    }

    /// Returns the credentials this provider authenticates with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the cached token, if one was acquired.
    #[must_use]
    pub fn cached_token(&self) -> Option<&AccessToken> {
        self.cached_token.as_ref()
    }

    /// Returns the cached token or requests a new one.
    pub async fn get_token(&mut self) -> Result<AccessToken, AuthError> {
        if let Some(token) = &self.cached_token {
            debug!("using cached dynamics access token");
            return Ok(token.clone());
        }

        let token = self.acquire_token().await?;
        self.cached_token = Some(token.clone());
        Ok(token)
    }

    async fn acquire_token(&self) -> Result<AccessToken, AuthError> {
        debug!(
            tenant_id = %self.credentials.tenant_id(),
            "requesting dynamics access token"
        );

        let request = CrmRequest::post_form(
            self.token_endpoint.as_str(),
            vec![
                ("grant_type".to_owned(), "client_credentials".to_owned()),
                (
                    "client_id".to_owned(),
                    self.credentials.client_id().to_owned(),
                ),
                (
                    "client_secret".to_owned(),
                    self.credentials.client_secret().to_owned(),
                ),
                (
                    "resource".to_owned(),
                    self.credentials.resource_base().to_owned(),
                ),
            ],
        );

        let response = self.transport.execute(request).await.map_err(|error| {
            warn!(error = %error, "token endpoint unreachable");
            AuthError::from(error)
        })?;

        parse_token_response(&response).inspect_err(|error| {
            warn!(status = response.status, error = %error, "token request rejected");
        })
    }
}

fn parse_token_response(response: &CrmResponse) -> Result<AccessToken, AuthError> {
    let payload: Value = serde_json::from_str(&response.body).map_err(|error| {
        AuthError::InvalidResponse(format!(
            "status {}: body is not JSON ({error})",
            response.status
        ))
    })?;

    match payload.get("access_token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
        _ => {
            let detail = payload
                .get("error_description")
                .or_else(|| payload.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("access_token missing");
            Err(AuthError::InvalidResponse(format!(
                "status {}: {detail}",
                response.status
            )))
        }
    }
}
