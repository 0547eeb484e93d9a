use std::sync::Arc;

use dynsync_core::{AuthError, ConfigError};
use dynsync_domain::{Credentials, validate_credentials};
use tracing::info;

use crate::{ContactEndpoints, CrmClientConfig, CrmRequest, CrmTransport, TokenProvider};

/// Terminal state of a connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Token acquired and the contacts endpoint answered 200.
    Success,
    /// Credentials failed validation; nothing was sent.
    ConfigInvalid(ConfigError),
    /// Token acquisition failed; the contacts endpoint was not called.
    AuthFailed(AuthError),
    /// Contacts endpoint answered 401.
    Unauthorized,
    /// Contacts endpoint answered 403.
    Forbidden,
    /// Contacts endpoint answered 404.
    NotFound,
    /// Contacts endpoint could not be reached.
    Unreachable(String),
    /// Contacts endpoint answered with any other status.
    ApiError {
        /// HTTP status returned by the CRM.
        status: u16,
    },
}

impl ProbeOutcome {
    fn from_status(status: u16) -> Self {
        match status {
            200 => Self::Success,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            status => Self::ApiError { status },
        }
    }

    /// Returns whether the environment is ready for contact sync.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns a stable identifier of the terminal state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ConfigInvalid(_) => "config_invalid",
            Self::AuthFailed(_) => "auth_failed",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Unreachable(_) => "unreachable",
            Self::ApiError { .. } => "api_error",
        }
    }

    /// Returns the administrator-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Success => "Connection successful! Dynamics 365 sync is ready to use.".to_owned(),
            Self::ConfigInvalid(error) => error.user_message(),
            Self::AuthFailed(AuthError::Network(_)) => {
                "Authentication failed: the Microsoft identity platform could not be reached. \
                 Please check network connectivity."
                    .to_owned()
            }
            Self::AuthFailed(AuthError::InvalidResponse(_)) => {
                "Authentication failed. Please verify your Azure credentials \
                 (Client ID, Client Secret, Tenant ID) are correct."
                    .to_owned()
            }
            Self::Unauthorized => "Authentication failed (401). Please verify your Client ID, \
                 Client Secret, and Tenant ID are correct."
                .to_owned(),
            Self::Forbidden => "Access forbidden (403). Please verify your Azure app has \
                 proper permissions for Dynamics 365."
                .to_owned(),
            Self::NotFound => "Resource not found (404). Please verify your Dynamics 365 \
                 Resource URL is correct."
                .to_owned(),
            Self::Unreachable(detail) => format!(
                "Network connection failed: {detail}. Please check your Resource URL and \
                 network connectivity."
            ),
            Self::ApiError { status } => format!(
                "API request failed with status code: {status}. Please contact the \
                 administrator with this error code."
            ),
        }
    }
}

/// End-to-end health check: validate, authenticate, read one contact.
///
/// Stateless; each run builds its own token provider and never retries.
#[derive(Clone)]
pub struct ConnectionProbe {
    transport: Arc<dyn CrmTransport>,
    config: CrmClientConfig,
}

impl ConnectionProbe {
    /// Creates a probe over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn CrmTransport>, config: CrmClientConfig) -> Self {
        Self { transport, config }
    }

    /// Runs the probe against `credentials`.
    pub async fn test(&self, credentials: &Credentials) -> ProbeOutcome {
        let outcome = self.run(credentials).await;
        info!(outcome = outcome.as_str(), "dynamics connection probe finished");
        outcome
    }

    async fn run(&self, credentials: &Credentials) -> ProbeOutcome {
        if let Err(error) = validate_credentials(credentials) {
            return ProbeOutcome::ConfigInvalid(error);
        }

        let mut token_provider =
            TokenProvider::new(credentials.clone(), self.transport.clone(), &self.config);
        let token = match token_provider.get_token().await {
            Ok(token) => token,
            Err(error) => return ProbeOutcome::AuthFailed(error),
        };

        let endpoints = ContactEndpoints::new(credentials, &self.config);
        let request = CrmRequest::get(endpoints.first_page())
            .with_bearer(token.value())
            .with_timeout(self.config.request_timeout);

        match self.transport.execute(request).await {
            Ok(response) => ProbeOutcome::from_status(response.status),
            Err(error) => ProbeOutcome::Unreachable(error.to_string()),
        }
    }
}
