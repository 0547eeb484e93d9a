use thiserror::Error;

use crate::{CredentialField, FormatIssue};

/// Stored credentials are absent or malformed.
///
/// Raised before any network call is attempted. Always fixable by an
/// administrator through the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more fields are empty or whitespace-only.
    #[error("missing configuration: {}", join_labels(.0))]
    MissingField(Vec<CredentialField>),

    /// A present field failed its syntactic check.
    #[error("invalid {field}: {reason}")]
    InvalidFormat {
        /// Field that failed.
        field: CredentialField,
        /// Why it failed.
        reason: FormatIssue,
    },
}

impl ConfigError {
    /// Returns the message shown to end users and administrators.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField(fields) => format!(
                "Microsoft Dynamics 365 is not properly configured. Missing: {}. \
                 Please contact the administrator to configure these settings.",
                join_labels(fields)
            ),
            Self::InvalidFormat { field, reason } => format!(
                "{field} format is invalid: it {reason}. \
                 Please check the Dynamics 365 connection settings."
            ),
        }
    }
}

fn join_labels(fields: &[CredentialField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure raised by the HTTP transport before a status code was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// DNS resolution, refused connection or TLS handshake failure.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request did not complete within its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Access token acquisition failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The identity provider could not be reached.
    #[error("token endpoint unreachable: {0}")]
    Network(String),

    /// The identity provider answered without a usable `access_token`.
    #[error("token endpoint returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Returns the message shown to end users; detail stays in logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        "Authentication with Microsoft Dynamics 365 failed. Please contact the administrator."
            .to_owned()
    }
}

impl From<TransportError> for AuthError {
    fn from(value: TransportError) -> Self {
        Self::Network(value.to_string())
    }
}

/// Contact lookup or write against the CRM failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    /// No token could be acquired for the call.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The CRM could not be reached.
    #[error("CRM request failed: {0}")]
    Transport(String),

    /// Lookup returned a non-200 status.
    #[error("CRM lookup failed with status {status}: {body}")]
    HttpError {
        /// HTTP status returned by the CRM.
        status: u16,
        /// Raw response body, for administrators only.
        body: String,
    },

    /// Create returned something other than 201.
    #[error("contact create failed with status {status}: {body}")]
    CreateFailed {
        /// HTTP status returned by the CRM.
        status: u16,
        /// Raw response body, for administrators only.
        body: String,
    },

    /// Update returned something other than 204.
    #[error("contact update failed with status {status}: {body}")]
    UpdateFailed {
        /// HTTP status returned by the CRM.
        status: u16,
        /// Raw response body, for administrators only.
        body: String,
    },

    /// A 200 response whose body could not be interpreted.
    #[error("CRM returned a malformed response: {0}")]
    MalformedResponse(String),

    /// The outgoing contact payload could not be encoded.
    #[error("failed to encode contact payload: {0}")]
    Payload(String),
}

impl RepoError {
    /// Returns the message shown to end users. Never includes response bodies.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(error) => error.user_message(),
            Self::Transport(_) => "Network error while connecting to Dynamics 365.".to_owned(),
            Self::HttpError { status, .. } => {
                format!("Unable to retrieve your information from Dynamics 365 (status {status}).")
            }
            Self::CreateFailed { status, .. } => {
                format!("Failed to create contact in Dynamics 365 (status {status}).")
            }
            Self::UpdateFailed { status, .. } => {
                format!("Failed to update contact in Dynamics 365 (status {status}).")
            }
            Self::MalformedResponse(_) => {
                "Dynamics 365 returned an unexpected response.".to_owned()
            }
            Self::Payload(_) => "Your contact details could not be prepared for sync.".to_owned(),
        }
    }
}

impl From<TransportError> for RepoError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Contact form violations, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please correct the following errors: {}", .0.join(" "))]
pub struct FormErrors(Vec<String>);

impl FormErrors {
    /// Wraps a non-empty list of violation messages.
    #[must_use]
    pub fn new(messages: Vec<String>) -> Self {
        Self(messages)
    }

    /// Returns every violation message.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        self.0.as_slice()
    }
}

/// Error returned by the collaborator-facing sync entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Stored credentials are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The CRM round trip failed.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// Submitted contact data is invalid.
    #[error(transparent)]
    Form(#[from] FormErrors),
}

impl SyncError {
    /// Returns the single user-displayable message for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(error) => error.user_message(),
            Self::Repo(error) => error.user_message(),
            Self::Form(error) => error.to_string(),
        }
    }
}

impl From<AuthError> for SyncError {
    fn from(value: AuthError) -> Self {
        Self::Repo(RepoError::Auth(value))
    }
}
