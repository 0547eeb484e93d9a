//! Shared primitives for all Rust crates in Dynamics Sync.

#![forbid(unsafe_code)]

/// Error taxonomy shared by every layer of the sync client.
pub mod errors;

use std::fmt::{Display, Formatter};

pub use errors::{AuthError, ConfigError, FormErrors, RepoError, SyncError, TransportError};

/// One of the four settings the sync client needs to talk to Dynamics 365.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialField {
    /// Azure AD application (client) identifier.
    ClientId,
    /// Azure AD application secret.
    ClientSecret,
    /// Azure AD directory (tenant) identifier.
    TenantId,
    /// Base URL of the Dynamics 365 environment.
    ResourceUrl,
}

impl CredentialField {
    /// Every credential field, in the order administrators see them.
    pub const ALL: [Self; 4] = [
        Self::ClientId,
        Self::ClientSecret,
        Self::TenantId,
        Self::ResourceUrl,
    ];

    /// Returns the settings-store key holding this field.
    #[must_use]
    pub fn store_key(self) -> &'static str {
        match self {
            Self::ClientId => "dynamics_client_id",
            Self::ClientSecret => "dynamics_client_secret",
            Self::TenantId => "dynamics_tenant_id",
            Self::ResourceUrl => "dynamics_resource_url",
        }
    }

    /// Returns the human readable field label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ClientId => "Client ID",
            Self::ClientSecret => "Client Secret",
            Self::TenantId => "Tenant ID",
            Self::ResourceUrl => "Resource URL",
        }
    }

    /// Returns the stable snake_case identifier used in API payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientId => "client_id",
            Self::ClientSecret => "client_secret",
            Self::TenantId => "tenant_id",
            Self::ResourceUrl => "resource_url",
        }
    }
}

impl Display for CredentialField {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Reason a present credential value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatIssue {
    /// Value is not an RFC 4122 shaped UUID.
    NotUuid,
    /// Secret is shorter than the required minimum.
    SecretTooShort {
        /// Minimum number of characters.
        min_length: usize,
    },
    /// Value does not parse as an absolute URL.
    NotAbsoluteUrl,
    /// URL scheme is not `https`.
    NotHttps,
    /// URL host is not a `*.crm<N>.dynamics.com` host.
    NotDynamicsHost,
}

impl Display for FormatIssue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotUuid => formatter.write_str(
                "must be a UUID (e.g. 12345678-1234-1234-1234-123456789abc)",
            ),
            Self::SecretTooShort { min_length } => {
                write!(formatter, "must be at least {min_length} characters long")
            }
            Self::NotAbsoluteUrl => formatter.write_str("must be a valid absolute URL"),
            Self::NotHttps => formatter.write_str("must use the https scheme"),
            Self::NotDynamicsHost => formatter.write_str(
                "must be a Dynamics 365 instance (e.g. https://yourorg.crm.dynamics.com)",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialField, FormatIssue};

    #[test]
    fn credential_fields_map_to_store_keys() {
        let keys: Vec<&str> = CredentialField::ALL
            .iter()
            .map(|field| field.store_key())
            .collect();
        assert_eq!(
            keys,
            vec![
                "dynamics_client_id",
                "dynamics_client_secret",
                "dynamics_tenant_id",
                "dynamics_resource_url",
            ]
        );
    }

    #[test]
    fn secret_issue_mentions_minimum_length() {
        let issue = FormatIssue::SecretTooShort { min_length: 32 };
        assert!(issue.to_string().contains("32"));
    }
}
