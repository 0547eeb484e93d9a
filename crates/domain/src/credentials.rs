//! Dynamics 365 connection credentials and their validation rules.
//!
//! Validation is pure: it never touches the network and never mutates the
//! credentials it inspects.

use std::fmt::{Debug, Formatter};

use dynsync_core::{ConfigError, CredentialField, FormatIssue};
use url::Url;
use uuid::{Uuid, Variant};

/// Minimum accepted length of an Azure AD client secret.
pub const MIN_CLIENT_SECRET_LENGTH: usize = 32;

/// The four settings needed to reach a Dynamics 365 environment.
///
/// Either all four are present and individually valid, or the set counts as
/// not configured. See [`validate_credentials`].
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    tenant_id: String,
    resource_url: String,
}

impl Credentials {
    /// Creates a credential set from raw setting values.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: impl Into<String>,
        resource_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenant_id: tenant_id.into(),
            resource_url: resource_url.into(),
        }
    }

    /// Returns a copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.client_id.trim(),
            self.client_secret.trim(),
            self.tenant_id.trim(),
            self.resource_url.trim(),
        )
    }

    /// Returns the Azure AD application identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// Returns the Azure AD application secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        self.client_secret.as_str()
    }

    /// Returns the Azure AD tenant identifier.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        self.tenant_id.as_str()
    }

    /// Returns the resource URL exactly as configured.
    #[must_use]
    pub fn resource_url(&self) -> &str {
        self.resource_url.as_str()
    }

    /// Returns the resource URL without trailing slashes.
    ///
    /// Used both as the OAuth2 `resource` parameter and as the base of every
    /// Web API path.
    #[must_use]
    pub fn resource_base(&self) -> &str {
        self.resource_url.trim_end_matches('/')
    }

    /// Returns the raw value of a single field.
    #[must_use]
    pub fn value(&self, field: CredentialField) -> &str {
        match field {
            CredentialField::ClientId => self.client_id(),
            CredentialField::ClientSecret => self.client_secret(),
            CredentialField::TenantId => self.tenant_id(),
            CredentialField::ResourceUrl => self.resource_url(),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("resource_url", &self.resource_url)
            .finish()
    }
}

/// Checks presence and syntax of all four credential fields.
///
/// Missing fields are reported together. Format checks run in the order
/// client id, tenant id, client secret, resource URL and stop at the first
/// failure.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ConfigError> {
    let missing: Vec<CredentialField> = CredentialField::ALL
        .into_iter()
        .filter(|field| credentials.value(*field).trim().is_empty())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingField(missing));
    }

    if !is_rfc4122_uuid(credentials.client_id()) {
        return Err(invalid(CredentialField::ClientId, FormatIssue::NotUuid));
    }

    if !is_rfc4122_uuid(credentials.tenant_id()) {
        return Err(invalid(CredentialField::TenantId, FormatIssue::NotUuid));
    }

    if credentials.client_secret().chars().count() < MIN_CLIENT_SECRET_LENGTH {
        return Err(invalid(
            CredentialField::ClientSecret,
            FormatIssue::SecretTooShort {
                min_length: MIN_CLIENT_SECRET_LENGTH,
            },
        ));
    }

    check_resource_url(credentials.resource_url())
        .map(|_| ())
        .map_err(|reason| invalid(CredentialField::ResourceUrl, reason))
}

fn invalid(field: CredentialField, reason: FormatIssue) -> ConfigError {
    ConfigError::InvalidFormat { field, reason }
}

/// Returns whether `value` is an 8-4-4-4-12 hex UUID with an RFC 4122
/// version (1 to 5) and variant nibble, ignoring case.
#[must_use]
pub fn is_rfc4122_uuid(value: &str) -> bool {
    // The parser also accepts simple, braced and URN forms; only the
    // hyphenated form is exactly 36 bytes.
    if value.len() != 36 {
        return false;
    }

    match Uuid::try_parse(value) {
        Ok(uuid) => {
            (1..=5).contains(&uuid.get_version_num()) && uuid.get_variant() == Variant::RFC4122
        }
        Err(_) => false,
    }
}

/// Parses a resource URL and checks scheme and host.
pub fn check_resource_url(value: &str) -> Result<Url, FormatIssue> {
    let url = Url::parse(value).map_err(|_| FormatIssue::NotAbsoluteUrl)?;
    if url.scheme() != "https" {
        return Err(FormatIssue::NotHttps);
    }

    let host = url.host_str().ok_or(FormatIssue::NotAbsoluteUrl)?;
    if !is_dynamics_host(host) {
        return Err(FormatIssue::NotDynamicsHost);
    }

    Ok(url)
}

/// Returns whether `host` looks like `<org>.crm<digits>.dynamics.com`.
#[must_use]
pub fn is_dynamics_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let Some(prefix) = host.strip_suffix(".dynamics.com") else {
        return false;
    };
    let Some((_, region_label)) = prefix.rsplit_once('.') else {
        return false;
    };

    region_label
        .strip_prefix("crm")
        .is_some_and(|digits| digits.chars().all(|character| character.is_ascii_digit()))
}
