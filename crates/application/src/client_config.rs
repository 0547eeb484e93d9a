use std::time::Duration;

use dynsync_domain::Credentials;
use url::form_urlencoded;

/// Microsoft identity platform host used for the client-credentials grant.
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";

/// Web API path of the OData v9.1 endpoint, relative to the resource URL.
pub const DEFAULT_API_PATH: &str = "api/data/v9.1";

/// Timeout applied to every CRM Web API call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables shared by the token provider, repository and probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmClientConfig {
    /// Identity provider base URL; the tenant id and `/oauth2/token` are appended.
    pub authority_url: String,
    /// Web API path appended to the resource URL.
    pub api_path: String,
    /// Timeout for CRM calls. The token endpoint uses the transport default.
    pub request_timeout: Duration,
}

impl Default for CrmClientConfig {
    fn default() -> Self {
        Self {
            authority_url: DEFAULT_AUTHORITY_URL.to_owned(),
            api_path: DEFAULT_API_PATH.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl CrmClientConfig {
    /// Returns the token endpoint for a tenant.
    #[must_use]
    pub fn token_endpoint(&self, tenant_id: &str) -> String {
        format!(
            "{}/{tenant_id}/oauth2/token",
            self.authority_url.trim_end_matches('/')
        )
    }
}

/// URLs of the `contacts` entity set for one Dynamics 365 environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEndpoints {
    collection_url: String,
}

impl ContactEndpoints {
    /// Builds the endpoints from the credentials' resource URL.
    #[must_use]
    pub fn new(credentials: &Credentials, config: &CrmClientConfig) -> Self {
        Self {
            collection_url: format!(
                "{}/{}/contacts",
                credentials.resource_base(),
                config.api_path.trim_matches('/')
            ),
        }
    }

    /// `POST` target for new contacts.
    #[must_use]
    pub fn collection(&self) -> &str {
        self.collection_url.as_str()
    }

    /// Equality lookup on `emailaddress1`.
    #[must_use]
    pub fn filter_by_email(&self, email: &str) -> String {
        format!(
            "{}?$filter=emailaddress1 eq '{}'",
            self.collection_url,
            encode_odata_literal(email)
        )
    }

    /// Minimal read used by the connection probe.
    #[must_use]
    pub fn first_page(&self) -> String {
        format!("{}?$top=1", self.collection_url)
    }

    /// `PATCH` target for one contact.
    #[must_use]
    pub fn entity(&self, contact_id: &str) -> String {
        format!("{}({contact_id})", self.collection_url)
    }
}

/// Doubles single quotes for the OData string literal, then form-encodes.
fn encode_odata_literal(value: &str) -> String {
    let escaped = value.replace('\'', "''");
    form_urlencoded::byte_serialize(escaped.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use dynsync_domain::Credentials;

    use super::{ContactEndpoints, CrmClientConfig};

    fn endpoints(resource_url: &str) -> ContactEndpoints {
        let credentials = Credentials::new("id", "secret", "tenant", resource_url);
        ContactEndpoints::new(&credentials, &CrmClientConfig::default())
    }

    #[test]
    fn builds_web_api_urls() {
        let endpoints = endpoints("https://org.crm.dynamics.com/");

        assert_eq!(
            endpoints.collection(),
            "https://org.crm.dynamics.com/api/data/v9.1/contacts"
        );
        assert_eq!(
            endpoints.first_page(),
            "https://org.crm.dynamics.com/api/data/v9.1/contacts?$top=1"
        );
        assert_eq!(
            endpoints.entity("c1"),
            "https://org.crm.dynamics.com/api/data/v9.1/contacts(c1)"
        );
    }

    #[test]
    fn email_filter_is_url_encoded() {
        let endpoints = endpoints("https://org.crm.dynamics.com");
        assert_eq!(
            endpoints.filter_by_email("jane+crm@example.com"),
            "https://org.crm.dynamics.com/api/data/v9.1/contacts?$filter=emailaddress1 eq 'jane%2Bcrm%40example.com'"
        );
    }

    #[test]
    fn quotes_in_email_cannot_break_out_of_literal() {
        let endpoints = endpoints("https://org.crm.dynamics.com");
        let url = endpoints.filter_by_email("o'neil@example.com");
        assert!(url.ends_with("eq 'o%27%27neil%40example.com'"));
    }

    #[test]
    fn token_endpoint_includes_tenant() {
        let config = CrmClientConfig::default();
        assert_eq!(
            config.token_endpoint("7c9e6679-7425-40de-944b-e07fc1f90ae7"),
            "https://login.microsoftonline.com/7c9e6679-7425-40de-944b-e07fc1f90ae7/oauth2/token"
        );
    }
}
