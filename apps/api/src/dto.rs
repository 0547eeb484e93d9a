use dynsync_application::{ContactPrefill, ProbeOutcome, UpsertOutcome};
use dynsync_core::{ConfigError, CredentialField};
use dynsync_domain::{Contact, ContactForm, Credentials};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Generic message response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/generic-message-response.ts"
)]
pub struct GenericMessageResponse {
    pub message: String,
}

/// Contact form submission as exported to the frontend types.
///
/// Mirrors `ContactForm`, which stays free of `ts-rs`.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/contact-form-request.ts"
)]
pub struct ContactFormRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl From<ContactFormRequest> for ContactForm {
    fn from(value: ContactFormRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            city: value.city,
            state: value.state,
            postal_code: value.postal_code,
        }
    }
}

/// Contact details shown in the form.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/contact-response.ts"
)]
pub struct ContactResponse {
    pub contact_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl From<Contact> for ContactResponse {
    fn from(value: Contact) -> Self {
        let contact_id = value.contact_id().map(ToOwned::to_owned);
        let fields = value.into_fields();
        Self {
            contact_id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone: fields.phone,
            address: fields.address_line1,
            city: fields.city,
            state: fields.state_or_province,
            postal_code: fields.postal_code,
        }
    }
}

/// Form prefill payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/contact-prefill-response.ts"
)]
pub struct ContactPrefillResponse {
    pub contact: Option<ContactResponse>,
    pub notice: Option<String>,
}

impl From<ContactPrefill> for ContactPrefillResponse {
    fn from(value: ContactPrefill) -> Self {
        Self {
            contact: value.contact.map(ContactResponse::from),
            notice: value.notice,
        }
    }
}

/// Result of a contact sync.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/contact-sync-response.ts"
)]
pub struct ContactSyncResponse {
    /// `created` or `updated`.
    pub outcome: &'static str,
    pub message: String,
}

impl From<UpsertOutcome> for ContactSyncResponse {
    fn from(value: UpsertOutcome) -> Self {
        let outcome = match value {
            UpsertOutcome::Created => "created",
            UpsertOutcome::Updated { .. } => "updated",
        };
        Self {
            outcome,
            message: "Your information has been saved successfully.".to_owned(),
        }
    }
}

/// Connection settings submitted by an administrator.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-settings-request.ts"
)]
pub struct SaveSettingsRequest {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub resource_url: String,
}

impl From<SaveSettingsRequest> for Credentials {
    fn from(value: SaveSettingsRequest) -> Self {
        Self::new(
            value.client_id,
            value.client_secret,
            value.tenant_id,
            value.resource_url,
        )
    }
}

/// Stored connection settings, without the client secret.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/settings-status-response.ts"
)]
pub struct SettingsStatusResponse {
    pub configured: bool,
    pub client_id: String,
    pub tenant_id: String,
    pub resource_url: String,
    pub client_secret_set: bool,
    /// Store keys of empty fields, e.g. `client_secret`.
    pub missing_fields: Vec<String>,
    pub message: Option<String>,
}

impl SettingsStatusResponse {
    #[must_use]
    pub fn new(credentials: &Credentials, validation: Result<(), ConfigError>) -> Self {
        let missing_fields = match &validation {
            Err(ConfigError::MissingField(fields)) => fields
                .iter()
                .map(|field| field.as_str().to_owned())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            configured: validation.is_ok(),
            client_id: credentials.client_id().to_owned(),
            tenant_id: credentials.tenant_id().to_owned(),
            resource_url: credentials.resource_url().to_owned(),
            client_secret_set: !credentials
                .value(CredentialField::ClientSecret)
                .trim()
                .is_empty(),
            missing_fields,
            message: validation.err().map(|error| error.user_message()),
        }
    }
}

/// Connection test result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/connection-test-response.ts"
)]
pub struct ConnectionTestResponse {
    pub success: bool,
    pub outcome: &'static str,
    pub message: String,
}

impl From<ProbeOutcome> for ConnectionTestResponse {
    fn from(value: ProbeOutcome) -> Self {
        Self {
            success: value.is_success(),
            outcome: value.as_str(),
            message: value.message(),
        }
    }
}
