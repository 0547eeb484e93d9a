//! Contact records as exchanged with the Dynamics 365 Web API.

use dynsync_core::FormErrors;
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum accepted postal code length.
pub const POSTAL_CODE_MAX_LENGTH: usize = 20;

/// The eight contact attributes the sync client reads and writes.
///
/// Serialized with the CRM's logical attribute names. A JSON `null` from the
/// CRM reads as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactFields {
    /// `firstname`
    #[serde(rename = "firstname", default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    /// `lastname`
    #[serde(rename = "lastname", default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    /// `emailaddress1`, the lookup key.
    #[serde(rename = "emailaddress1", default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// `telephone1`
    #[serde(rename = "telephone1", default, deserialize_with = "null_as_empty")]
    pub phone: String,
    /// `address1_line1`
    #[serde(rename = "address1_line1", default, deserialize_with = "null_as_empty")]
    pub address_line1: String,
    /// `address1_city`
    #[serde(rename = "address1_city", default, deserialize_with = "null_as_empty")]
    pub city: String,
    /// `address1_stateorprovince`
    #[serde(
        rename = "address1_stateorprovince",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub state_or_province: String,
    /// `address1_postalcode`
    #[serde(
        rename = "address1_postalcode",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub postal_code: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A contact as returned by the CRM.
///
/// `contactid` is assigned by the CRM on create and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "contactid", default, skip_serializing_if = "Option::is_none")]
    contact_id: Option<String>,
    #[serde(flatten)]
    fields: ContactFields,
}

impl Contact {
    /// Creates a contact from its CRM id and attributes.
    #[must_use]
    pub fn new(contact_id: Option<String>, fields: ContactFields) -> Self {
        Self { contact_id, fields }
    }

    /// Returns the CRM primary key, if the CRM returned one.
    #[must_use]
    pub fn contact_id(&self) -> Option<&str> {
        self.contact_id.as_deref()
    }

    /// Returns the contact attributes.
    #[must_use]
    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    /// Consumes the contact, returning its attributes.
    #[must_use]
    pub fn into_fields(self) -> ContactFields {
        self.fields
    }
}

/// Contact data as submitted through the self-service form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    /// First name, required.
    pub first_name: String,
    /// Last name, required.
    pub last_name: String,
    /// Email address, required.
    pub email: String,
    /// Phone number, optional.
    pub phone: String,
    /// Street address, optional.
    pub address: String,
    /// City, optional.
    pub city: String,
    /// State or province, optional.
    pub state: String,
    /// Postal code, optional.
    pub postal_code: String,
}

impl ContactForm {
    /// Validates the submission and maps it onto CRM attributes.
    ///
    /// Every violation is collected; values are trimmed before mapping.
    pub fn validate(&self) -> Result<ContactFields, FormErrors> {
        let mut errors = Vec::new();

        if self.first_name.trim().is_empty() {
            errors.push("First name is required.".to_owned());
        }

        if self.last_name.trim().is_empty() {
            errors.push("Last name is required.".to_owned());
        }

        if !is_plausible_email(self.email.trim()) {
            errors.push("Valid email address is required.".to_owned());
        }

        let phone = self.phone.trim();
        if !phone.is_empty() && !is_plausible_phone(phone) {
            errors.push("Please enter a valid phone number.".to_owned());
        }

        if self.postal_code.trim().chars().count() > POSTAL_CODE_MAX_LENGTH {
            errors.push("Postal code is too long.".to_owned());
        }

        if !errors.is_empty() {
            return Err(FormErrors::new(errors));
        }

        Ok(ContactFields {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: phone.to_owned(),
            address_line1: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state_or_province: self.state.trim().to_owned(),
            postal_code: self.postal_code.trim().to_owned(),
        })
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain.
fn is_plausible_email(value: &str) -> bool {
    if value.is_empty() || value.len() > 254 || value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Optional leading `+`, a non-zero digit, then 7 to 20 digits, spaces,
/// dashes, dots or parentheses.
fn is_plausible_phone(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    let mut characters = digits.chars();
    let Some(first) = characters.next() else {
        return false;
    };
    if !('1'..='9').contains(&first) {
        return false;
    }

    let rest: Vec<char> = characters.collect();
    (7..=20).contains(&rest.len())
        && rest.iter().all(|character| {
            character.is_ascii_digit()
                || character.is_whitespace()
                || matches!(character, '-' | '(' | ')' | '.')
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Contact, ContactFields, ContactForm};

    fn valid_form() -> ContactForm {
        ContactForm {
            first_name: " Jane ".to_owned(),
            last_name: "Doe".to_owned(),
            email: "jane@example.com".to_owned(),
            phone: "+1 (555) 123-4567".to_owned(),
            address: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            postal_code: "62701".to_owned(),
        }
    }

    #[test]
    fn valid_form_maps_to_crm_fields() {
        let fields = valid_form().validate();
        assert!(fields.is_ok());
        let fields = fields.unwrap_or_default();

        assert_eq!(fields.first_name, "Jane");
        assert_eq!(fields.state_or_province, "IL");
        assert_eq!(
            serde_json::to_value(&fields).ok(),
            Some(json!({
                "firstname": "Jane",
                "lastname": "Doe",
                "emailaddress1": "jane@example.com",
                "telephone1": "+1 (555) 123-4567",
                "address1_line1": "1 Main St",
                "address1_city": "Springfield",
                "address1_stateorprovince": "IL",
                "address1_postalcode": "62701",
            }))
        );
    }

    #[test]
    fn form_reports_every_violation() {
        let form = ContactForm {
            first_name: "  ".to_owned(),
            email: "not-an-email".to_owned(),
            phone: "0123".to_owned(),
            postal_code: "x".repeat(21),
            ..ContactForm::default()
        };

        let result = form.validate();
        let messages = result.err().map(|errors| errors.messages().to_vec());
        assert_eq!(
            messages,
            Some(vec![
                "First name is required.".to_owned(),
                "Last name is required.".to_owned(),
                "Valid email address is required.".to_owned(),
                "Please enter a valid phone number.".to_owned(),
                "Postal code is too long.".to_owned(),
            ])
        );
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let form = ContactForm {
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn contact_reads_crm_payload_with_nulls_and_extra_keys() {
        let payload = json!({
            "@odata.etag": "W/\"123\"",
            "contactid": "c1",
            "firstname": "Jane",
            "lastname": null,
            "emailaddress1": "jane@example.com",
            "telephone1": null,
        });

        let contact = serde_json::from_value::<Contact>(payload);
        assert!(contact.is_ok());
        let contact = contact.unwrap_or_else(|_| Contact::new(None, ContactFields::default()));

        assert_eq!(contact.contact_id(), Some("c1"));
        assert_eq!(contact.fields().first_name, "Jane");
        assert_eq!(contact.fields().last_name, "");
        assert_eq!(contact.fields().city, "");
    }
}
