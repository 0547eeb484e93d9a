//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod contact;
mod credentials;
mod token;

pub use contact::{Contact, ContactFields, ContactForm, POSTAL_CODE_MAX_LENGTH};
pub use credentials::{
    Credentials, MIN_CLIENT_SECRET_LENGTH, check_resource_url, is_dynamics_host,
    is_rfc4122_uuid, validate_credentials,
};
pub use token::AccessToken;
