//! Application services and ports.

#![forbid(unsafe_code)]

mod client_config;
mod connection_probe;
mod contact_repository;
mod contact_sync_service;
mod crm_ports;
mod token_provider;

#[cfg(test)]
mod test_support;

pub use client_config::{
    ContactEndpoints, CrmClientConfig, DEFAULT_API_PATH, DEFAULT_AUTHORITY_URL,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use connection_probe::{ConnectionProbe, ProbeOutcome};
pub use contact_repository::{ContactLookup, ContactRepository, UpsertOutcome};
pub use contact_sync_service::{ContactPrefill, ContactSyncService};
pub use crm_ports::{
    CredentialStore, CrmMethod, CrmRequest, CrmRequestBody, CrmResponse, CrmTransport,
};
pub use token_provider::TokenProvider;
