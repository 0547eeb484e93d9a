//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_credential_store;
mod reqwest_crm_transport;

pub use in_memory_credential_store::InMemoryCredentialStore;
pub use reqwest_crm_transport::ReqwestCrmTransport;
