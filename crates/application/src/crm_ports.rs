mod credential_store;
mod transport;

pub use credential_store::CredentialStore;
pub(crate) use credential_store::{read_credentials, write_credentials};
pub use transport::{CrmMethod, CrmRequest, CrmRequestBody, CrmResponse, CrmTransport};
