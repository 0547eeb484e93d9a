use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use dynsync_core::TransportError;
use dynsync_domain::Credentials;
use tokio::sync::Mutex;

use crate::{CredentialStore, CrmMethod, CrmRequest, CrmResponse, CrmTransport};

pub(crate) const CLIENT_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
pub(crate) const CLIENT_SECRET: &str = "s3cr3t-s3cr3t-s3cr3t-s3cr3t-s3cr3t";
pub(crate) const TENANT_ID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";
pub(crate) const RESOURCE_URL: &str = "https://org.crm.dynamics.com";
pub(crate) const TOKEN_URL: &str =
    "https://login.microsoftonline.com/7c9e6679-7425-40de-944b-e07fc1f90ae7/oauth2/token";
pub(crate) const CONTACTS_URL: &str = "https://org.crm.dynamics.com/api/data/v9.1/contacts";

pub(crate) fn valid_credentials() -> Credentials {
    Credentials::new(CLIENT_ID, CLIENT_SECRET, TENANT_ID, RESOURCE_URL)
}

/// Transport answering from a queue and recording every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<CrmResponse, TransportError>>>,
    requests: Mutex<Vec<CrmRequest>>,
}

impl ScriptedTransport {
    pub(crate) async fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .await
            .push_back(Ok(CrmResponse::new(status, body)));
    }

    pub(crate) async fn fail(&self, error: TransportError) {
        self.responses.lock().await.push_back(Err(error));
    }

    pub(crate) async fn requests(&self) -> Vec<CrmRequest> {
        self.requests.lock().await.clone()
    }

    pub(crate) async fn count(&self, method: CrmMethod, url_prefix: &str) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|request| request.method == method && request.url.starts_with(url_prefix))
            .count()
    }
}

#[async_trait]
impl CrmTransport for ScriptedTransport {
    async fn execute(&self, request: CrmRequest) -> Result<CrmResponse, TransportError> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted response".to_owned())))
    }
}

#[derive(Default)]
pub(crate) struct FakeCredentialStore {
    values: Mutex<HashMap<String, String>>,
}

impl FakeCredentialStore {
    pub(crate) async fn seeded(credentials: &Credentials) -> Self {
        let store = Self::default();
        crate::crm_ports::write_credentials(&store, credentials).await;
        store
    }

    pub(crate) async fn snapshot(&self) -> HashMap<String, String> {
        self.values.lock().await.clone()
    }
}

#[async_trait]
impl CredentialStore for FakeCredentialStore {
    async fn get(&self, key: &str) -> String {
        self.values
            .lock()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    async fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
    }
}
