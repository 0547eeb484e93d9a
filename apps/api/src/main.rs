//! Dynamics 365 contact sync API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use dynsync_application::ContactSyncService;
use dynsync_infrastructure::{InMemoryCredentialStore, ReqwestCrmTransport};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::error::StartupError;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|error| StartupError::Config(format!("failed to build HTTP client: {error}")))?;
    let credential_store = Arc::new(InMemoryCredentialStore::with_credentials(
        &config.seed_credentials,
    ));
    let transport = Arc::new(ReqwestCrmTransport::new(http_client));

    let contact_sync_service =
        ContactSyncService::new(credential_store, transport, config.crm_client.clone());

    match contact_sync_service.validate_config().await {
        Ok(credentials) => info!(
            resource_url = %credentials.resource_base(),
            "dynamics connection configured"
        ),
        Err(error) => info!(error = %error, "dynamics connection not configured yet"),
    }

    let app_state = AppState {
        contact_sync_service,
        admin_api_token: Arc::from(config.admin_api_token.as_str()),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| StartupError::Server(format!("failed to bind listener: {error}")))?;

    info!(%address, "dynsync-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| StartupError::Server(format!("api server error: {error}")))
}
