use std::sync::Arc;

use dynsync_application::ContactSyncService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub contact_sync_service: ContactSyncService,
    pub admin_api_token: Arc<str>,
}
