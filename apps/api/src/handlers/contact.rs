use axum::Json;
use axum::extract::{Extension, State};
use dynsync_core::SyncError;
use dynsync_domain::ContactForm;
use tracing::info;

use crate::dto::{ContactFormRequest, ContactPrefillResponse, ContactSyncResponse};
use crate::error::ApiResult;
use crate::middleware::AuthenticatedEmail;
use crate::state::AppState;

pub async fn prefill_contact_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedEmail(email)): Extension<AuthenticatedEmail>,
) -> Json<ContactPrefillResponse> {
    let prefill = state.contact_sync_service.prefill_contact(&email).await;
    Json(ContactPrefillResponse::from(prefill))
}

/// Validates the submitted form and upserts the caller's contact.
///
/// The lookup key is the signed-in user's email, not the submitted one.
pub async fn sync_contact_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedEmail(email)): Extension<AuthenticatedEmail>,
    Json(payload): Json<ContactFormRequest>,
) -> ApiResult<Json<ContactSyncResponse>> {
    let fields = ContactForm::from(payload)
        .validate()
        .map_err(SyncError::from)?;

    let outcome = state
        .contact_sync_service
        .sync_contact(&email, &fields)
        .await?;

    info!(outcome = ?outcome, "contact form synced");
    Ok(Json(ContactSyncResponse::from(outcome)))
}
