use axum::Json;
use axum::extract::State;

use crate::dto::{
    ConnectionTestResponse, GenericMessageResponse, SaveSettingsRequest, SettingsStatusResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn settings_status_handler(State(state): State<AppState>) -> Json<SettingsStatusResponse> {
    let service = &state.contact_sync_service;
    let credentials = service.load_credentials().await;
    let validation = service.validate_config().await.map(|_| ());

    Json(SettingsStatusResponse::new(&credentials, validation))
}

pub async fn save_settings_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveSettingsRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state
        .contact_sync_service
        .save_credentials(&payload.into())
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "Dynamics 365 settings saved.".to_owned(),
    }))
}

pub async fn connection_test_handler(
    State(state): State<AppState>,
) -> Json<ConnectionTestResponse> {
    let outcome = state.contact_sync_service.test_connection().await;
    Json(ConnectionTestResponse::from(outcome))
}
