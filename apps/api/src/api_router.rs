mod admin;
mod contact;
mod cors;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::error::StartupError;
use crate::handlers;
use crate::state::AppState;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, StartupError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(contact::build_contact_routes())
        .merge(admin::build_admin_routes(app_state.clone()))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
