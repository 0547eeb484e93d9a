use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_admin_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/settings/status",
            get(handlers::admin::settings_status_handler),
        )
        .route(
            "/api/admin/settings",
            put(handlers::admin::save_settings_handler),
        )
        .route(
            "/api/admin/connection-test",
            post(handlers::admin::connection_test_handler),
        )
        .route_layer(from_fn_with_state(
            app_state,
            middleware::require_admin_token,
        ))
}
