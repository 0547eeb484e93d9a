use axum::Router;
use axum::middleware::from_fn;
use axum::routing::get;

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_contact_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/contact",
            get(handlers::contact::prefill_contact_handler)
                .put(handlers::contact::sync_contact_handler),
        )
        .route_layer(from_fn(middleware::require_user_email))
}
