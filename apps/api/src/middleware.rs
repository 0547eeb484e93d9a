use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header set by the upstream login layer with the signed-in user's email.
pub const AUTHENTICATED_EMAIL_HEADER: &str = "x-authenticated-email";

/// Email of the signed-in user, inserted by [`require_user_email`].
#[derive(Debug, Clone)]
pub struct AuthenticatedEmail(pub String);

pub async fn require_user_email(mut request: Request, next: Next) -> ApiResult<Response> {
    let email = request
        .headers()
        .get(AUTHENTICATED_EMAIL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .ok_or(ApiError::Unauthorized("authentication required"))?;

    request.extensions_mut().insert(AuthenticatedEmail(email));
    Ok(next.run(request).await)
}

pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default();

    if !constant_time_eq(provided.as_bytes(), state.admin_api_token.as_bytes()) {
        return Err(ApiError::Unauthorized("admin token required"));
    }

    Ok(next.run(request).await)
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0_u8, |difference, (a, b)| difference | (a ^ b))
        == 0
}
