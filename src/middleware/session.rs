use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::services::SessionGate;

/// The resolved acting user, injected into request extensions for every
/// route behind the gate.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// Session gate: resolves the session cookie to a user id or rejects with
/// `Unauthorized` (the UI boundary turns that into a login redirect).
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(&state.env.app.session_cookie)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .ok_or(AppError::Unauthorized)?;

    let gate = SessionGate::new(state.stores.clone(), state.env.app.session_ttl_hours);
    let user_id = gate
        .authenticate(token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}
