use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{LoginRequest, User};
use crate::error::AppResult;
use crate::services::{SessionGate, UserDirectory};

/// Login with name + registration. Unknown registrations get a fresh
/// directory entry; known ones must present the matching name.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<User>)> {
    payload.validate()?;

    let directory = UserDirectory::new(state.stores.clone(), state.blobs.clone());
    let user = directory
        .find_or_create_by_registration(&payload.name, &payload.registration)
        .await?;

    let gate = SessionGate::new(state.stores.clone(), state.env.app.session_ttl_hours);
    let session = gate.create_session(user.id).await?;

    let cookie = Cookie::build((
        state.env.app.session_cookie.clone(),
        session.token.to_string(),
    ))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .expires(session.expires_at)
    .build();

    Ok((jar.add(cookie), Json(user)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, StatusCode)> {
    let cookie_name = state.env.app.session_cookie.clone();

    if let Some(token) = jar
        .get(&cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    {
        let gate = SessionGate::new(state.stores.clone(), state.env.app.session_ttl_hours);
        gate.destroy_session(token).await?;
    }

    let removal = Cookie::build((cookie_name, "")).path("/").build();
    Ok((jar.remove(removal), StatusCode::NO_CONTENT))
}
