use axum::{
    extract::{Multipart, State},
    Extension, Json,
};

use crate::app_state::AppState;
use crate::db::models::{UpdateProfile, User};
use crate::error::{AppError, AppResult};
use crate::middleware::session::AuthUser;
use crate::services::UserDirectory;

fn directory(state: &AppState) -> UserDirectory {
    UserDirectory::new(state.stores.clone(), state.blobs.clone())
}

pub async fn me(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> AppResult<Json<User>> {
    Ok(Json(directory(&state).get(user_id).await?))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(payload): Json<UpdateProfile>,
) -> AppResult<Json<User>> {
    Ok(Json(directory(&state).update_profile(user_id, payload).await?))
}

/// Multipart avatar upload; the bytes go through the blob seam and only the
/// resulting URL lands on the profile.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    mut multipart: Multipart,
) -> AppResult<Json<User>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("avatar") {
            let extension = field
                .file_name()
                .and_then(|name| std::path::Path::new(name).extension())
                .and_then(|ext| ext.to_str())
                .unwrap_or("png")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            let user = directory(&state)
                .attach_avatar(user_id, &bytes, &extension)
                .await?;
            return Ok(Json(user));
        }
    }
    Err(AppError::BadRequest("missing avatar field".to_string()))
}

/// Directory listing for the enrollment manager view.
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(directory(&state).list().await?))
}
