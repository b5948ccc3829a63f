use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{Enrollment, SetStatusRequest};
use crate::error::AppResult;
use crate::services::EnrollmentLedger;

fn ledger(state: &AppState) -> EnrollmentLedger {
    EnrollmentLedger::new(state.stores.clone(), state.env.app.registration_token.clone())
}

pub async fn enroll(
    State(state): State<AppState>,
    Path((training_id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<(StatusCode, Json<Enrollment>)> {
    let enrollment = ledger(&state).enroll(user_id, training_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn unenroll(
    State(state): State<AppState>,
    Path((training_id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    ledger(&state).unenroll(user_id, training_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_status(
    State(state): State<AppState>,
    Path((training_id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<Enrollment>> {
    let enrollment = ledger(&state)
        .set_status(user_id, training_id, payload.status)
        .await?;
    Ok(Json(enrollment))
}
