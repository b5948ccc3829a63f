use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{Enrollment, NewTraining, Training};
use crate::error::AppResult;
use crate::i18n::SupportedLanguage;
use crate::middleware::session::AuthUser;
use crate::services::{EnrollmentLedger, TrainingCatalog};

fn ledger(state: &AppState) -> EnrollmentLedger {
    EnrollmentLedger::new(state.stores.clone(), state.env.app.registration_token.clone())
}

/// One row of the acting user's training records table.
#[derive(Debug, Serialize)]
pub struct RecordEntry {
    pub training: Training,
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub status_label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRecordRequest {
    #[serde(flatten)]
    pub training: NewTraining,
    /// Token decoded from the registration QR code, when the deployment
    /// requires one.
    pub validation_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterRecordResponse {
    pub training: Training,
    pub enrollment: Enrollment,
}

pub async fn list_records(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Extension(language): Extension<SupportedLanguage>,
) -> AppResult<Json<Vec<RecordEntry>>> {
    let catalog = TrainingCatalog::new(state.stores.clone());
    let mut entries = Vec::new();
    for enrollment in ledger(&state).list_by_user(user_id).await? {
        let training = catalog.get(enrollment.training_id).await?;
        entries.push(RecordEntry {
            training,
            status_label: language.status_label(enrollment.status),
            enrollment,
        });
    }
    Ok(Json(entries))
}

/// Self-service registration (QR-validated): creates the training and marks
/// it Completed for the acting user in one step.
pub async fn register_record(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(payload): Json<RegisterRecordRequest>,
) -> AppResult<(StatusCode, Json<RegisterRecordResponse>)> {
    let (training, enrollment) = ledger(&state)
        .register_and_auto_complete(
            payload.training,
            user_id,
            payload.validation_token.as_deref(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterRecordResponse { training, enrollment }),
    ))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(training_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ledger(&state).delete_enrollment(user_id, training_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Destructive bulk delete; the two-step confirmation dialog lives in the
/// UI, this endpoint executes unconditionally.
pub async fn clear_completed(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> AppResult<Json<serde_json::Value>> {
    let removed = ledger(&state).delete_all_completed_for_user(user_id).await?;
    Ok(Json(json!({ "removed": removed })))
}
