use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{Enrollment, NewTraining, Training, User};
use crate::error::AppResult;
use crate::i18n::SupportedLanguage;
use crate::services::{EnrollmentLedger, TrainingCatalog, UserDirectory};

#[derive(Debug, Serialize)]
pub struct TrainingView {
    #[serde(flatten)]
    pub training: Training,
    pub category_label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TrainingDetail {
    #[serde(flatten)]
    pub training: Training,
    pub category_label: &'static str,
    pub enrollments: Vec<EnrollmentEntry>,
}

/// One row of the enrollment manager table.
#[derive(Debug, Serialize)]
pub struct EnrollmentEntry {
    pub user: User,
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub status_label: &'static str,
}

pub async fn list_trainings(
    State(state): State<AppState>,
    Extension(language): Extension<SupportedLanguage>,
) -> AppResult<Json<Vec<TrainingView>>> {
    let catalog = TrainingCatalog::new(state.stores.clone());
    let views = catalog
        .list()
        .await?
        .into_iter()
        .map(|training| TrainingView {
            category_label: language.category_label(training.category),
            training,
        })
        .collect();
    Ok(Json(views))
}

pub async fn create_training(
    State(state): State<AppState>,
    Json(payload): Json<NewTraining>,
) -> AppResult<(StatusCode, Json<Training>)> {
    let catalog = TrainingCatalog::new(state.stores.clone());
    let training = catalog.create(payload).await?;
    Ok((StatusCode::CREATED, Json(training)))
}

/// Detail view: the training plus every enrollment on it, with the user
/// record joined in for the manager table.
pub async fn training_detail(
    State(state): State<AppState>,
    Extension(language): Extension<SupportedLanguage>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TrainingDetail>> {
    let catalog = TrainingCatalog::new(state.stores.clone());
    let ledger = EnrollmentLedger::new(state.stores.clone(), None);
    let directory = UserDirectory::new(state.stores.clone(), state.blobs.clone());

    let training = catalog.get(id).await?;
    let mut entries = Vec::new();
    for enrollment in ledger.list_by_training(id).await? {
        let user = directory.get(enrollment.user_id).await?;
        entries.push(EnrollmentEntry {
            user,
            status_label: language.status_label(enrollment.status),
            enrollment,
        });
    }

    Ok(Json(TrainingDetail {
        category_label: language.category_label(training.category),
        training,
        enrollments: entries,
    }))
}
