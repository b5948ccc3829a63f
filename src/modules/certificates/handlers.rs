use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::EnrollmentStatus;
use crate::error::{AppError, AppResult};
use crate::services::{EnrollmentLedger, TrainingCatalog, UserDirectory};

#[derive(Template)]
#[template(path = "certificate.html")]
struct CertificateTemplate {
    user_name: String,
    training_title: String,
    trainer_name: String,
    training_hours: i32,
    completion_date: String,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                error!("Failed to render template: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Printable certificate for a completed enrollment. Anything less than
/// Completed is treated as absent.
pub async fn certificate(
    State(state): State<AppState>,
    Path((user_id, training_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Response> {
    let ledger = EnrollmentLedger::new(state.stores.clone(), None);
    let enrollment = ledger
        .find(user_id, training_id)
        .await?
        .filter(|e| e.status == EnrollmentStatus::Completed)
        .ok_or(AppError::NotFound("certificate"))?;

    let user = UserDirectory::new(state.stores.clone(), state.blobs.clone())
        .get(user_id)
        .await?;
    let training = TrainingCatalog::new(state.stores.clone())
        .get(training_id)
        .await?;

    let completion_date = enrollment
        .completion_date
        .map(|date| date.to_string())
        .unwrap_or_default();

    Ok(HtmlTemplate(CertificateTemplate {
        user_name: user.name,
        training_title: training.title,
        trainer_name: training.trainer_name,
        training_hours: training.training_hours,
        completion_date,
    })
    .into_response())
}
