use axum::{
    routing::{delete, post, put},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{enroll, set_status, unenroll};

pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/trainings/{id}/enrollments/{user_id}", post(enroll))
        .route("/trainings/{id}/enrollments/{user_id}", delete(unenroll))
        .route("/trainings/{id}/enrollments/{user_id}/status", put(set_status))
}
