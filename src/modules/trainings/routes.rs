use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{create_training, list_trainings, training_detail};

pub fn training_routes() -> Router<AppState> {
    Router::new()
        .route("/trainings", get(list_trainings))
        .route("/trainings", post(create_training))
        .route("/trainings/{id}", get(training_detail))
}
