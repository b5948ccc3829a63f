use axum::{routing::get, Router};

use crate::app_state::AppState;

use super::handlers::certificate;

pub fn certificate_routes() -> Router<AppState> {
    Router::new().route("/certificate/{user_id}/{training_id}", get(certificate))
}
