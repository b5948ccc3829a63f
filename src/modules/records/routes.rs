use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{clear_completed, delete_record, list_records, register_record};

pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/records", get(list_records))
        .route("/records/register", post(register_record))
        .route("/records/completed", delete(clear_completed))
        .route("/records/{training_id}", delete(delete_record))
}
