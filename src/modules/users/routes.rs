use axum::{
    routing::{get, post, put},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{list_users, me, update_me, upload_avatar};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me", put(update_me))
        .route("/me/avatar", post(upload_avatar))
        .route("/users", get(list_users))
}
