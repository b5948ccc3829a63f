use axum::{routing::post, Router};

use crate::app_state::AppState;

use super::handlers::{login, logout};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}
