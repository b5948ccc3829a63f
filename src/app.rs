use axum::{middleware, routing::get, Json, Router};
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use crate::{
    app_state::AppState,
    middleware::{language::language_middleware, request_log::request_log_middleware, session::require_session},
    modules::{
        auth::routes::auth_routes, certificates::routes::certificate_routes,
        enrollments::routes::enrollment_routes, records::routes::record_routes,
        trainings::routes::training_routes, users::routes::user_routes,
    },
};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(user_routes())
        .merge(training_routes())
        .merge(enrollment_routes())
        .merge(record_routes());

    // Everything behind /api plus the certificate view requires a session.
    let protected = Router::new()
        .nest("/api", api)
        .merge(certificate_routes())
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    let static_dir = state.env.app.static_dir.to_string();

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(protected)
        .nest_service(
            "/static",
            tower_http::services::ServeDir::new(static_dir),
        )
        .layer(middleware::from_fn(language_middleware))
        .layer(middleware::from_fn(request_log_middleware))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Skillscribe API says hello!\n"
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_status = match &state.db {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => "healthy",
            Err(e) => {
                tracing::info!("Database health check failed: {}", e);
                "unhealthy"
            }
        },
        None => "not configured",
    };

    let timestamp = time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
