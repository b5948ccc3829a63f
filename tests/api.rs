use std::net::IpAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use skillscribe::app::create_router;
use skillscribe::app_state::AppState;
use skillscribe::config::{AppConfig, Config, DatabaseConfig, Environment, ServerConfig};
use skillscribe::db::repositories::Stores;
use skillscribe::storage::LocalBlobStorage;

fn test_config(registration_token: Option<&str>) -> Config {
    let static_dir = std::env::temp_dir().join("skillscribe-api-test");
    Config {
        server: ServerConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: None,
            min_connections: None,
        },
        app: AppConfig {
            name: "Skillscribe".to_string(),
            environment: Environment::Development,
            static_dir: static_dir.to_string_lossy().into_owned(),
            session_cookie: "skillscribe_session".to_string(),
            session_ttl_hours: 24,
            registration_token: registration_token.map(str::to_string),
        },
    }
}

fn test_app(registration_token: Option<&str>) -> Router {
    let env = test_config(registration_token);
    let blobs = Arc::new(LocalBlobStorage::new(&env.app.static_dir, "/static"));
    let state = AppState::new(None, env, Stores::in_memory(), blobs);
    create_router(state)
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Logs in and returns (session cookie pair, user id).
async fn login(app: &Router, name: &str, registration: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": name, "registration": registration })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let user = json_body(response).await;
    (cookie, user["id"].as_str().unwrap().to_string())
}

fn sample_training(title: &str) -> Value {
    json!({
        "title": title,
        "description": "A basic intro module text",
        "trainer_name": "Jane",
        "training_date": "2024-01-01",
        "training_hours": 4,
        "category": "technical",
    })
}

#[tokio::test]
async fn dashboard_routes_require_a_session() {
    let app = test_app(None);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/me", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(request("GET", "/api/me", Some("skillscribe_session=nonsense"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_creates_the_user_and_the_session_resolves_them() {
    let app = test_app(None);
    let (cookie, user_id) = login(&app, "Ana Silva", "123").await;

    let response = app
        .oneshot(request("GET", "/api/me", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let me = json_body(response).await;
    assert_eq!(me["id"].as_str().unwrap(), user_id);
    assert_eq!(me["name"], "Ana Silva");
    assert_eq!(me["registration"], "123");
}

#[tokio::test]
async fn second_login_with_a_different_name_is_rejected() {
    let app = test_app(None);
    login(&app, "Ana Silva", "123").await;

    let response = app
        .oneshot(request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": "Ana Diferente", "registration": "123" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = test_app(None);
    let (cookie, _) = login(&app, "Ana Silva", "123").await;

    let response = app
        .clone()
        .oneshot(request("POST", "/auth/logout", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request("GET", "/api/me", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_round_trips_and_keeps_unset_fields() {
    let app = test_app(None);
    let (cookie, _) = login(&app, "Ana Silva", "123").await;

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/api/me",
            Some(&cookie),
            Some(json!({
                "job_title": "Engenheira de Software",
                "admission_date": "2022-01-10",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let me = json_body(
        app.oneshot(request("GET", "/api/me", Some(&cookie), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(me["name"], "Ana Silva");
    assert_eq!(me["job_title"], "Engenheira de Software");
    assert_eq!(me["admission_date"], "2022-01-10");
}

#[tokio::test]
async fn profile_validation_failures_carry_field_details() {
    let app = test_app(None);
    let (cookie, _) = login(&app, "Ana Silva", "123").await;

    let response = app
        .oneshot(request(
            "PUT",
            "/api/me",
            Some(&cookie),
            Some(json!({ "job_title": "QA" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"]["details"]["job_title"].is_array());
}

#[tokio::test]
async fn enrollment_lifecycle_over_http() {
    let app = test_app(None);
    let (cookie, user_id) = login(&app, "Ana Silva", "123").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/trainings",
            Some(&cookie),
            Some(sample_training("Onboarding")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let training = json_body(response).await;
    let training_id = training["id"].as_str().unwrap().to_string();

    // Enroll, then a duplicate enroll conflicts.
    let enroll_uri = format!("/api/trainings/{training_id}/enrollments/{user_id}");
    let response = app
        .clone()
        .oneshot(request("POST", &enroll_uri, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let enrollment = json_body(response).await;
    assert_eq!(enrollment["status"], "not_started");
    assert_eq!(enrollment["completion_date"], Value::Null);

    let response = app
        .clone()
        .oneshot(request("POST", &enroll_uri, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Complete it; the completion date appears.
    let status_uri = format!("{enroll_uri}/status");
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &status_uri,
            Some(&cookie),
            Some(json!({ "status": "completed" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let enrollment = json_body(response).await;
    assert_eq!(enrollment["status"], "completed");
    assert!(enrollment["completion_date"].is_string());

    // Back to in-progress; the date is cleared.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &status_uri,
            Some(&cookie),
            Some(json!({ "status": "in_progress" })),
        ))
        .await
        .unwrap();
    let enrollment = json_body(response).await;
    assert_eq!(enrollment["status"], "in_progress");
    assert_eq!(enrollment["completion_date"], Value::Null);

    // Unenroll, and the records view is empty.
    let response = app
        .clone()
        .oneshot(request("DELETE", &enroll_uri, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let records = json_body(
        app.oneshot(request("GET", "/api/records", Some(&cookie), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(records.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn training_detail_lists_enrollments_with_localized_labels() {
    let app = test_app(None);
    let (cookie, user_id) = login(&app, "Ana Silva", "123").await;

    let training = json_body(
        app.clone()
            .oneshot(request(
                "POST",
                "/api/trainings",
                Some(&cookie),
                Some(sample_training("Princípios de Liderança")),
            ))
            .await
            .unwrap(),
    )
    .await;
    let training_id = training["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(request(
            "POST",
            &format!("/api/trainings/{training_id}/enrollments/{user_id}"),
            Some(&cookie),
            None,
        ))
        .await
        .unwrap();

    // Default language is Portuguese.
    let detail = json_body(
        app.oneshot(request(
            "GET",
            &format!("/api/trainings/{training_id}"),
            Some(&cookie),
            None,
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(detail["enrollments"][0]["status_label"], "Não Iniciado");
    assert_eq!(detail["enrollments"][0]["user"]["name"], "Ana Silva");
}

#[tokio::test]
async fn register_and_auto_complete_requires_the_matching_token() {
    let app = test_app(Some("fes-2024"));
    let (cookie, _) = login(&app, "Ana Silva", "123").await;

    let mut payload = sample_training("Onboarding");
    payload["validation_token"] = json!("wrong");
    let response = app
        .clone()
        .oneshot(request("POST", "/api/records/register", Some(&cookie), Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let mut payload = sample_training("Onboarding");
    payload["validation_token"] = json!("fes-2024");
    let response = app
        .clone()
        .oneshot(request("POST", "/api/records/register", Some(&cookie), Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["enrollment"]["status"], "completed");
    assert_eq!(
        body["enrollment"]["completion_date"].as_str().unwrap(),
        time::OffsetDateTime::now_utc().date().to_string()
    );

    let records = json_body(
        app.oneshot(request("GET", "/api/records", Some(&cookie), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(records[0]["training"]["title"], "Onboarding");
    assert_eq!(records[0]["status_label"], "Concluído");
}

#[tokio::test]
async fn clearing_completed_records_spares_other_statuses() {
    let app = test_app(None);
    let (cookie, user_id) = login(&app, "Ana Silva", "123").await;

    for (title, status) in [("Onboarding", "completed"), ("Liderança Básica", "in_progress")] {
        let training = json_body(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/trainings",
                    Some(&cookie),
                    Some(sample_training(title)),
                ))
                .await
                .unwrap(),
        )
        .await;
        let training_id = training["id"].as_str().unwrap();
        app.clone()
            .oneshot(request(
                "PUT",
                &format!("/api/trainings/{training_id}/enrollments/{user_id}/status"),
                Some(&cookie),
                Some(json!({ "status": status })),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(request("DELETE", "/api/records/completed", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["removed"], 1);

    let records = json_body(
        app.oneshot(request("GET", "/api/records", Some(&cookie), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["status"], "in_progress");
}

#[tokio::test]
async fn certificate_renders_only_for_completed_enrollments() {
    let app = test_app(None);
    let (cookie, user_id) = login(&app, "Ana Silva", "123").await;

    let training = json_body(
        app.clone()
            .oneshot(request(
                "POST",
                "/api/trainings",
                Some(&cookie),
                Some(sample_training("Onboarding")),
            ))
            .await
            .unwrap(),
    )
    .await;
    let training_id = training["id"].as_str().unwrap().to_string();
    let cert_uri = format!("/certificate/{user_id}/{training_id}");

    // Not enrolled yet: no certificate.
    let response = app
        .clone()
        .oneshot(request("GET", &cert_uri, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.clone()
        .oneshot(request(
            "PUT",
            &format!("/api/trainings/{training_id}/enrollments/{user_id}/status"),
            Some(&cookie),
            Some(json!({ "status": "completed" })),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(request("GET", &cert_uri, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Ana Silva"));
    assert!(html.contains("Onboarding"));
}
