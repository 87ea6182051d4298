//! Shared helpers for the web integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::{TestResponse, TestServer};
use serde_json::Value;

use deptstock::config::SessionConfig;
use deptstock::web::{create_health_router, create_router, AppState};
use deptstock::Database;

/// Password used by every test account.
pub const PASSWORD: &str = "s3cret-pass";

/// Create a test server over a seeded in-memory database.
///
/// Cookies are saved between requests, so the server behaves like a
/// single browser.
pub async fn create_test_server() -> (TestServer, Database) {
    create_test_server_with(SessionConfig::default()).await
}

/// Same as [`create_test_server`] with custom session settings.
pub async fn create_test_server_with(session: SessionConfig) -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    db.seed_departments()
        .await
        .expect("Failed to seed departments");

    let app_state = Arc::new(AppState::new(db.clone(), &session));
    let router = create_router(app_state).merge(create_health_router());

    let mut server = TestServer::new(router).expect("Failed to create test server");
    server.save_cookies();

    (server, db)
}

/// POST /signup with the usual fields.
pub async fn signup(
    server: &TestServer,
    username: &str,
    email: &str,
    department_id: &str,
) -> TestResponse {
    server
        .post("/signup")
        .form(&[
            ("username", username),
            ("email", email),
            ("password", PASSWORD),
            ("department_id", department_id),
            ("job_id", "JOB-1"),
        ])
        .await
}

/// POST /login.
pub async fn login(server: &TestServer, username: &str, password: &str) -> TestResponse {
    server
        .post("/login")
        .form(&[("username", username), ("password", password)])
        .await
}

/// Register `username` in department 1 and log in.
pub async fn signup_and_login(server: &TestServer, username: &str) {
    let email = format!("{username}@example.com");
    let response = signup(server, username, &email, "1").await;
    assert_redirect(&response, "/login");

    let response = login(server, username, PASSWORD).await;
    assert_redirect(&response, "/");
}

/// Assert a 303 redirect to `location`.
pub fn assert_redirect(response: &TestResponse, location: &str) {
    response.assert_status(axum::http::StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), location);
}

/// GET a page and return its JSON body.
pub async fn get_page(server: &TestServer, path: &str) -> Value {
    let response = server.get(path).await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// Messages of the flashes in a page body.
pub fn flash_messages(page: &Value) -> Vec<String> {
    page["flashes"]
        .as_array()
        .map(|flashes| {
            flashes
                .iter()
                .filter_map(|f| f["message"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
